//! Базовые компоненты акторов: Actor, ActorConfig, ActorLinks, lifecycle маркеры

use std::sync::atomic::{AtomicU64, Ordering};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ActorSetupError;
use crate::health::HealthConfig;

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity актора, уникален в пределах процесса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

impl ActorId {
    pub fn generate() -> Self {
        Self(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Актор (игрок, враг, турель, спавнер)
///
/// Связывает Health с реакциями (`ActorReactions`) и другими акторами (`ActorLinks`).
#[derive(Component, Debug, Clone)]
pub struct Actor {
    id: ActorId,
}

impl Actor {
    pub fn new() -> Self {
        Self {
            id: ActorId::generate(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

/// Конфигурация актора (читается при spawn, ядро её не мутирует)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub name: String,
    pub health: HealthConfig,
    pub hide_on_death: bool,
    pub destroy_on_death: bool,
    /// Deferred despawn после смерти (секунды), None = труп остаётся
    pub remove_after: Option<f32>,
    pub death_particles: bool,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            name: "Actor".to_string(),
            health: HealthConfig::default(),
            hide_on_death: true,
            destroy_on_death: false,
            remove_after: None,
            death_particles: true,
        }
    }
}

impl ActorConfig {
    /// JSON prefab → config (с валидацией)
    pub fn from_json(source: &str) -> Result<Self, ActorSetupError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ActorSetupError> {
        let hp = self.health.starting_hp;
        if !hp.is_finite() || hp <= 0.0 {
            return Err(ActorSetupError::InvalidStartingHp(hp));
        }

        let window = self.health.invincible_after_hit;
        if !window.is_finite() || window < 0.0 {
            return Err(ActorSetupError::InvalidInvincibility(window));
        }

        if let Some(delay) = self.remove_after {
            if !delay.is_finite() || delay < 0.0 {
                return Err(ActorSetupError::InvalidRemovalDelay(delay));
            }
        }

        Ok(())
    }
}

/// Weak links на другие entities (lookup only, без ownership).
///
/// Despawned entity в списке — не ошибка, при cascade она пропускается.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ActorLinks {
    /// Акторы, убиваемые (INSTAKILL) при смерти этого
    pub kill_on_death: Vec<Entity>,
    /// Объекты, деактивируемые при смерти
    pub disable_on_death: Vec<Entity>,
    /// Collision surfaces (передаются в Health)
    pub colliders: Vec<Entity>,
}

impl ActorLinks {
    pub fn kill_on_death(mut self, actors: impl IntoIterator<Item = Entity>) -> Self {
        self.kill_on_death.extend(actors);
        self
    }

    pub fn disable_on_death(mut self, objects: impl IntoIterator<Item = Entity>) -> Self {
        self.disable_on_death.extend(objects);
        self
    }

    pub fn colliders(mut self, colliders: impl IntoIterator<Item = Entity>) -> Self {
        self.colliders.extend(colliders);
        self
    }
}

/// Death policy (из ActorConfig)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DeathPolicy {
    pub hide_on_death: bool,
    pub destroy_on_death: bool,
    pub remove_after: Option<f32>,
    pub death_particles: bool,
}

impl Default for DeathPolicy {
    fn default() -> Self {
        Self::from(&ActorConfig::default())
    }
}

impl From<&ActorConfig> for DeathPolicy {
    fn from(config: &ActorConfig) -> Self {
        Self {
            hide_on_death: config.hide_on_death,
            destroy_on_death: config.destroy_on_death,
            remove_after: config.remove_after,
            death_particles: config.death_particles,
        }
    }
}

/// Gameplay подсистемы актора (AI, movement, targeting, attack).
///
/// Внешние системы (behaviour tree, movement) проверяют флаги перед работой.
/// Смерть выключает всё в том же шаге.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gameplay {
    pub ai: bool,
    pub movement: bool,
    pub targeting: bool,
    pub attack: bool,
}

impl Default for Gameplay {
    fn default() -> Self {
        Self {
            ai: true,
            movement: true,
            targeting: true,
            attack: true,
        }
    }
}

impl Gameplay {
    pub fn disable_all(&mut self) {
        *self = Self {
            ai: false,
            movement: false,
            targeting: false,
            attack: false,
        };
    }

    pub fn any_enabled(&self) -> bool {
        self.ai || self.movement || self.targeting || self.attack
    }
}

/// Компонент-маркер: актор мёртв (Dead lifecycle state)
#[derive(Component, Debug)]
pub struct Dead;

/// Компонент-маркер: визуал скрыт (hide_on_death)
#[derive(Component, Debug)]
pub struct Hidden;

/// Компонент-маркер: объект деактивирован cascade'ом
#[derive(Component, Debug)]
pub struct Deactivated;
