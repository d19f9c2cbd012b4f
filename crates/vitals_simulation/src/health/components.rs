//! Health — state machine здоровья актора
//!
//! Состояния:
//! - Alive-Vulnerable: урон проходит
//! - Alive-Invulnerable: explicit флаг ИЛИ активный invincibility timer
//!   (два независимых gate, оба должны быть сняты)
//! - Dead: terminal, никаких мутаций
//!
//! INSTAKILL sentinel обходит оба gate (cascade kill, pit traps).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::events::EventHandler;
use crate::timer::Timer;

/// Зарезервированное значение урона: всегда убивает, игнорирует invulnerability
pub const INSTAKILL: f32 = 1_000_000.0;

/// Payload событий Health: (amount, hp после изменения)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    pub amount: f32,
    pub hp: f32,
}

/// Фиксированное перечисление событий Health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthEventKind {
    HealthGained,
    DamageTaken,
    Death,
}

/// Параметры Health (читаются при spawn)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub starting_hp: f32,
    pub invulnerable: bool,
    /// Invincibility window после удара (секунды)
    pub invincible_after_hit: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            starting_hp: 100.0,
            invulnerable: false,
            invincible_after_hit: 0.0,
        }
    }
}

/// Здоровье актора
///
/// Инварианты:
/// - `!alive ⇒ hp <= 0` (воскрешения нет)
/// - пока жив: `hp <= max_hp`
///
/// Мутации только через `gain_health` / `take_damage`.
#[derive(Component, Debug)]
pub struct Health {
    max_hp: f32,
    hp: f32,
    alive: bool,
    invulnerable: bool,
    invincible_after_hit: f32,
    invincibility: Timer,

    /// Collision surfaces, отключаемые при смерти (borrowed, не owned)
    colliders: Vec<Entity>,

    pub on_health_gained: EventHandler<HealthChange>,
    pub on_damage_taken: EventHandler<HealthChange>,
    pub on_death: EventHandler<HealthChange>,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max_hp: f32) -> Self {
        Self::from_config(&HealthConfig {
            starting_hp: max_hp,
            ..default()
        })
    }

    pub fn from_config(config: &HealthConfig) -> Self {
        Self {
            max_hp: config.starting_hp,
            hp: config.starting_hp,
            alive: true,
            invulnerable: config.invulnerable,
            invincible_after_hit: config.invincible_after_hit.max(0.0),
            invincibility: Timer::with_duration(config.invincible_after_hit),
            colliders: Vec::new(),
            on_health_gained: EventHandler::new(),
            on_damage_taken: EventHandler::new(),
            on_death: EventHandler::new(),
        }
    }

    pub fn with_colliders(mut self, colliders: Vec<Entity>) -> Self {
        self.colliders = colliders;
        self
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.alive && self.hp > 0.0
    }

    /// hp / max_hp, клампится в [0, 1]
    pub fn health_percentage(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    /// Permanent invulnerability (cutscene, god mode). Не зависит от invincibility window.
    pub fn set_invulnerable(&mut self, value: bool) {
        self.invulnerable = value;
    }

    /// Активно ли post-hit окно
    pub fn is_invincible(&self) -> bool {
        self.invincibility.active()
    }

    pub fn colliders(&self) -> &[Entity] {
        &self.colliders
    }

    pub fn channel(&self, kind: HealthEventKind) -> &EventHandler<HealthChange> {
        match kind {
            HealthEventKind::HealthGained => &self.on_health_gained,
            HealthEventKind::DamageTaken => &self.on_damage_taken,
            HealthEventKind::Death => &self.on_death,
        }
    }

    /// Лечение. false если мёртв (или amount не положительный).
    pub fn gain_health(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        if amount.is_nan() || amount <= 0.0 {
            return false;
        }

        self.hp = (self.hp + amount).min(self.max_hp);
        self.on_health_gained.invoke(&HealthChange {
            amount,
            hp: self.hp,
        });
        true
    }

    /// Урон. false (без мутаций и событий) если:
    /// - мёртв
    /// - damage <= 0
    /// - invulnerable (кроме INSTAKILL)
    /// - активно invincibility окно (кроме INSTAKILL)
    ///
    /// Иначе вычитает damage, шлёт DamageTaken либо Death, перезапускает invincibility.
    pub fn take_damage(&mut self, damage: f32) -> bool {
        if !self.alive {
            return false;
        }
        if damage.is_nan() || damage <= 0.0 {
            return false;
        }

        let instakill = damage == INSTAKILL;
        if self.invulnerable && !instakill {
            return false;
        }
        if self.invincibility.active() && !instakill {
            return false;
        }
        if self.hp <= 0.0 {
            return false;
        }

        self.hp -= damage;
        if instakill && self.hp > 0.0 {
            // max_hp выше sentinel'а — всё равно смерть
            self.hp = 0.0;
        }

        let change = HealthChange {
            amount: damage,
            hp: self.hp,
        };

        if self.hp <= 0.0 {
            self.alive = false;
            self.on_death.invoke(&change);
        } else {
            self.on_damage_taken.invoke(&change);
        }

        // Даже для смертельного удара (окно у мёртвого не имеет значения)
        self.invincibility.set_duration(self.invincible_after_hit);
        self.invincibility.start();

        true
    }

    /// Per-frame tick invincibility таймера (для живых и мёртвых)
    pub fn tick(&mut self, delta: f32) {
        self.invincibility.tick(delta);
    }
}
