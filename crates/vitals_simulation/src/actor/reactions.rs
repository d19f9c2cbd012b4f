//! Actor reactions — явная регистрация handler'ов на Health события
//!
//! Вместо абстрактных callback'ов per actor type: каждый актор держит таблицу
//! `HealthEventKind → [Reaction]`. Reaction получает `&mut World`, поэтому
//! может мутировать другие entities (cascade) — в отличие от подписчиков
//! `Health::on_*` каналов, которые видят только payload.
//!
//! Дефолтная таблица (`ActorReactions::with_common`):
//! - DamageTaken → common_damage_actions
//! - Death → common_death_actions

use std::sync::Arc;

use bevy::prelude::*;

use super::components::{ActorLinks, Dead, DeathPolicy, Deactivated, Gameplay, Hidden};
use super::damage::take_damage;
use super::deferred::{schedule_deferred, Liveness};
use super::events::{send_feedback, FeedbackKind, SoundCue};
use super::spawn::despawn_actor;
use crate::health::{HealthChange, HealthEventKind, INSTAKILL};
use crate::player::Shooter;

pub type Reaction = Arc<dyn Fn(&mut World, Entity, HealthChange) + Send + Sync>;

#[derive(Component, Clone, Default)]
pub struct ActorReactions {
    on_health_gained: Vec<Reaction>,
    on_damage_taken: Vec<Reaction>,
    on_death: Vec<Reaction>,
}

impl std::fmt::Debug for ActorReactions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorReactions")
            .field("on_health_gained", &self.on_health_gained.len())
            .field("on_damage_taken", &self.on_damage_taken.len())
            .field("on_death", &self.on_death.len())
            .finish()
    }
}

impl ActorReactions {
    /// Таблица с общими реакциями любого актора
    pub fn with_common() -> Self {
        let mut reactions = Self::default();
        reactions
            .register(HealthEventKind::DamageTaken, common_damage_actions)
            .register(HealthEventKind::Death, common_death_actions);
        reactions
    }

    fn list_mut(&mut self, kind: HealthEventKind) -> &mut Vec<Reaction> {
        match kind {
            HealthEventKind::HealthGained => &mut self.on_health_gained,
            HealthEventKind::DamageTaken => &mut self.on_damage_taken,
            HealthEventKind::Death => &mut self.on_death,
        }
    }

    fn list(&self, kind: HealthEventKind) -> &[Reaction] {
        match kind {
            HealthEventKind::HealthGained => &self.on_health_gained,
            HealthEventKind::DamageTaken => &self.on_damage_taken,
            HealthEventKind::Death => &self.on_death,
        }
    }

    /// Добавить реакцию в конец списка kind'а (порядок регистрации = порядок вызова)
    pub fn register(
        &mut self,
        kind: HealthEventKind,
        reaction: impl Fn(&mut World, Entity, HealthChange) + Send + Sync + 'static,
    ) -> &mut Self {
        self.list_mut(kind).push(Arc::new(reaction));
        self
    }

    pub fn len(&self, kind: HealthEventKind) -> usize {
        self.list(kind).len()
    }

    /// Копия списка для dispatch (таблицу можно менять во время реакций)
    pub fn snapshot(&self, kind: HealthEventKind) -> Vec<Reaction> {
        self.list(kind).to_vec()
    }
}

/// Вызвать реакции актора на событие.
///
/// Если реакция despawn'ула актора — оставшиеся не вызываются.
pub fn dispatch_reactions(world: &mut World, entity: Entity, kind: HealthEventKind, change: HealthChange) {
    let Some(reactions) = world.get::<ActorReactions>(entity).map(|r| r.snapshot(kind)) else {
        return;
    };

    for reaction in reactions {
        if world.get_entity(entity).is_err() {
            crate::logger::log(&format!(
                "Actor {:?} despawned during {:?} reactions — stop",
                entity, kind
            ));
            break;
        }
        reaction(world, entity, change);
    }
}

/// DamageTaken: flash + звук. Health не мутируется.
pub fn common_damage_actions(world: &mut World, entity: Entity, _change: HealthChange) {
    send_feedback(world, entity, FeedbackKind::DamageFlash);
    send_feedback(world, entity, FeedbackKind::Sound(SoundCue::Damage));
}

/// Death: terminal effects → disable gameplay → cascade → removal.
pub fn common_death_actions(world: &mut World, entity: Entity, _change: HealthChange) {
    let policy = world.get::<DeathPolicy>(entity).copied().unwrap_or_default();

    // 1. Terminal effects
    send_feedback(world, entity, FeedbackKind::Sound(SoundCue::Death));
    if policy.death_particles {
        send_feedback(world, entity, FeedbackKind::DeathParticles);
    }
    if policy.hide_on_death {
        if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
            entity_mut.insert(Hidden);
        }
        send_feedback(world, entity, FeedbackKind::Hide);
    }

    // 2. Gameplay off в этом же шаге (любой актор с Shooter'ом, не только игрок)
    if let Some(mut gameplay) = world.get_mut::<Gameplay>(entity) {
        gameplay.disable_all();
    }
    if let Some(mut shooter) = world.get_mut::<Shooter>(entity) {
        shooter.disable();
    }
    if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
        entity_mut.insert(Dead);
    }

    // 3. Cascade
    cascade_death(world, entity);

    // 4. Removal
    if policy.destroy_on_death {
        despawn_actor(world, entity);
    } else if let Some(delay) = policy.remove_after {
        schedule_deferred(world, entity, delay, Liveness::Exists, |world, entity| {
            despawn_actor(world, entity);
        });
    }
}

/// Force-kill зависимых акторов (INSTAKILL) и деактивация объектов.
///
/// Dangling entities пропускаются, cascade продолжается.
pub fn cascade_death(world: &mut World, source: Entity) {
    let Some(links) = world.get::<ActorLinks>(source).cloned() else {
        return;
    };

    for dependent in links.kill_on_death {
        if dependent == source {
            crate::logger::log_warning(&format!("Actor {:?} lists itself in kill_on_death — skip", source));
            continue;
        }
        if world.get_entity(dependent).is_err() {
            crate::logger::log(&format!("Cascade target {:?} already despawned — skip", dependent));
            continue;
        }

        if take_damage(world, dependent, INSTAKILL, Vec3::ZERO) {
            crate::logger::log_info(&format!("☠️ Cascade: {:?} killed by death of {:?}", dependent, source));
        }
    }

    for object in links.disable_on_death {
        match world.get_entity_mut(object) {
            Ok(mut entity_mut) => {
                entity_mut.insert(Deactivated);
            }
            Err(_) => {
                crate::logger::log(&format!("Cascade object {:?} already despawned — skip", object));
            }
        }
    }
}
