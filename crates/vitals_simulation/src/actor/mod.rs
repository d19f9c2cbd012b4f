//! Actor domain — Health + reactions + death cascade
//!
//! ECS ответственность:
//! - Actor identity, config, weak links (ActorLinks)
//! - Damage flow: take_damage → Health → ActorReactions → re-broadcast events
//! - Death cascade: INSTAKILL зависимых, Deactivated объектов
//! - Deferred effects с liveness guard'ами
//!
//! Render/audio/camera слои читают `Feedback` события.

use bevy::prelude::*;

pub mod components;
pub mod damage;
pub mod deferred;
pub mod events;
pub mod reactions;
pub mod spawn;

#[cfg(test)]
mod cascade_tests;

pub use components::{
    Actor, ActorConfig, ActorId, ActorLinks, Dead, DeathPolicy, Deactivated, Gameplay, Hidden,
};
pub use damage::{apply_damage_requests, gain_health, is_alive, take_damage, ActorWorldExt};
pub use deferred::{run_deferred, run_deferred_effects, schedule_deferred, DeferredEffects, Liveness};
pub use events::{
    send_feedback, ActorDamaged, ActorDied, ActorHealed, DamageRequest, Feedback, FeedbackKind,
    HealRequest, SoundCue,
};
pub use reactions::{
    cascade_death, common_damage_actions, common_death_actions, dispatch_reactions, ActorReactions,
    Reaction,
};
pub use spawn::{despawn_actor, link_cascade, spawn_actor, validate_actor};

/// Actor Plugin
///
/// Регистрирует события и системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. tick_health — invincibility windows (для всех, включая мёртвых)
/// 2. apply_damage_requests — queued урон/лечение → cascade
/// 3. run_deferred_effects — follow-up pulses, delayed despawn
pub struct ActorPlugin;

impl Plugin for ActorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>()
            .add_event::<HealRequest>()
            .add_event::<ActorDamaged>()
            .add_event::<ActorHealed>()
            .add_event::<ActorDied>()
            .add_event::<Feedback>()
            .init_resource::<DeferredEffects>();

        app.add_systems(
            FixedUpdate,
            (
                crate::health::tick_health,
                apply_damage_requests,
                run_deferred_effects,
            )
                .chain()
                .in_set(VitalsSet::Actors),
        );
    }
}

/// Порядок наборов систем внутри FixedUpdate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VitalsSet {
    /// Inbox'ы глобального канала, таймеры способностей
    Input,
    /// Damage / death cascade / deferred
    Actors,
    /// Атаки (после того как мёртвые выключены)
    Attacks,
}
