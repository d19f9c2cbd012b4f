//! Actor events — Bevy events для внешних consumer'ов
//!
//! Input (→ ECS):
//! - DamageRequest / HealRequest: queued форма take_damage / gain_health
//!
//! Output (ECS →):
//! - ActorDamaged / ActorHealed / ActorDied: re-broadcast для UI, objectives
//! - Feedback: звук, VFX, camera shake (audio/render — out of scope)

use bevy::prelude::*;

use super::components::ActorId;
use crate::events::HazardKind;

/// Запрос урона (hazard tick, projectile hit, script)
#[derive(Event, Debug, Clone)]
pub struct DamageRequest {
    pub target: Entity,
    pub damage: f32,
    pub impulse: Vec3,
}

/// Запрос лечения
#[derive(Event, Debug, Clone)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Событие: актор получил несмертельный урон
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ActorDamaged {
    pub entity: Entity,
    pub id: ActorId,
    pub damage: f32,
    pub hp: f32,
}

/// Событие: актор вылечился
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ActorHealed {
    pub entity: Entity,
    pub id: ActorId,
    pub amount: f32,
    pub hp: f32,
}

/// Событие: актор умер (ровно одно на актора)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ActorDied {
    pub entity: Entity,
    pub id: ActorId,
    pub damage: f32,
    pub hp: f32,
}

/// Звуковые cue (playback — audio слой)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Damage,
    Death,
    NoAmmo,
    HazardLoopStart(HazardKind),
    HazardLoopStop(HazardKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackKind {
    DamageFlash,
    Sound(SoundCue),
    DeathParticles,
    Hide,
    CameraShake { impulse: Vec3 },
}

/// Запрос reactive эффекта для render/audio/camera слоёв
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub entity: Entity,
    pub kind: FeedbackKind,
}

/// Отправить Feedback из exclusive контекста
pub fn send_feedback(world: &mut World, entity: Entity, kind: FeedbackKind) {
    world.send_event(Feedback { entity, kind });
}
