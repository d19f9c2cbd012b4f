//! Player reactions + global channel inbox
//!
//! Регистрируются поверх common реакций актора (`spawn_player`),
//! поэтому выполняются ПОСЛЕ flash/sound/cascade.

use bevy::prelude::*;
use rand::Rng;

use super::player::{Player, PlayerInbox, DEAD_PLAYER_NAME};
use super::shooter::Shooter;
use super::upgrades::UpgradeState;
use crate::actor::{
    despawn_actor, gain_health, schedule_deferred, send_feedback, FeedbackKind, Liveness, SoundCue,
};
use crate::events::{release_channel_subscriptions, EventChannel, FreezeTime, GamepadShake};
use crate::health::HealthChange;
use crate::DeterministicRng;

/// Задержка второго camera pulse
pub const SHAKE_FOLLOW_UP_DELAY: f32 = 0.1;
/// Через сколько убирается труп игрока
pub const PLAYER_CORPSE_LIFETIME: f32 = 10.0;

const HIT_SHAKE_PER_DAMAGE: f32 = 0.1;
const HIT_GAMEPAD_SHAKE: GamepadShake = GamepadShake { intensity: 0.2, duration: 0.5 };
const DEATH_GAMEPAD_SHAKE: GamepadShake = GamepadShake { intensity: 1.0, duration: 0.7 };
const DEATH_FREEZE: FreezeTime = FreezeTime { duration: 1.0, time_scale: 0.3 };

/// Случайное направление в плоскости экрана (x/y)
fn random_shake_direction(world: &mut World) -> Vec3 {
    let angle = match world.get_resource_mut::<DeterministicRng>() {
        Some(mut rng) => rng.rng.gen_range(0.0..std::f32::consts::TAU),
        None => 0.0,
    };

    Vec3::new(angle.cos(), angle.sin(), 0.0)
}

fn camera_pulse(world: &mut World, entity: Entity, impulse: Vec3) {
    send_feedback(world, entity, FeedbackKind::CameraShake { impulse });
}

/// DamageTaken игрока: rumble + два camera pulse (второй через 0.1 сек)
pub fn player_damage_actions(world: &mut World, entity: Entity, change: HealthChange) {
    if let Some(channel) = world.get_resource::<EventChannel>().cloned() {
        channel.on_shake_gamepad.invoke(&HIT_GAMEPAD_SHAKE);
    }

    let impulse = random_shake_direction(world) * change.amount * HIT_SHAKE_PER_DAMAGE;
    camera_pulse(world, entity, impulse);

    schedule_deferred(world, entity, SHAKE_FOLLOW_UP_DELAY, Liveness::Exists, move |world, entity| {
        camera_pulse(world, entity, impulse);
    });
}

/// Death игрока.
///
/// Shooter уже выключен common death реакцией.
/// Порядок: hazard loops off → rename/untag → отписка от канала →
/// PlayerDeath / haptics / freeze → camera pulses → despawn через 10 сек.
pub fn player_death_actions(world: &mut World, entity: Entity, _change: HealthChange) {
    let active_hazards = world
        .get_mut::<Player>(entity)
        .map(|mut player| std::mem::take(&mut player.active_hazards))
        .unwrap_or_default();

    for hazard in active_hazards {
        send_feedback(world, entity, FeedbackKind::Sound(SoundCue::HazardLoopStop(hazard)));
    }

    // Враги таргетят `With<Player>` — после remove игрок для них не существует
    if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
        entity_mut.insert(Name::new(DEAD_PLAYER_NAME));
        entity_mut.remove::<Player>();
    }

    release_channel_subscriptions(world, entity);

    if let Some(channel) = world.get_resource::<EventChannel>().cloned() {
        channel.on_player_death.invoke(&());
        channel.on_shake_gamepad.invoke(&DEATH_GAMEPAD_SHAKE);
        channel.on_freeze_time.invoke(&DEATH_FREEZE);
    }

    camera_pulse(world, entity, Vec3::X);
    schedule_deferred(world, entity, SHAKE_FOLLOW_UP_DELAY, Liveness::Exists, |world, entity| {
        camera_pulse(world, entity, Vec3::Y);
    });

    schedule_deferred(world, entity, PLAYER_CORPSE_LIFETIME, Liveness::Exists, |world, entity| {
        despawn_actor(world, entity);
    });

    crate::logger::log_info(&format!("🪦 Player {:?} died", entity));
}

/// System: разобрать inbox'ы глобального канала
///
/// Exclusive: gain_health запускает реакции актора.
pub fn drain_player_inbox(world: &mut World) {
    let mut query = world.query::<(Entity, &PlayerInbox)>();
    let inboxes: Vec<(Entity, PlayerInbox)> = query
        .iter(world)
        .map(|(entity, inbox)| (entity, inbox.clone()))
        .collect();

    for (entity, inbox) in inboxes {
        for amount in inbox.gain_health.drain() {
            gain_health(world, entity, amount);
        }

        for hazard in inbox.hazard_enter.drain() {
            let Some(mut player) = world.get_mut::<Player>(entity) else {
                continue;
            };
            if !player.active_hazards.contains(&hazard) {
                player.active_hazards.push(hazard);
            }
            send_feedback(world, entity, FeedbackKind::Sound(SoundCue::HazardLoopStart(hazard)));
        }

        for hazard in inbox.hazard_exit.drain() {
            let Some(mut player) = world.get_mut::<Player>(entity) else {
                continue;
            };
            player.active_hazards.retain(|active| *active != hazard);
            send_feedback(world, entity, FeedbackKind::Sound(SoundCue::HazardLoopStop(hazard)));
        }

        if inbox.ability_upgraded.drain().is_empty() {
            continue;
        }

        let upgrades = world.get_resource::<UpgradeState>().cloned().unwrap_or_default();
        if let Some(mut shooter) = world.get_mut::<Shooter>(entity) {
            shooter.apply_upgrades(&upgrades);
        }
    }
}
