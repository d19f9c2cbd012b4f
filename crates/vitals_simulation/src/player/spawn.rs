use bevy::prelude::*;

use super::player::{Player, PlayerInbox};
use super::reactions::{player_damage_actions, player_death_actions};
use super::shooter::{Shooter, ShooterConfig};
use super::upgrades::UpgradeState;
use crate::actor::{spawn_actor, ActorConfig, ActorLinks, ActorReactions};
use crate::error::ActorSetupError;
use crate::events::{ChannelKind, ChannelSubscriptions, EventChannel};
use crate::health::HealthEventKind;

/// Spawn игрока: обычный актор + Player, Shooter, подписки на глобальный канал.
///
/// Без `EventChannel` ресурса игрок не создаётся.
pub fn spawn_player(
    world: &mut World,
    config: &ActorConfig,
    links: ActorLinks,
    shooter_config: &ShooterConfig,
) -> Result<Entity, ActorSetupError> {
    let channel = world
        .get_resource::<EventChannel>()
        .cloned()
        .ok_or(ActorSetupError::MissingResource("EventChannel"))?;

    let entity = spawn_actor(world, config, links)?;

    let mut shooter = Shooter::new(shooter_config);
    if let Some(upgrades) = world.get_resource::<UpgradeState>() {
        shooter.apply_upgrades(upgrades);
    }

    let mut subscriptions = ChannelSubscriptions::default();
    let (id, gain_health) = channel.on_gain_health.subscribe_inbox();
    subscriptions.push(ChannelKind::GainHealth, id);
    let (id, hazard_enter) = channel.on_hazard_enter.subscribe_inbox();
    subscriptions.push(ChannelKind::HazardEnter, id);
    let (id, hazard_exit) = channel.on_hazard_exit.subscribe_inbox();
    subscriptions.push(ChannelKind::HazardExit, id);
    let (id, ability_upgraded) = channel.on_ability_upgraded.subscribe_inbox();
    subscriptions.push(ChannelKind::AbilityUpgraded, id);

    let inbox = PlayerInbox {
        gain_health,
        hazard_enter,
        hazard_exit,
        ability_upgraded,
    };

    world
        .entity_mut(entity)
        .insert((Player::default(), shooter, inbox, subscriptions));

    if let Some(mut reactions) = world.get_mut::<ActorReactions>(entity) {
        reactions
            .register(HealthEventKind::DamageTaken, player_damage_actions)
            .register(HealthEventKind::Death, player_death_actions);
    }

    crate::logger::log_info(&format!("🎮 Player spawned: {:?}", entity));

    Ok(entity)
}
