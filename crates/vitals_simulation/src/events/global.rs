//! EventChannel — глобальный cross-actor канал
//!
//! Доменные события, не привязанные к конкретному Health:
//! hazard enter/exit, подбор аптечки, апгрейды, смерть игрока, haptics, freeze time.
//!
//! Живёт как Bevy Resource (явный контекст вместо singleton'а).
//! Подписчики-акторы хранят свои id в `ChannelSubscriptions` и отписываются
//! при teardown (`despawn_actor`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::channel::{EventHandler, SubscriptionId};

/// Тип опасной зоны
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Lava,
    Acid,
    Spikes,
}

/// Тип апгрейда способности
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Weapon,
    Melee,
}

/// Gamepad rumble запрос (consumer — haptics, out of scope)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamepadShake {
    pub intensity: f32,
    pub duration: f32,
}

/// Hit-stop / slow-motion запрос
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezeTime {
    pub duration: f32,
    pub time_scale: f32,
}

/// Фиксированное перечисление kind'ов глобального канала
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    HazardEnter,
    HazardExit,
    GainHealth,
    AbilityUpgraded,
    PlayerDeath,
    ShakeGamepad,
    FreezeTime,
}

/// Глобальный канал: по одному `EventHandler` на kind
#[derive(Resource, Clone, Debug, Default)]
pub struct EventChannel {
    pub on_hazard_enter: EventHandler<HazardKind>,
    pub on_hazard_exit: EventHandler<HazardKind>,
    pub on_gain_health: EventHandler<f32>,
    pub on_ability_upgraded: EventHandler<UpgradeKind>,
    pub on_player_death: EventHandler<()>,
    pub on_shake_gamepad: EventHandler<GamepadShake>,
    pub on_freeze_time: EventHandler<FreezeTime>,
}

impl EventChannel {
    /// Отписка по kind + id (kind нужен т.к. id уникален только внутри канала)
    pub fn unsubscribe(&self, kind: ChannelKind, id: SubscriptionId) -> bool {
        match kind {
            ChannelKind::HazardEnter => self.on_hazard_enter.unsubscribe(id),
            ChannelKind::HazardExit => self.on_hazard_exit.unsubscribe(id),
            ChannelKind::GainHealth => self.on_gain_health.unsubscribe(id),
            ChannelKind::AbilityUpgraded => self.on_ability_upgraded.unsubscribe(id),
            ChannelKind::PlayerDeath => self.on_player_death.unsubscribe(id),
            ChannelKind::ShakeGamepad => self.on_shake_gamepad.unsubscribe(id),
            ChannelKind::FreezeTime => self.on_freeze_time.unsubscribe(id),
        }
    }

    pub fn subscriber_count(&self, kind: ChannelKind) -> usize {
        match kind {
            ChannelKind::HazardEnter => self.on_hazard_enter.len(),
            ChannelKind::HazardExit => self.on_hazard_exit.len(),
            ChannelKind::GainHealth => self.on_gain_health.len(),
            ChannelKind::AbilityUpgraded => self.on_ability_upgraded.len(),
            ChannelKind::PlayerDeath => self.on_player_death.len(),
            ChannelKind::ShakeGamepad => self.on_shake_gamepad.len(),
            ChannelKind::FreezeTime => self.on_freeze_time.len(),
        }
    }
}

/// Подписки entity на глобальный канал (для отписки при teardown)
#[derive(Component, Debug, Default, Clone)]
pub struct ChannelSubscriptions {
    entries: Vec<(ChannelKind, SubscriptionId)>,
}

impl ChannelSubscriptions {
    pub fn push(&mut self, kind: ChannelKind, id: SubscriptionId) {
        self.entries.push((kind, id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Отписаться от всего (идемпотентно: список очищается)
    pub fn unsubscribe_all(&mut self, channel: &EventChannel) {
        for (kind, id) in self.entries.drain(..) {
            channel.unsubscribe(kind, id);
        }
    }
}

/// Teardown: снять все подписки entity с глобального канала
pub fn release_channel_subscriptions(world: &mut World, entity: Entity) {
    let Some(channel) = world.get_resource::<EventChannel>().cloned() else {
        return;
    };

    if let Some(mut subscriptions) = world.get_mut::<ChannelSubscriptions>(entity) {
        subscriptions.unsubscribe_all(&channel);
    }
}
