//! Player components: Player marker, PlayerInbox (глобальный канал → ECS)

use bevy::prelude::*;

use crate::events::{HazardKind, Inbox, UpgradeKind};

/// Игрок
///
/// Снимается при смерти (враги перестают его таргетить),
/// поэтому `With<Player>` = живой игрок.
///
/// `active_hazards` — зоны, в которых игрок сейчас стоит (для остановки
/// looping звуков при смерти).
#[derive(Component, Debug, Clone, Default)]
pub struct Player {
    pub active_hazards: Vec<HazardKind>,
}

/// Имя игрока после смерти
pub const DEAD_PLAYER_NAME: &str = "Player (DEAD)";

/// Буферы подписок игрока на глобальный `EventChannel`.
///
/// Handlers канала не видят World, поэтому складывают события сюда,
/// `drain_player_inbox` разбирает их в том же шаге.
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerInbox {
    pub gain_health: Inbox<f32>,
    pub hazard_enter: Inbox<HazardKind>,
    pub hazard_exit: Inbox<HazardKind>,
    pub ability_upgraded: Inbox<UpgradeKind>,
}
