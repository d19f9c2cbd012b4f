//! Player domain — игрок поверх обычного актора
//!
//! - Player / PlayerInbox: tag + буферы глобального канала
//! - Shooter: ammo recharge и attack threshold таймеры
//! - UpgradeState: апгрейды способностей
//! - reactions: haptics, camera shake, death sequence

use bevy::prelude::*;

pub mod player;
pub mod reactions;
pub mod shooter;
pub mod spawn;
pub mod upgrades;


pub use player::{Player, PlayerInbox, DEAD_PLAYER_NAME};
pub use reactions::{
    drain_player_inbox, player_damage_actions, player_death_actions, PLAYER_CORPSE_LIFETIME,
    SHAKE_FOLLOW_UP_DELAY,
};
pub use shooter::{
    process_fire_intents, tick_shooters, AttackKind, FireIntent, FireOutcome, Shooter, ShooterConfig,
    WeaponFired,
};
pub use spawn::spawn_player;
pub use upgrades::{upgrade_ability, UpgradeState};

use crate::actor::VitalsSet;

/// Player Plugin
///
/// Input: inbox'ы канала + таймеры Shooter'а (до damage/death)
/// Attacks: FireIntent → WeaponFired (мёртвые уже выключены)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FireIntent>()
            .add_event::<WeaponFired>()
            .init_resource::<UpgradeState>();

        app.add_systems(
            FixedUpdate,
            (tick_shooters, drain_player_inbox).chain().in_set(VitalsSet::Input),
        );

        app.add_systems(FixedUpdate, process_fire_intents.in_set(VitalsSet::Attacks));
    }
}
