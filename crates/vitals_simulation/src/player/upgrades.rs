//! UpgradeState — состояние апгрейдов способностей
//!
//! Явный ресурс (контекст), передаётся в `Shooter::apply_upgrades` по ссылке.
//! Изменения анонсируются через `EventChannel::on_ability_upgraded`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::events::{EventChannel, UpgradeKind};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeState {
    pub weapon_upgraded: bool,
    pub upgraded_shots_count: u32,
    pub melee_upgraded: bool,
    pub upgraded_melee_damage_mod: f32,
}

impl Default for UpgradeState {
    fn default() -> Self {
        Self {
            weapon_upgraded: false,
            upgraded_shots_count: 8,
            melee_upgraded: false,
            upgraded_melee_damage_mod: 1.5,
        }
    }
}

impl UpgradeState {
    pub fn unlock(&mut self, kind: UpgradeKind) {
        match kind {
            UpgradeKind::Weapon => self.weapon_upgraded = true,
            UpgradeKind::Melee => self.melee_upgraded = true,
        }
    }
}

/// Разблокировать апгрейд и оповестить подписчиков канала
pub fn upgrade_ability(world: &mut World, kind: UpgradeKind) {
    world.get_resource_or_insert_with(UpgradeState::default).unlock(kind);

    if let Some(channel) = world.get_resource::<EventChannel>().cloned() {
        channel.on_ability_upgraded.invoke(&kind);
    }

    crate::logger::log_info(&format!("⬆️ Ability upgraded: {:?}", kind));
}
