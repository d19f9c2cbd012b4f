//! Shooter — ranged/melee атаки на таймерах (игрок, турели)
//!
//! - recharging: `tick_reversed`, value = доля доступных зарядов (0..1)
//! - shooting / meleeing: короткие threshold окна (нельзя спамить атакой)
//!
//! Выстрел тратит ровно один заряд: `set_value(value - 1/num_shots)`,
//! перезарядка продолжается без рестарта таймера.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::upgrades::UpgradeState;
use crate::actor::{Dead, Feedback, FeedbackKind, Gameplay, SoundCue};
use crate::timer::Timer;

// Float погрешность после нескольких set_value(value - 1/n)
const CHARGE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    /// Время полной перезарядки (секунды)
    pub recharge_time: f32,
    pub num_shots: u32,
    pub shooting_threshold: f32,
    pub melee_threshold: f32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            recharge_time: 3.0,
            num_shots: 5,
            shooting_threshold: 0.1,
            melee_threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired,
    /// Нет целого заряда (no-ammo click)
    NoAmmo,
    /// Ещё идёт предыдущий выстрел
    Busy,
    /// Shooter выключен (смерть)
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Ranged,
    Melee,
}

/// Event: input/AI хочет атаковать
#[derive(Event, Debug, Clone)]
pub struct FireIntent {
    pub shooter: Entity,
    pub attack: AttackKind,
}

/// Event: атака состоялась (weapon/projectile слой — out of scope)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub attack: AttackKind,
    pub damage_multiplier: f32,
}

#[derive(Component, Debug, Clone)]
pub struct Shooter {
    enabled: bool,
    num_shots: u32,
    recharging: Timer,
    shooting: Timer,
    meleeing: Timer,
    melee_damage_multiplier: f32,
}

impl Default for Shooter {
    fn default() -> Self {
        Self::new(&ShooterConfig::default())
    }
}

impl Shooter {
    pub fn new(config: &ShooterConfig) -> Self {
        let mut recharging = Timer::with_duration(config.recharge_time);
        recharging.start(); // value = 1 → полный магазин

        Self {
            enabled: true,
            num_shots: config.num_shots,
            recharging,
            shooting: Timer::with_duration(config.shooting_threshold),
            meleeing: Timer::with_duration(config.melee_threshold),
            melee_damage_multiplier: 1.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn num_shots(&self) -> u32 {
        self.num_shots
    }

    pub fn available_shots(&self) -> u32 {
        (self.recharging.value() * self.num_shots as f32 + CHARGE_EPSILON).floor() as u32
    }

    pub fn is_shooting(&self) -> bool {
        self.shooting.active()
    }

    pub fn is_meleeing(&self) -> bool {
        self.meleeing.active()
    }

    pub fn melee_damage_multiplier(&self) -> f32 {
        self.melee_damage_multiplier
    }

    pub fn try_fire(&mut self) -> FireOutcome {
        if !self.enabled {
            return FireOutcome::Disabled;
        }
        if self.shooting.active() {
            return FireOutcome::Busy;
        }
        if self.available_shots() < 1 {
            return FireOutcome::NoAmmo;
        }

        self.shooting.start();
        self.spend_charge();
        FireOutcome::Fired
    }

    /// Melee: false если выключен или окно предыдущего удара ещё активно
    pub fn try_melee(&mut self) -> bool {
        if !self.enabled || self.meleeing.active() {
            return false;
        }

        self.meleeing.start();
        true
    }

    fn spend_charge(&mut self) {
        let per_shot = 1.0 / self.num_shots.max(1) as f32;
        self.recharging.set_value(self.recharging.value() - per_shot);
    }

    pub fn tick(&mut self, delta: f32) {
        self.recharging.tick_reversed(delta);
        self.shooting.tick(delta);
        self.meleeing.tick(delta);
    }

    pub fn apply_upgrades(&mut self, upgrades: &UpgradeState) {
        if upgrades.weapon_upgraded {
            self.num_shots = upgrades.upgraded_shots_count;
        }
        if upgrades.melee_upgraded {
            self.melee_damage_multiplier = upgrades.upgraded_melee_damage_mod;
        }
    }
}

/// System: tick таймеров Shooter'ов
pub fn tick_shooters(mut shooters: Query<&mut Shooter>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut shooter in shooters.iter_mut() {
        shooter.tick(delta);
    }
}

/// System: FireIntent → WeaponFired (или no-ammo click)
///
/// Intent'ы мёртвых акторов и акторов с выключенной атакой отбрасываются.
pub fn process_fire_intents(
    mut intents: EventReader<FireIntent>,
    mut shooters: Query<(&mut Shooter, Option<&Gameplay>, Has<Dead>)>,
    mut fired_events: EventWriter<WeaponFired>,
    mut feedback: EventWriter<Feedback>,
) {
    for intent in intents.read() {
        let Ok((mut shooter, gameplay, dead)) = shooters.get_mut(intent.shooter) else {
            crate::logger::log_warning(&format!("FireIntent: {:?} has no Shooter", intent.shooter));
            continue;
        };

        if dead || gameplay.is_some_and(|g| !g.attack) {
            crate::logger::log(&format!("FireIntent: {:?} cannot attack — skip", intent.shooter));
            continue;
        }

        match intent.attack {
            AttackKind::Ranged => match shooter.try_fire() {
                FireOutcome::Fired => {
                    fired_events.write(WeaponFired {
                        shooter: intent.shooter,
                        attack: AttackKind::Ranged,
                        damage_multiplier: 1.0,
                    });
                }
                FireOutcome::NoAmmo => {
                    feedback.write(Feedback {
                        entity: intent.shooter,
                        kind: FeedbackKind::Sound(SoundCue::NoAmmo),
                    });
                }
                FireOutcome::Busy | FireOutcome::Disabled => {}
            },
            AttackKind::Melee => {
                if shooter.try_melee() {
                    fired_events.write(WeaponFired {
                        shooter: intent.shooter,
                        attack: AttackKind::Melee,
                        damage_multiplier: shooter.melee_damage_multiplier(),
                    });
                }
            }
        }
    }
}
