//! VITALS Simulation Core
//!
//! ECS-симуляция жизненного цикла акторов на Bevy 0.16:
//! - Timer (нормализованный таймер, cooldown / recharge)
//! - Health state machine (invulnerability gates, alive → dead)
//! - Event Channel (typed pub/sub: per-actor + глобальный)
//! - Actor death cascade (INSTAKILL зависимых, deferred removal)
//! - Player (haptics, camera shake, ammo recharge, upgrades)
//!
//! Render / audio / haptics — внешние consumer'ы `Feedback` событий и канала.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod error;
pub mod events;
pub mod health;
pub mod logger;
pub mod player;
pub mod timer;

// Re-export базовых типов для удобства
pub use actor::{
    spawn_actor, Actor, ActorConfig, ActorDied, ActorId, ActorLinks, ActorPlugin, ActorWorldExt,
    DamageRequest, Dead, Feedback, FeedbackKind, HealRequest, VitalsSet,
};
pub use error::ActorSetupError;
pub use events::{EventChannel, EventHandler, SubscriptionId};
pub use health::{Health, HealthChange, HealthConfig, HealthEventKind, INSTAKILL};
pub use player::{spawn_player, Player, PlayerPlugin, Shooter, ShooterConfig};
pub use timer::Timer;

pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Глобальный канал (cross-actor события)
            .init_resource::<events::EventChannel>()
            // Input → Actors → Attacks
            .configure_sets(
                FixedUpdate,
                (VitalsSet::Input, VitalsSet::Actors, VitalsSet::Attacks).chain(),
            )
            .add_plugins((ActorPlugin, PlayerPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (SimulationPlugin включён)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot HP/alive всех акторов для сравнения детерминизма
pub fn vitals_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &Health, Has<Dead>)>();
    let mut entities: Vec<_> = query
        .iter(world)
        .map(|(entity, health, dead)| (entity, health.hp(), health.is_alive(), dead))
        .collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, ..)| entity.index());

    for (entity, hp, alive, dead) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(&hp.to_le_bytes());
        snapshot.push(alive as u8);
        snapshot.push(dead as u8);
    }

    snapshot
}
