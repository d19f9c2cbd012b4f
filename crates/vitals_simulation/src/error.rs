//! Setup-time ошибки (misconfiguration)
//!
//! Steady-state операции (take_damage / gain_health) ошибок не возвращают —
//! отказ по guard'у это bool false. Здесь только то, что должно
//! остановить активацию актора.

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActorSetupError {
    #[error("invalid starting hp {0}: must be finite and > 0")]
    InvalidStartingHp(f32),

    #[error("invalid invincibility window {0}s: must be finite and >= 0")]
    InvalidInvincibility(f32),

    #[error("invalid removal delay {0}s: must be finite and >= 0")]
    InvalidRemovalDelay(f32),

    #[error("actor {0:?} lists itself as a death-cascade target")]
    SelfCascade(Entity),

    #[error("actor {entity:?} is missing required component {component}")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),

    #[error("resource {0} is not initialised (add SimulationPlugin)")]
    MissingResource(&'static str),

    #[error("failed to parse actor config")]
    ParseConfig(#[from] serde_json::Error),
}
