//! Health domain — HP, invulnerability gates, alive/dead state machine
//!
//! ECS ответственность:
//! - Health component (state machine + per-actor event channels)
//! - tick_health (invincibility window)
//! - disable_colliders (death → ColliderDisabled)
//!
//! Реакции на события (звук, cascade) — в `actor` домене.

pub mod components;
pub mod systems;


pub use components::{Health, HealthChange, HealthConfig, HealthEventKind, INSTAKILL};
pub use systems::{disable_colliders, tick_health};
