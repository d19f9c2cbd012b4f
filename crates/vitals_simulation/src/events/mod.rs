//! Event Channel — typed publish/subscribe
//!
//! - channel: `EventHandler<E>` (subscriber list per kind), `Inbox<E>` (pub/sub → ECS)
//! - global: `EventChannel` resource (cross-actor домен события), `ChannelSubscriptions`
//!
//! Per-actor каналы (HealthGained/DamageTaken/Death) живут в `Health`.

pub mod channel;
pub mod global;


pub use channel::{EventHandler, Inbox, SubscriptionId};
pub use global::{
    release_channel_subscriptions, ChannelKind, ChannelSubscriptions, EventChannel,
    FreezeTime, GamepadShake, HazardKind, UpgradeKind,
};
