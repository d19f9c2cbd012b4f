//! Damage / heal entry points актора
//!
//! Flow:
//! 1. impulse → ExternalImpulse тела (если есть rigid body)
//! 2. Health::take_damage (guards + per-actor каналы)
//! 3. Death → disable_colliders
//! 4. Re-broadcast: ActorDamaged / ActorDied
//! 5. ActorReactions (feedback, cascade, removal)
//!
//! Событие источника уходит до реакций: ActorDied источника cascade'а
//! всегда раньше ActorDied зависимых.

use bevy::prelude::*;
use bevy_rapier3d::prelude::ExternalImpulse;

use super::components::{Actor, ActorId};
use super::events::{ActorDamaged, ActorDied, ActorHealed, DamageRequest, HealRequest};
use super::reactions::dispatch_reactions;
use crate::health::{disable_colliders, Health, HealthChange, HealthEventKind};

/// Операции над акторами прямо на `World` (exclusive контекст, тесты, scripts)
pub trait ActorWorldExt {
    fn take_damage(&mut self, target: Entity, damage: f32, impulse: Vec3) -> bool;
    fn gain_health(&mut self, target: Entity, amount: f32) -> bool;
    fn is_alive(&self, target: Entity) -> bool;
    fn actor_id(&self, target: Entity) -> Option<ActorId>;
}

impl ActorWorldExt for World {
    fn take_damage(&mut self, target: Entity, damage: f32, impulse: Vec3) -> bool {
        take_damage(self, target, damage, impulse)
    }

    fn gain_health(&mut self, target: Entity, amount: f32) -> bool {
        gain_health(self, target, amount)
    }

    fn is_alive(&self, target: Entity) -> bool {
        is_alive(self, target)
    }

    fn actor_id(&self, target: Entity) -> Option<ActorId> {
        self.get::<Actor>(target).map(Actor::id)
    }
}

pub fn is_alive(world: &World, target: Entity) -> bool {
    world.get::<Health>(target).is_some_and(|h| h.is_alive())
}

/// Урон актору. Возвращает результат Health (false = отклонено guard'ом).
pub fn take_damage(world: &mut World, target: Entity, damage: f32, impulse: Vec3) -> bool {
    if world.get_entity(target).is_err() {
        crate::logger::log(&format!("take_damage: {:?} despawned — ignore", target));
        return false;
    }

    // Impulse применяется даже если урон отклонён (knockback от неуязвимого)
    if impulse != Vec3::ZERO {
        if let Some(mut body) = world.get_mut::<ExternalImpulse>(target) {
            body.impulse += impulse;
        }
    }

    let (change, died, colliders) = {
        let Some(mut health) = world.get_mut::<Health>(target) else {
            crate::logger::log_warning(&format!("take_damage: {:?} has no Health component", target));
            return false;
        };

        let was_alive = health.is_alive();
        if !health.take_damage(damage) {
            return false;
        }

        let died = was_alive && !health.is_alive();
        let colliders = if died { health.colliders().to_vec() } else { Vec::new() };
        (HealthChange { amount: damage, hp: health.hp() }, died, colliders)
    };

    let id = world.get::<Actor>(target).map(Actor::id);

    if died {
        disable_colliders(world, &colliders);
        crate::logger::log_info(&format!(
            "💀 Actor {:?} died ({} damage, hp {})",
            target, change.amount, change.hp
        ));

        if let Some(id) = id {
            world.send_event(ActorDied {
                entity: target,
                id,
                damage: change.amount,
                hp: change.hp,
            });
        }
        dispatch_reactions(world, target, HealthEventKind::Death, change);
    } else {
        if let Some(id) = id {
            world.send_event(ActorDamaged {
                entity: target,
                id,
                damage: change.amount,
                hp: change.hp,
            });
        }
        dispatch_reactions(world, target, HealthEventKind::DamageTaken, change);
    }

    true
}

/// Лечение актора. false если мёртв / нет Health.
pub fn gain_health(world: &mut World, target: Entity, amount: f32) -> bool {
    let change = {
        let Some(mut health) = world.get_mut::<Health>(target) else {
            return false;
        };
        if !health.gain_health(amount) {
            return false;
        }
        HealthChange { amount, hp: health.hp() }
    };

    if let Some(id) = world.get::<Actor>(target).map(Actor::id) {
        world.send_event(ActorHealed {
            entity: target,
            id,
            amount: change.amount,
            hp: change.hp,
        });
    }

    dispatch_reactions(world, target, HealthEventKind::HealthGained, change);

    true
}

/// System: queued DamageRequest / HealRequest → take_damage / gain_health
///
/// Exclusive: cascade требует `&mut World`. Запросы одного шага
/// обрабатываются в порядке отправки (лечение после урона).
pub fn apply_damage_requests(world: &mut World) {
    let damage_requests: Vec<DamageRequest> = match world.get_resource_mut::<Events<DamageRequest>>() {
        Some(mut events) => events.drain().collect(),
        None => Vec::new(),
    };

    for request in damage_requests {
        take_damage(world, request.target, request.damage, request.impulse);
    }

    let heal_requests: Vec<HealRequest> = match world.get_resource_mut::<Events<HealRequest>>() {
        Some(mut events) => events.drain().collect(),
        None => Vec::new(),
    };

    for request in heal_requests {
        gain_health(world, request.target, request.amount);
    }
}
