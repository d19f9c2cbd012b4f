//! Actor spawn / validation / teardown
//!
//! Misconfiguration = fatal setup ошибка: актор с неполной конфигурацией
//! не активируется (spawn возвращает Err и ничего не оставляет в World).

use bevy::prelude::*;

use super::components::{Actor, ActorConfig, ActorLinks, DeathPolicy, Gameplay};
use super::reactions::ActorReactions;
use crate::error::ActorSetupError;
use crate::events::release_channel_subscriptions;
use crate::health::Health;

/// Spawn актора: Actor + Health + ActorReactions (common) + Gameplay + DeathPolicy + ActorLinks
pub fn spawn_actor(
    world: &mut World,
    config: &ActorConfig,
    links: ActorLinks,
) -> Result<Entity, ActorSetupError> {
    config.validate()?;

    let health = Health::from_config(&config.health).with_colliders(links.colliders.clone());
    let actor = Actor::new();
    let id = actor.id();

    let entity = world
        .spawn((
            actor,
            Name::new(config.name.clone()),
            health,
            ActorReactions::with_common(),
            Gameplay::default(),
            DeathPolicy::from(config),
            links,
        ))
        .id();

    if let Err(err) = validate_actor(world, entity) {
        world.despawn(entity);
        return Err(err);
    }

    crate::logger::log(&format!(
        "Spawned actor '{}' {:?} (id {}, hp {})",
        config.name,
        entity,
        id.raw(),
        config.health.starting_hp
    ));

    Ok(entity)
}

/// Проверка что entity — полностью сконфигурированный актор
pub fn validate_actor(world: &World, entity: Entity) -> Result<(), ActorSetupError> {
    let entity_ref = world
        .get_entity(entity)
        .map_err(|_| ActorSetupError::NoSuchEntity(entity))?;

    if !entity_ref.contains::<Actor>() {
        return Err(ActorSetupError::MissingComponent { entity, component: "Actor" });
    }
    if !entity_ref.contains::<Health>() {
        return Err(ActorSetupError::MissingComponent { entity, component: "Health" });
    }
    if !entity_ref.contains::<ActorReactions>() {
        return Err(ActorSetupError::MissingComponent {
            entity,
            component: "ActorReactions",
        });
    }

    if let Some(links) = entity_ref.get::<ActorLinks>() {
        if links.kill_on_death.contains(&entity) {
            return Err(ActorSetupError::SelfCascade(entity));
        }
    }

    Ok(())
}

/// Добавить `dependent` в kill_on_death списка `source` (после spawn обоих)
pub fn link_cascade(world: &mut World, source: Entity, dependent: Entity) -> Result<(), ActorSetupError> {
    if source == dependent {
        return Err(ActorSetupError::SelfCascade(source));
    }
    if world.get_entity(dependent).is_err() {
        return Err(ActorSetupError::NoSuchEntity(dependent));
    }

    let mut source_ref = world
        .get_entity_mut(source)
        .map_err(|_| ActorSetupError::NoSuchEntity(source))?;

    match source_ref.get_mut::<ActorLinks>() {
        Some(mut links) => links.kill_on_death.push(dependent),
        None => {
            source_ref.insert(ActorLinks::default().kill_on_death([dependent]));
        }
    }

    Ok(())
}

/// Teardown: отписка от глобального канала + despawn.
///
/// false если entity уже удалена.
pub fn despawn_actor(world: &mut World, entity: Entity) -> bool {
    if world.get_entity(entity).is_err() {
        return false;
    }

    release_channel_subscriptions(world, entity);
    crate::logger::log(&format!("⚰️ Despawning actor {:?}", entity));
    world.despawn(entity)
}
