//! Health systems: invincibility tick, отключение коллайдеров при смерти

use bevy::prelude::*;
use bevy_rapier3d::prelude::ColliderDisabled;

use super::components::Health;

/// System: tick invincibility таймеров
///
/// Работает для ВСЕХ Health (включая скрытых и мёртвых акторов),
/// иначе окно, открытое рядом со смертью, ведёт себя непредсказуемо.
pub fn tick_health(mut query: Query<&mut Health>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut health in query.iter_mut() {
        health.tick(delta);
    }
}

/// Отключает collision surfaces умершего актора.
///
/// Идемпотентно: уже отключённые получают тот же маркер,
/// despawned entities пропускаются.
pub fn disable_colliders(world: &mut World, colliders: &[Entity]) -> usize {
    let mut disabled = 0;

    for &collider in colliders {
        match world.get_entity_mut(collider) {
            Ok(mut entity) => {
                entity.insert(ColliderDisabled);
                disabled += 1;
            }
            Err(_) => {
                crate::logger::log(&format!(
                    "Collider {:?} already despawned — skip",
                    collider
                ));
            }
        }
    }

    disabled
}
