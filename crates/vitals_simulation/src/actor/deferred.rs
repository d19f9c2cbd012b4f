//! Deferred effects — отложенные continuation'ы (follow-up pulse, delayed despawn)
//!
//! Continuation резолвится на одном из следующих шагов симуляции, никогда в том же:
//! первый `run_deferred` после schedule закрывает текущий шаг и только "взводит"
//! запись, задержка отсчитывается со следующего вызова.
//! Владелец мог быть удалён раньше — поэтому каждая запись несёт liveness guard,
//! проверяемый прямо перед выполнением.

use bevy::prelude::*;

use crate::health::Health;
use crate::timer::Timer;

/// Условие выполнения отложенного эффекта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Entity ещё не despawned
    Exists,
    /// Entity существует и Health жив
    Alive,
}

type DeferredAction = Box<dyn FnOnce(&mut World, Entity) + Send + Sync>;

struct Scheduled {
    owner: Entity,
    guard: Liveness,
    delay: Timer,
    /// false до конца шага, в котором запись создана
    armed: bool,
    action: DeferredAction,
}

/// Очередь отложенных эффектов (FIFO среди одновременно созревших)
#[derive(Resource, Default)]
pub struct DeferredEffects {
    queue: Vec<Scheduled>,
}

impl std::fmt::Debug for DeferredEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredEffects")
            .field("pending", &self.queue.len())
            .finish()
    }
}

impl DeferredEffects {
    pub fn schedule(
        &mut self,
        owner: Entity,
        delay: f32,
        guard: Liveness,
        action: impl FnOnce(&mut World, Entity) + Send + Sync + 'static,
    ) {
        let mut timer = Timer::with_duration(delay);
        timer.start();

        self.queue.push(Scheduled {
            owner,
            guard,
            delay: timer,
            armed: false,
            action: Box::new(action),
        });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending записи конкретного владельца
    pub fn pending_for(&self, owner: Entity) -> usize {
        self.queue.iter().filter(|s| s.owner == owner).count()
    }

    fn take_due(&mut self, delta: f32) -> Vec<Scheduled> {
        for scheduled in self.queue.iter_mut().filter(|s| s.armed) {
            scheduled.delay.tick(delta);
        }

        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|s| s.armed && !s.delay.active());
        self.queue = pending;
        due
    }

    /// Конец шага: всё, что запланировано до сих пор, начинает отсчёт
    fn arm_pending(&mut self) {
        for scheduled in self.queue.iter_mut() {
            scheduled.armed = true;
        }
    }
}

fn guard_holds(world: &World, owner: Entity, guard: Liveness) -> bool {
    let Ok(entity) = world.get_entity(owner) else {
        return false;
    };

    match guard {
        Liveness::Exists => true,
        Liveness::Alive => entity.get::<Health>().is_some_and(|h| h.is_alive()),
    }
}

/// Schedule из exclusive контекста (no-op + warning без ресурса)
pub fn schedule_deferred(
    world: &mut World,
    owner: Entity,
    delay: f32,
    guard: Liveness,
    action: impl FnOnce(&mut World, Entity) + Send + Sync + 'static,
) {
    match world.get_resource_mut::<DeferredEffects>() {
        Some(mut deferred) => deferred.schedule(owner, delay, guard, action),
        None => crate::logger::log_warning(&format!(
            "DeferredEffects resource missing — effect for {:?} dropped",
            owner
        )),
    }
}

/// Продвинуть очередь на `delta` и выполнить созревшие эффекты.
///
/// Записи, созданные с прошлого вызова (в том числе созревшими эффектами
/// этого вызова), не тикают до следующего шага.
/// Возвращает число выполненных (отброшенные guard'ом не считаются).
pub fn run_deferred(world: &mut World, delta: f32) -> usize {
    let due = match world.get_resource_mut::<DeferredEffects>() {
        Some(mut deferred) => deferred.take_due(delta),
        None => return 0,
    };

    let mut executed = 0;
    for scheduled in due {
        if !guard_holds(world, scheduled.owner, scheduled.guard) {
            crate::logger::log(&format!(
                "Deferred effect for {:?} dropped (guard {:?} failed)",
                scheduled.owner, scheduled.guard
            ));
            continue;
        }

        (scheduled.action)(world, scheduled.owner);
        executed += 1;
    }

    if let Some(mut deferred) = world.get_resource_mut::<DeferredEffects>() {
        deferred.arm_pending();
    }

    executed
}

/// System: deferred effects (FixedUpdate)
pub fn run_deferred_effects(world: &mut World) {
    let delta = world
        .get_resource::<Time<Fixed>>()
        .map(|time| time.delta_secs())
        .unwrap_or_default();

    run_deferred(world, delta);
}
