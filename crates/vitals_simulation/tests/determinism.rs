//! Тесты детерминизма
//!
//! Проверяем что симуляция с одинаковым seed даёт идентичные результаты:
//! случайный урон (DeterministicRng) по акторам с cascade связями.

use bevy::prelude::*;
use rand::Rng;
use vitals_simulation::*;

/// Система: каждый шаг случайный урон случайному актору
fn random_damage(
    mut rng: ResMut<DeterministicRng>,
    actors: Query<Entity, With<Actor>>,
    mut requests: EventWriter<DamageRequest>,
) {
    let mut targets: Vec<Entity> = actors.iter().collect();
    if targets.is_empty() {
        return;
    }
    targets.sort_by_key(|entity| entity.index());

    let target = targets[rng.rng.gen_range(0..targets.len())];
    let damage = rng.rng.gen_range(1.0..12.0);
    requests.write(DamageRequest {
        target,
        damage,
        impulse: Vec3::ZERO,
    });
}

fn step(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut().resource_mut::<Time<Fixed>>().advance_by(timestep);
    app.world_mut().run_schedule(FixedUpdate);
}

/// Запускает симуляцию и возвращает snapshot мира
fn run_simulation(seed: u64, group_count: usize, tick_count: usize) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    app.add_systems(FixedUpdate, random_damage.in_set(VitalsSet::Input));

    let world = app.world_mut();
    for group in 0..group_count {
        let minions: Vec<Entity> = (0..3)
            .map(|i| {
                spawn_actor(
                    world,
                    &ActorConfig {
                        name: format!("minion {}-{}", group, i),
                        health: HealthConfig {
                            starting_hp: 40.0,
                            invincible_after_hit: 0.2,
                            ..default()
                        },
                        remove_after: Some(1.0),
                        ..default()
                    },
                    ActorLinks::default(),
                )
                .unwrap()
            })
            .collect();

        spawn_actor(
            world,
            &ActorConfig {
                name: format!("leader {}", group),
                health: HealthConfig {
                    starting_hp: 80.0,
                    ..default()
                },
                ..default()
            },
            ActorLinks::default().kill_on_death(minions),
        )
        .unwrap();
    }

    for _ in 0..tick_count {
        step(&mut app);
    }

    vitals_snapshot(app.world_mut())
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let snapshot1 = run_simulation(SEED, 10, 600);
    let snapshot2 = run_simulation(SEED, 10, 600);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    // Запускаем 5 раз — все должны быть идентичны
    let snapshots: Vec<_> = (0..5).map(|_| run_simulation(SEED, 5, 300)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_different_seeds_diverge() {
    let snapshot1 = run_simulation(1, 5, 300);
    let snapshot2 = run_simulation(2, 5, 300);

    assert_ne!(snapshot1, snapshot2);
}
