//! Headless симуляция VITALS
//!
//! Player стоит в лаве, boss с двумя minions получает урон от выстрелов.
//! Печатает состояние каждые 60 тиков.

use bevy::prelude::*;
use vitals_simulation::events::HazardKind;
use vitals_simulation::player::{AttackKind, FireIntent};
use vitals_simulation::*;

const TICKS: usize = 900;

fn actor_config(name: &str, hp: f32) -> ActorConfig {
    ActorConfig {
        name: name.to_string(),
        health: HealthConfig {
            starting_hp: hp,
            invincible_after_hit: 0.5,
            ..default()
        },
        remove_after: Some(2.0),
        ..default()
    }
}

fn step(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut().resource_mut::<Time<Fixed>>().advance_by(timestep);
    app.world_mut().run_schedule(FixedUpdate);
}

fn main() -> Result<(), ActorSetupError> {
    let seed = 42;
    println!("Starting VITALS headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    let world = app.world_mut();

    let minion_a = spawn_actor(world, &actor_config("minion A", 30.0), ActorLinks::default())?;
    let minion_b = spawn_actor(world, &actor_config("minion B", 30.0), ActorLinks::default())?;
    let boss = spawn_actor(
        world,
        &actor_config("boss", 120.0),
        ActorLinks::default().kill_on_death([minion_a, minion_b]),
    )?;
    let player = spawn_player(
        world,
        &ActorConfig::from_json(r#"{ "name": "Player", "health": { "starting_hp": 100.0 } }"#)?,
        ActorLinks::default(),
        &ShooterConfig::default(),
    )?;

    world.resource::<EventChannel>().on_hazard_enter.invoke(&HazardKind::Lava);

    for tick in 0..TICKS {
        let world = app.world_mut();

        // Каждые 0.5 сек: выстрел игрока по боссу, лава по игроку
        if tick % 30 == 0 {
            world.send_event(FireIntent {
                shooter: player,
                attack: AttackKind::Ranged,
            });
            world.send_event(DamageRequest {
                target: boss,
                damage: 15.0,
                impulse: Vec3::ZERO,
            });
            world.send_event(DamageRequest {
                target: player,
                damage: 8.0,
                impulse: Vec3::new(0.0, 1.0, 0.0),
            });
        }

        step(&mut app);

        if tick % 60 == 0 {
            let world = app.world();
            let hp = |entity: Entity| world.get::<Health>(entity).map(Health::hp);
            println!(
                "Tick {}: player {:?}, boss {:?}, minions {:?}/{:?}, entities {}",
                tick,
                hp(player),
                hp(boss),
                hp(minion_a),
                hp(minion_b),
                world.entities().len()
            );
        }
    }

    println!("Simulation complete!");
    Ok(())
}
