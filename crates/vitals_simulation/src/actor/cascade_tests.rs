//! Tests for actor damage flow and death cascade.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bevy::prelude::*;
    use bevy_rapier3d::prelude::{ColliderDisabled, ExternalImpulse};

    use crate::actor::*;
    use crate::error::ActorSetupError;
    use crate::health::{Health, HealthChange, HealthConfig, HealthEventKind, INSTAKILL};
    use crate::player::{FireOutcome, Shooter};

    /// World с зарегистрированными событиями и ресурсами ActorPlugin
    fn actor_world() -> World {
        let mut world = World::new();
        world.init_resource::<Events<DamageRequest>>();
        world.init_resource::<Events<HealRequest>>();
        world.init_resource::<Events<ActorDamaged>>();
        world.init_resource::<Events<ActorHealed>>();
        world.init_resource::<Events<ActorDied>>();
        world.init_resource::<Events<Feedback>>();
        world.init_resource::<DeferredEffects>();
        world
    }

    fn config(name: &str, hp: f32) -> ActorConfig {
        ActorConfig {
            name: name.to_string(),
            health: HealthConfig {
                starting_hp: hp,
                ..default()
            },
            ..default()
        }
    }

    fn drain<E: Event>(world: &mut World) -> Vec<E> {
        world.resource_mut::<Events<E>>().drain().collect()
    }

    #[test]
    fn test_scenario_damage_then_death() {
        let mut world = actor_world();
        let actor = spawn_actor(&mut world, &config("grunt", 100.0), ActorLinks::default()).unwrap();

        assert!(world.take_damage(actor, 30.0, Vec3::ZERO));
        assert_eq!(world.get::<Health>(actor).unwrap().hp(), 70.0);

        let damaged = drain::<ActorDamaged>(&mut world);
        assert_eq!(damaged.len(), 1);
        assert_eq!((damaged[0].damage, damaged[0].hp), (30.0, 70.0));

        assert!(world.take_damage(actor, 80.0, Vec3::ZERO));
        assert!(!world.is_alive(actor));

        let died = drain::<ActorDied>(&mut world);
        assert_eq!(died.len(), 1);
        assert_eq!((died[0].damage, died[0].hp), (80.0, -10.0));
        assert_eq!(Some(died[0].id), world.actor_id(actor));

        assert!(!world.take_damage(actor, 10.0, Vec3::ZERO));
        assert_eq!(world.get::<Health>(actor).unwrap().hp(), -10.0);
        assert!(drain::<ActorDied>(&mut world).is_empty());
    }

    #[test]
    fn test_death_disables_gameplay_and_hides() {
        let mut world = actor_world();
        let actor = spawn_actor(&mut world, &config("turret", 10.0), ActorLinks::default()).unwrap();

        world.take_damage(actor, 50.0, Vec3::ZERO);

        let entity = world.entity(actor);
        assert!(entity.contains::<Dead>());
        assert!(entity.contains::<Hidden>());
        assert!(!entity.get::<Gameplay>().unwrap().any_enabled());

        let feedback: Vec<FeedbackKind> = drain::<Feedback>(&mut world).into_iter().map(|f| f.kind).collect();
        assert_eq!(
            feedback,
            vec![
                FeedbackKind::Sound(SoundCue::Death),
                FeedbackKind::DeathParticles,
                FeedbackKind::Hide,
            ]
        );
    }

    #[test]
    fn test_death_disables_non_player_shooter() {
        let mut world = actor_world();
        let actor = spawn_actor(&mut world, &config("turret", 10.0), ActorLinks::default()).unwrap();
        world.entity_mut(actor).insert(Shooter::default());

        world.take_damage(actor, INSTAKILL, Vec3::ZERO);

        let mut shooter = world.get_mut::<Shooter>(actor).unwrap();
        assert!(!shooter.is_enabled());
        assert_eq!(shooter.try_fire(), FireOutcome::Disabled);
    }

    #[test]
    fn test_damage_taken_triggers_flash_and_sound() {
        let mut world = actor_world();
        let actor = spawn_actor(&mut world, &config("grunt", 100.0), ActorLinks::default()).unwrap();

        world.take_damage(actor, 5.0, Vec3::ZERO);

        let feedback: Vec<FeedbackKind> = drain::<Feedback>(&mut world).into_iter().map(|f| f.kind).collect();
        assert_eq!(
            feedback,
            vec![FeedbackKind::DamageFlash, FeedbackKind::Sound(SoundCue::Damage)]
        );
        assert!(world.get::<Gameplay>(actor).unwrap().any_enabled());
    }

    #[test]
    fn test_cascade_kills_invulnerable_dependent() {
        let mut world = actor_world();

        let mut guard_config = config("shield-drone", 50.0);
        guard_config.health.invulnerable = true;
        let dependent = spawn_actor(&mut world, &guard_config, ActorLinks::default()).unwrap();

        let deaths = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&deaths);
        world
            .get::<Health>(dependent)
            .unwrap()
            .on_death
            .subscribe(move |change: &HealthChange| sink.lock().unwrap().push(*change));

        let source = spawn_actor(
            &mut world,
            &config("generator", 20.0),
            ActorLinks::default().kill_on_death([dependent]),
        )
        .unwrap();

        // Обычный урон по неуязвимому не проходит
        assert!(!world.take_damage(dependent, 10.0, Vec3::ZERO));

        assert!(world.take_damage(source, 25.0, Vec3::ZERO));

        assert!(!world.is_alive(source));
        assert!(!world.is_alive(dependent));
        assert_eq!(deaths.lock().unwrap().len(), 1);
        assert_eq!(deaths.lock().unwrap()[0].amount, INSTAKILL);

        let died: Vec<Entity> = drain::<ActorDied>(&mut world).into_iter().map(|d| d.entity).collect();
        assert_eq!(died.len(), 2);
        assert!(died.contains(&source) && died.contains(&dependent));
    }

    #[test]
    fn test_chained_cascade() {
        let mut world = actor_world();
        let c = spawn_actor(&mut world, &config("c", 10.0), ActorLinks::default()).unwrap();
        let b = spawn_actor(&mut world, &config("b", 10.0), ActorLinks::default().kill_on_death([c])).unwrap();
        let a = spawn_actor(&mut world, &config("a", 10.0), ActorLinks::default().kill_on_death([b])).unwrap();

        world.take_damage(a, 10.0, Vec3::ZERO);

        for actor in [a, b, c] {
            assert!(!world.is_alive(actor));
            assert!(world.entity(actor).contains::<Dead>());
        }

        // ActorDied в причинном порядке: источник раньше зависимых
        let died: Vec<Entity> = drain::<ActorDied>(&mut world).into_iter().map(|d| d.entity).collect();
        assert_eq!(died, vec![a, b, c]);
    }

    #[test]
    fn test_cascade_cycle_terminates() {
        let mut world = actor_world();
        let a = spawn_actor(&mut world, &config("a", 10.0), ActorLinks::default()).unwrap();
        let b = spawn_actor(&mut world, &config("b", 10.0), ActorLinks::default().kill_on_death([a])).unwrap();
        link_cascade(&mut world, a, b).unwrap();

        assert!(world.take_damage(a, 10.0, Vec3::ZERO));

        // A уже мёртв когда B пытается его убить — re-entry отклонён
        assert!(!world.is_alive(a));
        assert!(!world.is_alive(b));
        assert_eq!(drain::<ActorDied>(&mut world).len(), 2);
    }

    #[test]
    fn test_cascade_skips_despawned_links() {
        let mut world = actor_world();
        let gone = world.spawn_empty().id();
        let lamp = world.spawn_empty().id();
        let survivor = spawn_actor(&mut world, &config("survivor", 10.0), ActorLinks::default()).unwrap();

        let source = spawn_actor(
            &mut world,
            &config("boss", 10.0),
            ActorLinks::default()
                .kill_on_death([gone, survivor])
                .disable_on_death([gone, lamp]),
        )
        .unwrap();
        world.despawn(gone);

        assert!(world.take_damage(source, 100.0, Vec3::ZERO));

        assert!(!world.is_alive(survivor));
        assert!(world.entity(lamp).contains::<Deactivated>());
    }

    #[test]
    fn test_death_disables_colliders() {
        let mut world = actor_world();
        let hitbox = world.spawn_empty().id();
        let hurtbox = world.spawn_empty().id();
        let actor = spawn_actor(
            &mut world,
            &config("crate", 5.0),
            ActorLinks::default().colliders([hitbox, hurtbox]),
        )
        .unwrap();
        world.despawn(hurtbox);

        world.take_damage(actor, 5.0, Vec3::ZERO);

        assert!(world.entity(hitbox).contains::<ColliderDisabled>());
    }

    #[test]
    fn test_impulse_applied_to_body() {
        let mut world = actor_world();
        let actor = spawn_actor(&mut world, &config("grunt", 100.0), ActorLinks::default()).unwrap();
        world.entity_mut(actor).insert(ExternalImpulse::default());
        world.get_mut::<Health>(actor).unwrap().set_invulnerable(true);

        // Урон отклонён, knockback всё равно применён
        assert!(!world.take_damage(actor, 10.0, Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(world.get::<ExternalImpulse>(actor).unwrap().impulse, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_destroy_on_death_despawns_after_cascade() {
        let mut world = actor_world();
        let dependent = spawn_actor(&mut world, &config("minion", 10.0), ActorLinks::default()).unwrap();

        let mut boss_config = config("boss", 10.0);
        boss_config.destroy_on_death = true;
        let boss = spawn_actor(&mut world, &boss_config, ActorLinks::default().kill_on_death([dependent])).unwrap();

        assert!(world.take_damage(boss, 10.0, Vec3::ZERO));

        assert!(world.get_entity(boss).is_err());
        assert!(!world.is_alive(dependent));
        assert_eq!(drain::<ActorDied>(&mut world).len(), 2);
    }

    #[test]
    fn test_remove_after_schedules_despawn() {
        let mut world = actor_world();
        let mut corpse_config = config("corpse", 10.0);
        corpse_config.remove_after = Some(2.0);
        let actor = spawn_actor(&mut world, &corpse_config, ActorLinks::default()).unwrap();

        world.take_damage(actor, 10.0, Vec3::ZERO);
        assert_eq!(world.resource::<DeferredEffects>().pending_for(actor), 1);

        // Конец шага смерти: отсчёт ещё не идёт
        run_deferred(&mut world, 1.0);
        assert!(world.get_entity(actor).is_ok());

        run_deferred(&mut world, 1.0);
        assert!(world.get_entity(actor).is_ok());

        run_deferred(&mut world, 1.5);
        assert!(world.get_entity(actor).is_err());
    }

    #[test]
    fn test_multiple_lethal_requests_single_death() {
        let mut world = actor_world();
        let actor = spawn_actor(&mut world, &config("grunt", 10.0), ActorLinks::default()).unwrap();

        for _ in 0..3 {
            world.send_event(DamageRequest {
                target: actor,
                damage: 50.0,
                impulse: Vec3::ZERO,
            });
        }
        apply_damage_requests(&mut world);

        assert_eq!(drain::<ActorDied>(&mut world).len(), 1);
    }

    #[test]
    fn test_heal_request_and_dead_heal() {
        let mut world = actor_world();
        let actor = spawn_actor(&mut world, &config("grunt", 100.0), ActorLinks::default()).unwrap();
        world.take_damage(actor, 40.0, Vec3::ZERO);

        world.send_event(HealRequest { target: actor, amount: 25.0 });
        apply_damage_requests(&mut world);
        assert_eq!(world.get::<Health>(actor).unwrap().hp(), 85.0);
        assert_eq!(drain::<ActorHealed>(&mut world).len(), 1);

        world.take_damage(actor, 200.0, Vec3::ZERO);
        assert!(!world.gain_health(actor, 50.0));
        assert!(drain::<ActorHealed>(&mut world).is_empty());
    }

    #[test]
    fn test_custom_reaction_runs_after_common() {
        let mut world = actor_world();
        let actor = spawn_actor(&mut world, &config("grunt", 10.0), ActorLinks::default()).unwrap();
        let seen_dead = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&seen_dead);
        world
            .get_mut::<ActorReactions>(actor)
            .unwrap()
            .register(HealthEventKind::Death, move |world, entity, _| {
                *slot.lock().unwrap() = Some(world.entity(entity).contains::<Dead>());
            });

        world.take_damage(actor, 10.0, Vec3::ZERO);
        assert_eq!(*seen_dead.lock().unwrap(), Some(true));
    }

    #[test]
    fn test_spawn_rejects_misconfiguration() {
        let mut world = actor_world();
        let before = world.entities().len();

        let result = spawn_actor(&mut world, &config("broken", 0.0), ActorLinks::default());
        assert!(matches!(result, Err(ActorSetupError::InvalidStartingHp(_))));

        let mut negative_window = config("broken", 10.0);
        negative_window.health.invincible_after_hit = -1.0;
        assert!(matches!(
            spawn_actor(&mut world, &negative_window, ActorLinks::default()),
            Err(ActorSetupError::InvalidInvincibility(_))
        ));

        assert_eq!(world.entities().len(), before);
    }

    #[test]
    fn test_validate_actor_reports_missing_components() {
        let mut world = actor_world();
        let bare = world.spawn(Actor::new()).id();

        assert!(matches!(
            validate_actor(&world, bare),
            Err(ActorSetupError::MissingComponent { component: "Health", .. })
        ));

        let actor = spawn_actor(&mut world, &config("ok", 10.0), ActorLinks::default()).unwrap();
        assert!(matches!(
            link_cascade(&mut world, actor, actor),
            Err(ActorSetupError::SelfCascade(_))
        ));
        assert!(validate_actor(&world, actor).is_ok());
    }

    #[test]
    fn test_actor_config_from_json() {
        let config = ActorConfig::from_json(
            r#"{ "name": "sentry", "health": { "starting_hp": 40.0, "invincible_after_hit": 0.25 }, "destroy_on_death": true }"#,
        )
        .unwrap();

        assert_eq!(config.name, "sentry");
        assert_eq!(config.health.starting_hp, 40.0);
        assert!(!config.health.invulnerable);
        assert!(config.destroy_on_death);
        assert!(config.hide_on_death);

        assert!(matches!(
            ActorConfig::from_json(r#"{ "health": { "starting_hp": -5.0 } }"#),
            Err(ActorSetupError::InvalidStartingHp(_))
        ));
        assert!(matches!(
            ActorConfig::from_json("{ not json"),
            Err(ActorSetupError::ParseConfig(_))
        ));
    }

    #[test]
    fn test_actor_ids_are_unique() {
        let mut world = actor_world();
        let a = spawn_actor(&mut world, &config("a", 10.0), ActorLinks::default()).unwrap();
        let b = spawn_actor(&mut world, &config("b", 10.0), ActorLinks::default()).unwrap();

        assert_ne!(world.actor_id(a), world.actor_id(b));
        let bare = world.spawn_empty().id();
        assert!(world.actor_id(bare).is_none());
    }
}
