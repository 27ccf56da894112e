use std::time::Duration;

use frost_defence_core::{
    config::{CombatConfig, GenerationConfig},
    ground_distance, Command, Edge, EntityKind, Event, GridCell,
};
use frost_defence_system_bootstrap::Bootstrap;
use frost_defence_system_movement::Movement;
use frost_defence_world::{self as world, query, World};

fn small_world() -> World {
    let generation = GenerationConfig {
        grid_size: 10,
        entrances: vec![Edge::South],
        ..GenerationConfig::default()
    };
    World::new(Bootstrap.generate(&generation, 1), CombatConfig::default())
}

fn frame(world: &mut World, movement: &mut Movement, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    movement.handle(&events, &query::combatant_view(world), world, &mut commands);
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn enemies_walk_to_objective_and_stop_in_range() {
    let mut world = small_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            entrance: GridCell::new(5, 0),
        },
        &mut events,
    );
    let mut movement = Movement::new();

    for _ in 0..100 {
        let _ = frame(&mut world, &mut movement, Duration::from_millis(100));
    }

    let view = query::combatant_view(&world).into_vec();
    let objective = view
        .iter()
        .find(|snapshot| snapshot.kind == EntityKind::Objective)
        .expect("objective present");
    let enemy = view
        .iter()
        .find(|snapshot| snapshot.kind == EntityKind::Enemy)
        .expect("enemy present");

    let distance = ground_distance(enemy.position, objective.position);
    assert!(distance <= enemy.profile.range);
    assert!(distance > 1.0);
    assert_eq!(enemy.position.x, 5.0);

    let still = frame(&mut world, &mut movement, Duration::from_millis(100));
    assert!(!still
        .iter()
        .any(|event| matches!(event, Event::EnemyMoved { .. })));
}

#[test]
fn each_move_respects_speed() {
    let mut world = small_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            entrance: GridCell::new(5, 0),
        },
        &mut events,
    );
    let mut movement = Movement::new();

    for _ in 0..10 {
        for event in frame(&mut world, &mut movement, Duration::from_millis(200)) {
            if let Event::EnemyMoved { from, to, .. } = event {
                assert!(ground_distance(from, to) <= 3.5 * 0.2 + 1e-4);
            }
        }
    }
}
