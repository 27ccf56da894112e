//! Headless frame loop wiring the world to its systems.

use std::time::Duration;

use frost_defence_core::{config::GameConfig, BuildKind, Command, Event, GridCell, Layout};
use frost_defence_system_combat::Combat;
use frost_defence_system_movement::Movement;
use frost_defence_system_spawning::{Config as SpawningConfig, Spawning};
use frost_defence_world::{self as world, query, World};
use glam::Vec3;

/// Owns the world and every system, advancing them one frame at a time.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    movement: Movement,
    combat: Combat,
    entrances: Vec<GridCell>,
}

impl Simulation {
    pub(crate) fn new(layout: Layout, config: &GameConfig, seed: u64) -> Self {
        let entrances = layout.entrances();
        Self {
            world: World::new(layout, config.combat.clone()),
            spawning: Spawning::new(SpawningConfig::new(config.spawning.interval(), seed)),
            movement: Movement::new(),
            combat: Combat::new(),
            entrances,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Builds a structure on the platform nearest to `point`.
    pub(crate) fn place_near(&mut self, kind: BuildKind, point: Vec3) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(site) = query::buildable_site_near(&self.world, point) else {
            tracing::warn!(x = point.x, z = point.z, "no platform near requested point");
            return events;
        };
        world::apply(&mut self.world, Command::Build { kind, site }, &mut events);
        events
    }

    /// Builds up to `count` structures on free platforms in placement order.
    pub(crate) fn fill_sites(&mut self, kind: BuildKind, count: usize) -> Vec<Event> {
        let mut events = Vec::new();
        for site in query::available_sites(&self.world).into_iter().take(count) {
            world::apply(&mut self.world, Command::Build { kind, site }, &mut events);
        }
        events
    }

    /// Advances the simulation by one frame of `dt`.
    pub(crate) fn step(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            query::session(&self.world),
            &self.entrances,
            &mut commands,
        );
        self.movement.handle(
            &events,
            &query::combatant_view(&self.world),
            &self.world,
            &mut commands,
        );
        self.flush(&mut commands, &mut events);

        self.combat.handle(
            &events,
            &query::combatant_view(&self.world),
            &self.world,
            &mut commands,
        );
        self.flush(&mut commands, &mut events);

        events
    }

    fn flush(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_defence_core::SessionState;
    use frost_defence_system_bootstrap::Bootstrap;

    fn simulation(config: &GameConfig) -> Simulation {
        Simulation::new(Bootstrap.generate(&config.generation, 4), config, 4)
    }

    #[test]
    fn enemies_appear_after_spawn_interval() {
        let config = GameConfig::default();
        let mut sim = simulation(&config);

        for _ in 0..49 {
            let _ = sim.step(Duration::from_millis(100));
        }
        assert_eq!(query::enemies_alive(sim.world()), 0);

        let events = sim.step(Duration::from_millis(100));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EntitySpawned { .. })));
        assert_eq!(query::enemies_alive(sim.world()), 1);
    }

    #[test]
    fn fill_sites_occupies_platforms_in_order() {
        let config = GameConfig::default();
        let mut sim = simulation(&config);
        let first = query::available_sites(sim.world())[0];

        let events = sim.fill_sites(BuildKind::Defender, 4);

        let built = events
            .iter()
            .filter(|event| matches!(event, Event::StructureBuilt { .. }))
            .count();
        assert_eq!(built, 4);
        assert!(query::is_site_occupied(sim.world(), first));
        assert_eq!(query::summary(sim.world()).structures, 4);
    }

    #[test]
    fn place_near_resolves_world_point() {
        let config = GameConfig::default();
        let mut sim = simulation(&config);

        let events = sim.place_near(BuildKind::Tower, Vec3::new(23.3, 0.0, 38.6));

        assert!(events.iter().any(|event| matches!(
            event,
            Event::StructureBuilt {
                kind: BuildKind::Tower,
                site,
                ..
            } if *site == GridCell::new(23, 39)
        )));
        assert!(sim
            .place_near(BuildKind::Tower, Vec3::new(10.0, 0.0, 10.0))
            .is_empty());
    }

    #[test]
    fn undefended_objective_eventually_falls() {
        let mut config = GameConfig::default();
        config.spawning.interval_secs = 1.0;
        config.combat.objective.damage = 0.0;
        let mut sim = simulation(&config);

        let mut fell = false;
        for _ in 0..20_000 {
            let events = sim.step(Duration::from_millis(100));
            if events.contains(&Event::ObjectiveDestroyed) {
                fell = true;
                break;
            }
        }

        assert!(fell);
        assert_eq!(query::session(sim.world()), SessionState::Defeated);
    }

    #[test]
    fn defended_objective_holds_early_waves() {
        let config = GameConfig::default();
        let mut sim = simulation(&config);
        let _ = sim.fill_sites(BuildKind::Defender, 18);

        for _ in 0..600 {
            let _ = sim.step(Duration::from_millis(100));
        }

        assert_eq!(query::session(sim.world()), SessionState::Running);
        let objective = query::summary(sim.world())
            .objective_health
            .expect("objective standing");
        assert!(objective.current() > 0.0);
    }
}
