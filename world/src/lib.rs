#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Frost Defence.
//!
//! The world owns the frozen [`Layout`] produced by generation and a
//! generational entity table. It mutates exclusively through [`apply`] and
//! exposes read-only access through the [`query`] module.

mod entities;
mod navigation;

use std::{collections::BTreeMap, time::Duration};

use frost_defence_core::{
    config::{CombatConfig, UnitConfig},
    ground_distance, AttackDelivery, BuildKind, Command, CombatantState, DamageOutcome,
    EntityHandle, EntityKind, EntityProbe, Event, GridCell, Health, Layout, PlacementError,
    ReservationKind, RouteService, SessionState, SpatialQuery, WELCOME_BANNER,
};
use glam::Vec3;
use slotmap::SlotMap;

use entities::{Combatant, Entity, Projectile};
use navigation::NavigationField;

/// Represents the authoritative Frost Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    layout: Layout,
    combat: CombatConfig,
    entities: SlotMap<EntityHandle, Entity>,
    occupied_sites: BTreeMap<GridCell, EntityHandle>,
    navigation: NavigationField,
    objective: Option<EntityHandle>,
    session: SessionState,
    tick_index: u64,
}

impl World {
    /// Creates a world around a generated layout and arms the objective.
    #[must_use]
    pub fn new(layout: Layout, combat: CombatConfig) -> Self {
        let occupancy = layout.occupancy();
        let objective_cell = layout.objective();
        let navigation = NavigationField::build(layout.grid_size(), &[objective_cell], |cell| {
            cell == objective_cell || occupancy.kind_at_cell(cell) == Some(ReservationKind::Path)
        });

        let mut world = Self {
            banner: WELCOME_BANNER,
            layout,
            combat,
            entities: SlotMap::with_key(),
            occupied_sites: BTreeMap::new(),
            navigation,
            objective: None,
            session: SessionState::Running,
            tick_index: 0,
        };

        let position = objective_cell.to_world(world.layout.tiers().objective as f32);
        let unit = world.combat.objective.clone();
        world.objective = Some(world.spawn_combatant(EntityKind::Objective, position, &unit, None));
        world
    }

    fn spawn_combatant(
        &mut self,
        kind: EntityKind,
        position: Vec3,
        unit: &UnitConfig,
        site: Option<GridCell>,
    ) -> EntityHandle {
        let combatant = Combatant {
            health: Health::full(unit.health),
            profile: unit.profile(),
            state: CombatantState::idle(),
            speed: unit.movement_speed,
            site,
        };
        self.entities
            .insert(Entity::combatant(kind, position, combatant))
    }

    fn unit_config(&self, kind: BuildKind) -> UnitConfig {
        match kind {
            BuildKind::Defender => self.combat.defender.clone(),
            BuildKind::Tower => self.combat.tower.clone(),
        }
    }

    fn is_platform(&self, site: GridCell) -> bool {
        self.layout
            .platforms()
            .iter()
            .any(|platform| platform.site == site)
    }

    fn set_state(
        &mut self,
        entity: EntityHandle,
        state: CombatantState,
        out_events: &mut Vec<Event>,
    ) {
        let Some(combatant) = self
            .entities
            .get_mut(entity)
            .and_then(Entity::as_combatant_mut)
        else {
            return;
        };

        let previous = combatant.state.target();
        combatant.state = state;
        let current = state.target();
        if previous == current {
            return;
        }

        match current {
            Some(target) => out_events.push(Event::TargetAcquired { entity, target }),
            None => out_events.push(Event::TargetLost { entity }),
        }
    }

    fn resolve_attack(
        &mut self,
        attacker: EntityHandle,
        target: EntityHandle,
        out_events: &mut Vec<Event>,
    ) {
        let Some(attacker_entity) = self.entities.get(attacker) else {
            return;
        };
        let Some(combatant) = attacker_entity.as_combatant() else {
            return;
        };
        let profile = combatant.profile;
        let origin = attacker_entity.position;
        let attacker_kind = attacker_entity.kind;

        let valid = self.entities.get(target).is_some_and(|victim| {
            victim.as_combatant().is_some()
                && attacker_kind.targets(victim.kind)
                && ground_distance(origin, victim.position) <= profile.range
        });

        if !valid {
            tracing::debug!(?attacker, ?target, "attack dropped stale target");
            self.set_state(attacker, CombatantState::idle(), out_events);
            return;
        }

        match profile.delivery {
            AttackDelivery::Instant => {
                out_events.push(Event::AttackDelivered {
                    attacker,
                    target,
                    damage: profile.damage,
                });
                self.apply_damage(target, profile.damage, out_events);
            }
            AttackDelivery::Projectile { speed } => {
                let projectile = self.entities.insert(Entity::projectile(
                    origin,
                    Projectile {
                        target,
                        speed,
                        damage: profile.damage,
                    },
                ));
                out_events.push(Event::EntitySpawned {
                    entity: projectile,
                    kind: EntityKind::Projectile,
                    position: origin,
                });
                out_events.push(Event::ProjectileLaunched {
                    projectile,
                    attacker,
                    target,
                });
            }
        }
    }

    fn apply_damage(&mut self, entity: EntityHandle, amount: f32, out_events: &mut Vec<Event>) {
        let Some(combatant) = self
            .entities
            .get_mut(entity)
            .and_then(Entity::as_combatant_mut)
        else {
            return;
        };

        let outcome = combatant.health.take_damage(amount);
        if outcome == DamageOutcome::Ignored {
            return;
        }

        out_events.push(Event::DamageApplied {
            entity,
            amount,
            remaining: combatant.health.current(),
        });

        if outcome == DamageOutcome::Destroyed {
            self.destroy(entity, out_events);
        }
    }

    fn destroy(&mut self, entity: EntityHandle, out_events: &mut Vec<Event>) {
        let Some(removed) = self.entities.remove(entity) else {
            return;
        };

        if let Some(site) = removed.as_combatant().and_then(|combatant| combatant.site) {
            let _ = self.occupied_sites.remove(&site);
        }

        out_events.push(Event::EntityDestroyed {
            entity,
            kind: removed.kind,
        });

        if removed.kind == EntityKind::Objective {
            self.objective = None;
            self.session = SessionState::Defeated;
            out_events.push(Event::ObjectiveDestroyed);
            tracing::info!(tick = self.tick_index, "objective destroyed; session over");
        }
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let projectiles: Vec<(EntityHandle, Projectile)> = self
            .entities
            .iter()
            .filter_map(|(handle, entity)| entity.as_projectile().map(|body| (handle, body)))
            .collect();

        for (handle, projectile) in projectiles {
            if self.session == SessionState::Defeated {
                return;
            }

            let Some(target_position) = self.entities.get(projectile.target).map(|e| e.position)
            else {
                out_events.push(Event::ProjectileExpired { projectile: handle });
                self.destroy(handle, out_events);
                continue;
            };
            let Some(entity) = self.entities.get_mut(handle) else {
                continue;
            };

            let travel = projectile.speed * dt.as_secs_f32();
            let remaining = ground_distance(entity.position, target_position);
            if remaining <= travel {
                entity.position = target_position;
                out_events.push(Event::ProjectileImpacted {
                    projectile: handle,
                    target: projectile.target,
                    damage: projectile.damage,
                });
                self.destroy(handle, out_events);
                self.apply_damage(projectile.target, projectile.damage, out_events);
            } else {
                let heading = target_position - entity.position;
                entity.position += heading * (travel / remaining);
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.session == SessionState::Defeated {
        if let Command::Build { kind, site } = command {
            out_events.push(Event::BuildRejected {
                kind,
                site,
                reason: PlacementError::SessionOver,
            });
        }
        return;
    }

    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_projectiles(dt, out_events);
        }
        Command::SpawnEnemy { entrance } => {
            if !world.layout.entrances().contains(&entrance) {
                tracing::warn!(x = entrance.x(), z = entrance.z(), "spawn outside entrances");
                out_events.push(Event::SpawnRejected { entrance });
                return;
            }

            let position = entrance.to_world((world.layout.tiers().path + 1) as f32);
            let unit = world.combat.enemy.clone();
            let entity = world.spawn_combatant(EntityKind::Enemy, position, &unit, None);
            out_events.push(Event::EntitySpawned {
                entity,
                kind: EntityKind::Enemy,
                position,
            });
        }
        Command::Build { kind, site } => {
            let rejection = if !world.is_platform(site) {
                Some(PlacementError::NotBuildable)
            } else if world.occupied_sites.contains_key(&site) {
                Some(PlacementError::Occupied)
            } else {
                None
            };
            if let Some(reason) = rejection {
                tracing::info!(?kind, ?reason, x = site.x(), z = site.z(), "build rejected");
                out_events.push(Event::BuildRejected { kind, site, reason });
                return;
            }

            let position = site.to_world((world.layout.tiers().platform + 1) as f32);
            let unit = world.unit_config(kind);
            let entity = world.spawn_combatant(kind.entity_kind(), position, &unit, Some(site));
            let _ = world.occupied_sites.insert(site, entity);
            out_events.push(Event::EntitySpawned {
                entity,
                kind: kind.entity_kind(),
                position,
            });
            out_events.push(Event::StructureBuilt { entity, kind, site });
        }
        Command::SetCombatState { entity, state } => {
            world.set_state(entity, state, out_events);
        }
        Command::Attack { attacker, target } => {
            world.resolve_attack(attacker, target, out_events);
        }
        Command::MoveEnemy { enemy, position } => {
            let Some(entity) = world.entities.get_mut(enemy) else {
                return;
            };
            if entity.kind != EntityKind::Enemy {
                return;
            }
            let from = entity.position;
            entity.position = position;
            out_events.push(Event::EnemyMoved {
                enemy,
                from,
                to: position,
            });
        }
    }
}

impl SpatialQuery for World {
    fn entities_in_radius(&self, center: Vec3, radius: f32, out: &mut Vec<EntityProbe>) {
        out.clear();
        out.extend(
            self.entities
                .iter()
                .filter(|(_, entity)| ground_distance(center, entity.position) <= radius)
                .map(|(handle, entity)| entity.probe(handle)),
        );
        out.sort_by(|a, b| {
            ground_distance(center, a.position)
                .total_cmp(&ground_distance(center, b.position))
                .then(a.entity.cmp(&b.entity))
        });
    }

    fn probe(&self, entity: EntityHandle) -> Option<EntityProbe> {
        self.entities.get(entity).map(|record| record.probe(entity))
    }
}

impl RouteService for World {
    fn next_waypoint(&self, from: Vec3) -> Option<Vec3> {
        let cell = GridCell::nearest(from);
        let next = self.navigation.next_hop(cell)?;
        Some(next.to_world(from.y))
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use frost_defence_core::{
        CombatantView, EntityHandle, EntityKind, GridCell, Health, Layout, SessionState,
        TierPosition,
    };
    use glam::Vec3;

    /// Maximum per-axis distance, in cells, between a point and the site it resolves to.
    pub const SITE_TOLERANCE: u32 = 1;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the generated battlefield.
    #[must_use]
    pub fn layout(world: &World) -> &Layout {
        &world.layout
    }

    /// Current lifecycle state of the session.
    #[must_use]
    pub fn session(world: &World) -> SessionState {
        world.session
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Handle of the objective while it stands.
    #[must_use]
    pub fn objective(world: &World) -> Option<EntityHandle> {
        world.objective
    }

    /// Captures a read-only view of every combatant.
    #[must_use]
    pub fn combatant_view(world: &World) -> CombatantView {
        CombatantView::from_snapshots(
            world
                .entities
                .iter()
                .filter_map(|(handle, entity)| entity.snapshot(handle))
                .collect(),
        )
    }

    /// Number of enemies currently alive.
    #[must_use]
    pub fn enemies_alive(world: &World) -> usize {
        count_kind(world, EntityKind::Enemy)
    }

    /// Resolves a world-space point to the nearest free or occupied platform.
    ///
    /// The point is rounded to its cell at the platform tier. Points with no
    /// reservation within [`SITE_TOLERANCE`] on every axis are rejected;
    /// otherwise platforms within the tolerance are considered, closest first.
    #[must_use]
    pub fn buildable_site_near(world: &World, point: Vec3) -> Option<GridCell> {
        let cell = GridCell::nearest(point);
        let position = TierPosition::at(cell, world.layout.tiers().platform);
        if !world.layout.occupancy().is_near(position, SITE_TOLERANCE) {
            return None;
        }
        world
            .layout
            .platforms()
            .iter()
            .map(|platform| platform.site)
            .filter(|site| site.chebyshev_distance(cell) <= SITE_TOLERANCE)
            .min_by_key(|site| (site.manhattan_distance(cell), *site))
    }

    /// Reports whether a structure stands on the site.
    #[must_use]
    pub fn is_site_occupied(world: &World, site: GridCell) -> bool {
        world.occupied_sites.contains_key(&site)
    }

    /// Platforms still available for construction, in placement order.
    #[must_use]
    pub fn available_sites(world: &World) -> Vec<GridCell> {
        world
            .layout
            .platforms()
            .iter()
            .map(|platform| platform.site)
            .filter(|site| !world.occupied_sites.contains_key(site))
            .collect()
    }

    /// Aggregated counters describing the session.
    #[must_use]
    pub fn summary(world: &World) -> SessionSummary {
        SessionSummary {
            tick_index: world.tick_index,
            session: world.session,
            enemies_alive: enemies_alive(world),
            structures: world.occupied_sites.len(),
            projectiles_in_flight: count_kind(world, EntityKind::Projectile),
            objective_health: world
                .objective
                .and_then(|handle| world.entities.get(handle))
                .and_then(|entity| entity.as_combatant())
                .map(|combatant| combatant.health),
        }
    }

    fn count_kind(world: &World, kind: EntityKind) -> usize {
        world
            .entities
            .values()
            .filter(|entity| entity.kind == kind)
            .count()
    }

    /// Aggregated counters describing a session.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct SessionSummary {
        /// Number of ticks processed.
        pub tick_index: u64,
        /// Lifecycle state.
        pub session: SessionState,
        /// Enemies currently alive.
        pub enemies_alive: usize,
        /// Structures standing on platforms.
        pub structures: usize,
        /// Projectiles currently in flight.
        pub projectiles_in_flight: usize,
        /// Objective health while it stands.
        pub objective_health: Option<Health>,
    }
}
