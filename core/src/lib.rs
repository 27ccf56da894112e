#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Frost Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The one-shot generation pipeline
//! threads an [`OccupancyGrid`] through path carving, platform placement and
//! terrain filling before freezing the result into a [`Layout`]. At runtime,
//! adapters submit [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values for systems to react to. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

pub mod config;

mod combat;
mod layout;
mod occupancy;

pub use combat::{
    AttackDelivery, CombatPhase, CombatProfile, CombatantState, DamageOutcome, Health,
};
pub use layout::{
    BiomeBlock, Decoration, Layout, PathSegment, Platform, TerrainBlock, TierHeights,
};
pub use occupancy::{OccupancyGrid, ReservationKind};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Frost Defence.";

slotmap::new_key_type! {
    /// Generational handle addressing an entity stored in the world.
    ///
    /// Handles of destroyed entities never resolve again, so a stale target
    /// reference is detectable instead of dangling.
    pub struct EntityHandle;
}

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Enemies spawn and every combatant runs its attack cycle.
    Running,
    /// The objective fell; the session accepts no further mutations.
    Defeated,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that an enemy enter the battlefield at a path entrance.
    SpawnEnemy {
        /// Entrance cell where the enemy appears.
        entrance: GridCell,
    },
    /// Requests construction of a structure on a buildable platform.
    Build {
        /// Type of structure to construct.
        kind: BuildKind,
        /// Platform cell that should host the structure.
        site: GridCell,
    },
    /// Stores the combat state computed by the combat system for an entity.
    SetCombatState {
        /// Entity whose state is replaced.
        entity: EntityHandle,
        /// Phase and cooldown the entity holds after this tick.
        state: CombatantState,
    },
    /// Requests that an attacker deliver its attack to a target.
    Attack {
        /// Entity executing the attack.
        attacker: EntityHandle,
        /// Entity receiving the attack.
        target: EntityHandle,
    },
    /// Moves an enemy to a new position along its route.
    MoveEnemy {
        /// Enemy being moved.
        enemy: EntityHandle,
        /// Destination position in world units.
        position: Vec3,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that an entity entered the simulation.
    EntitySpawned {
        /// Handle assigned to the entity.
        entity: EntityHandle,
        /// Archetype of the entity.
        kind: EntityKind,
        /// Position where the entity appeared.
        position: Vec3,
    },
    /// Announces that an entity left the simulation.
    EntityDestroyed {
        /// Handle that no longer resolves.
        entity: EntityHandle,
        /// Archetype of the removed entity.
        kind: EntityKind,
    },
    /// Confirms that a structure was built on a platform.
    StructureBuilt {
        /// Handle of the new structure.
        entity: EntityHandle,
        /// Type of structure that was built.
        kind: BuildKind,
        /// Platform cell now occupied by the structure.
        site: GridCell,
    },
    /// Reports that a build request was rejected without mutating the world.
    BuildRejected {
        /// Type of structure requested.
        kind: BuildKind,
        /// Cell provided in the request.
        site: GridCell,
        /// Specific reason the build failed.
        reason: PlacementError,
    },
    /// Reports that a spawn request named a cell that is not a path entrance.
    SpawnRejected {
        /// Cell provided in the request.
        entrance: GridCell,
    },
    /// Reports that a combatant locked onto a target.
    TargetAcquired {
        /// Combatant that acquired the target.
        entity: EntityHandle,
        /// Target now engaged.
        target: EntityHandle,
    },
    /// Reports that a combatant dropped its target and returned to idle.
    TargetLost {
        /// Combatant that lost its target.
        entity: EntityHandle,
    },
    /// Confirms that an instantaneous attack hit its target.
    AttackDelivered {
        /// Entity that attacked.
        attacker: EntityHandle,
        /// Entity that was hit.
        target: EntityHandle,
        /// Damage carried by the attack.
        damage: f32,
    },
    /// Confirms that a projectile left its launcher.
    ProjectileLaunched {
        /// Handle of the projectile entity.
        projectile: EntityHandle,
        /// Entity that fired the projectile.
        attacker: EntityHandle,
        /// Target captured at launch.
        target: EntityHandle,
    },
    /// Confirms that a projectile reached its target.
    ProjectileImpacted {
        /// Handle of the projectile entity.
        projectile: EntityHandle,
        /// Entity that was hit.
        target: EntityHandle,
        /// Damage carried by the projectile.
        damage: f32,
    },
    /// Reports that a projectile lost its target and self-destructed.
    ProjectileExpired {
        /// Handle of the projectile entity.
        projectile: EntityHandle,
    },
    /// Reports that an entity's health decreased.
    DamageApplied {
        /// Entity that took damage.
        entity: EntityHandle,
        /// Amount subtracted from the entity's health.
        amount: f32,
        /// Health left after the subtraction.
        remaining: f32,
    },
    /// Confirms that an enemy moved along its route.
    EnemyMoved {
        /// Enemy that moved.
        enemy: EntityHandle,
        /// Position before the move.
        from: Vec3,
        /// Position after the move.
        to: Vec3,
    },
    /// Announces that the objective fell and the session ended.
    ObjectiveDestroyed,
}

/// Location of a single grid cell on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    x: i32,
    z: i32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column of the cell along the x axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell along the z axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Returns the cell displaced by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Returns the cell reached after `distance` unit steps in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction, distance: i32) -> Self {
        let (dx, dz) = direction.delta();
        self.offset(dx * distance, dz * distance)
    }

    /// Largest per-axis distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: GridCell) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// Sum of per-axis distances between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCell) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }

    /// Reports whether the cell lies inside a square grid of `size` cells.
    #[must_use]
    pub const fn is_within(self, size: i32) -> bool {
        self.x >= 0 && self.z >= 0 && self.x < size && self.z < size
    }

    /// World-space position of the cell centre at the provided height.
    #[must_use]
    pub fn to_world(self, height: f32) -> Vec3 {
        Vec3::new(self.x as f32, height, self.z as f32)
    }

    /// Cell containing the provided world-space point, rounding to the nearest centre.
    #[must_use]
    pub fn nearest(point: Vec3) -> Self {
        Self::new(point.x.round() as i32, point.z.round() as i32)
    }
}

/// Cell paired with a fixed bookkeeping tier height.
///
/// Tier heights decouple walkable/buildable logic from cosmetic terrain height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TierPosition {
    cell: GridCell,
    tier: i32,
}

impl TierPosition {
    /// Creates a tier position from explicit components.
    #[must_use]
    pub const fn new(x: i32, tier: i32, z: i32) -> Self {
        Self {
            cell: GridCell::new(x, z),
            tier,
        }
    }

    /// Places the provided cell on a tier.
    #[must_use]
    pub const fn at(cell: GridCell, tier: i32) -> Self {
        Self { cell, tier }
    }

    /// Ground-plane cell of the position.
    #[must_use]
    pub const fn cell(&self) -> GridCell {
        self.cell
    }

    /// Tier height of the position.
    #[must_use]
    pub const fn tier(&self) -> i32 {
        self.tier
    }
}

/// Cardinal directions on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards increasing z.
    North,
    /// Towards increasing x.
    East,
    /// Towards decreasing z.
    South,
    /// Towards decreasing x.
    West,
}

impl Direction {
    /// Unit step `(dx, dz)` taken when moving in the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Unit step `(dx, dz)` perpendicular to the direction.
    ///
    /// Paths running along z spread along x and vice versa.
    #[must_use]
    pub const fn lateral(self) -> (i32, i32) {
        match self {
            Self::North | Self::South => (1, 0),
            Self::East | Self::West => (0, 1),
        }
    }
}

/// Grid edge an enemy path enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Edge at the largest z row.
    North,
    /// Edge at the largest x column.
    East,
    /// Edge at z = 0.
    South,
    /// Edge at x = 0.
    West,
}

impl Edge {
    /// Start cell on the edge and the inward direction toward the grid centre.
    #[must_use]
    pub const fn entrance(self, grid_size: i32) -> (GridCell, Direction) {
        let middle = grid_size / 2;
        let last = grid_size - 1;
        match self {
            Self::North => (GridCell::new(middle, last), Direction::South),
            Self::East => (GridCell::new(last, middle), Direction::West),
            Self::South => (GridCell::new(middle, 0), Direction::North),
            Self::West => (GridCell::new(0, middle), Direction::East),
        }
    }
}

/// Closed set of entity archetypes simulated by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Built turret that strikes enemies instantly.
    Tower,
    /// Built unit that fires projectiles at enemies.
    Defender,
    /// Hostile unit marching toward the objective.
    Enemy,
    /// Projectile in flight toward a captured target.
    Projectile,
    /// Central structure enemies attack; its destruction ends the session.
    Objective,
}

impl EntityKind {
    /// Reports whether an entity of this kind may select `other` as a target.
    #[must_use]
    pub const fn targets(self, other: EntityKind) -> bool {
        match self {
            Self::Tower | Self::Defender | Self::Objective => matches!(other, Self::Enemy),
            Self::Enemy => matches!(other, Self::Objective),
            Self::Projectile => false,
        }
    }
}

/// Structures that may be built on platforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildKind {
    /// Projectile-firing defender.
    Defender,
    /// Instant-strike tower.
    Tower,
}

impl BuildKind {
    /// Entity archetype spawned for the structure.
    #[must_use]
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::Defender => EntityKind::Defender,
            Self::Tower => EntityKind::Tower,
        }
    }
}

/// Reasons a build request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell is not one of the generated platforms.
    NotBuildable,
    /// A structure already stands on the platform.
    Occupied,
    /// The session ended; the world accepts no further builds.
    SessionOver,
}

/// Immutable representation of a combatant used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatantSnapshot {
    /// Handle of the combatant.
    pub entity: EntityHandle,
    /// Archetype of the combatant.
    pub kind: EntityKind,
    /// Current position in world units.
    pub position: Vec3,
    /// Current health.
    pub health: Health,
    /// Static attack parameters.
    pub profile: CombatProfile,
    /// Phase and cooldown timer.
    pub state: CombatantState,
    /// Movement speed in world units per second; zero for static structures.
    pub speed: f32,
}

/// Read-only snapshot describing every combatant in the world.
#[derive(Clone, Debug, Default)]
pub struct CombatantView {
    snapshots: Vec<CombatantSnapshot>,
}

impl CombatantView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CombatantSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.entity);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CombatantSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CombatantSnapshot> {
        self.snapshots
    }
}

/// Minimal entity record returned by spatial queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityProbe {
    /// Handle of the entity.
    pub entity: EntityHandle,
    /// Archetype of the entity.
    pub kind: EntityKind,
    /// Current position in world units.
    pub position: Vec3,
}

/// Spatial lookups the combat systems consume from the host world.
pub trait SpatialQuery {
    /// Writes every live entity within `radius` of `center` into `out`.
    ///
    /// The output buffer is cleared first. Result order is defined by the
    /// implementation; first-match selection depends on it.
    fn entities_in_radius(&self, center: Vec3, radius: f32, out: &mut Vec<EntityProbe>);

    /// Resolves a handle, returning `None` once the entity has been destroyed.
    fn probe(&self, entity: EntityHandle) -> Option<EntityProbe>;
}

/// Routing service that steers enemies toward the objective.
pub trait RouteService {
    /// Next position an entity at `from` should walk toward, if a route exists.
    fn next_waypoint(&self, from: Vec3) -> Option<Vec3>;
}

/// Distance between two points measured on the ground plane.
///
/// Attack ranges and projectile travel ignore the cosmetic height axis.
#[must_use]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

#[cfg(test)]
mod tests {
    use super::{Direction, Edge, EntityKind, GridCell, PlacementError, TierPosition};
    use glam::Vec3;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn distances_match_expectation() {
        let origin = GridCell::new(1, 1);
        let destination = GridCell::new(4, -1);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(origin.chebyshev_distance(destination), 3);
        assert_eq!(destination.chebyshev_distance(origin), 3);
    }

    #[test]
    fn step_follows_direction_delta() {
        let start = GridCell::new(5, 0);
        assert_eq!(start.step(Direction::North, 3), GridCell::new(5, 3));
        assert_eq!(start.step(Direction::West, 2), GridCell::new(3, 0));
    }

    #[test]
    fn entrances_point_toward_centre() {
        assert_eq!(
            Edge::North.entrance(40),
            (GridCell::new(20, 39), Direction::South)
        );
        assert_eq!(
            Edge::West.entrance(40),
            (GridCell::new(0, 20), Direction::East)
        );
        assert_eq!(
            Edge::East.entrance(40),
            (GridCell::new(39, 20), Direction::West)
        );
        assert_eq!(
            Edge::South.entrance(10),
            (GridCell::new(5, 0), Direction::North)
        );
    }

    #[test]
    fn nearest_cell_rounds_world_points() {
        let cell = GridCell::nearest(Vec3::new(3.4, 9.0, 6.6));
        assert_eq!(cell, GridCell::new(3, 7));
    }

    #[test]
    fn only_hostile_pairs_are_targetable() {
        assert!(EntityKind::Defender.targets(EntityKind::Enemy));
        assert!(EntityKind::Tower.targets(EntityKind::Enemy));
        assert!(EntityKind::Objective.targets(EntityKind::Enemy));
        assert!(EntityKind::Enemy.targets(EntityKind::Objective));
        assert!(!EntityKind::Enemy.targets(EntityKind::Defender));
        assert!(!EntityKind::Defender.targets(EntityKind::Projectile));
        assert!(!EntityKind::Projectile.targets(EntityKind::Enemy));
    }

    #[test]
    fn tier_position_round_trips_through_bincode() {
        assert_round_trip(&TierPosition::new(4, 3, 9));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::Occupied);
    }
}
