//! Tunable constants for generation, spawning and combat.
//!
//! Every field carries a default, so a partial TOML document only needs to
//! name the values it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AttackDelivery, CombatProfile, Edge, TierHeights};

/// Largest accepted grid side; routing distances are stored as `u16`.
pub const MAX_GRID_SIZE: i32 = 1024;

/// Complete configuration of a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Battlefield generation parameters.
    pub generation: GenerationConfig,
    /// Enemy spawning cadence.
    pub spawning: SpawningConfig,
    /// Per-archetype combat parameters.
    pub combat: CombatConfig,
}

impl GameConfig {
    /// Checks every field for values the simulation cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        self.spawning.validate()?;
        self.combat.validate()
    }
}

/// Parameters of the one-shot generation pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Cells along each side of the square grid.
    pub grid_size: i32,
    /// Maximum cosmetic terrain height.
    pub height_variation: f32,
    /// Scale applied to cell coordinates before sampling noise.
    pub noise_scale: f64,
    /// Probability that a terrain cell uses the majority biome.
    pub primary_biome_probability: f32,
    /// Parallel cells emitted per path step.
    pub path_width: u32,
    /// Clearance ring reserved around each path cell.
    pub path_buffer: u32,
    /// Platform pairs placed along each path.
    pub platform_count_per_side: u32,
    /// Extra cells between the path edge and its platforms.
    pub platform_margin: u32,
    /// Per-axis distance from the objective inside which platforms are rejected.
    pub objective_exclusion: u32,
    /// Upper bound on scattered decorations.
    pub max_decorations: usize,
    /// Number of decoration archetypes to choose from.
    pub decoration_variants: u32,
    /// Grid edges that receive an enemy path.
    pub entrances: Vec<Edge>,
    /// Tier heights for occupancy bookkeeping.
    pub tiers: TierHeights,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid_size: 40,
            height_variation: 4.0,
            noise_scale: 0.1,
            primary_biome_probability: 0.8,
            path_width: 3,
            path_buffer: 1,
            platform_count_per_side: 3,
            platform_margin: 2,
            objective_exclusion: 2,
            max_decorations: 50,
            decoration_variants: 3,
            entrances: vec![Edge::North, Edge::West, Edge::East],
            tiers: TierHeights::default(),
        }
    }
}

impl GenerationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 3 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if self.path_width == 0 {
            return Err(ConfigError::ZeroPathWidth);
        }
        let side = self.grid_size.unsigned_abs();
        for (field, value) in [
            ("path_width", self.path_width),
            ("path_buffer", self.path_buffer),
            ("platform_margin", self.platform_margin),
            ("objective_exclusion", self.objective_exclusion),
        ] {
            if value >= side {
                return Err(ConfigError::ExceedsGrid { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.primary_biome_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(
                self.primary_biome_probability,
            ));
        }
        if !self.noise_scale.is_finite() || !self.height_variation.is_finite() {
            return Err(ConfigError::NonFinite("generation noise parameters"));
        }
        Ok(())
    }
}

/// Enemy spawning cadence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawningConfig {
    /// Seconds between consecutive spawns.
    pub interval_secs: f32,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self { interval_secs: 5.0 }
    }
}

impl SpawningConfig {
    /// Spawn interval as a duration.
    #[must_use]
    pub fn interval(&self) -> Duration {
        seconds(self.interval_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.interval_secs.is_finite() || self.interval_secs <= 0.0 {
            return Err(ConfigError::NonPositiveInterval(self.interval_secs));
        }
        if Duration::try_from_secs_f32(self.interval_secs).is_err() {
            return Err(ConfigError::DurationOutOfRange {
                field: "spawning.interval_secs",
                seconds: self.interval_secs,
            });
        }
        Ok(())
    }
}

/// Combat parameters of every archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Central objective.
    pub objective: UnitConfig,
    /// Buildable instant-strike tower.
    pub tower: UnitConfig,
    /// Buildable projectile defender.
    pub defender: UnitConfig,
    /// Hostile marching unit.
    pub enemy: UnitConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        let structure = UnitConfig {
            health: 500.0,
            damage: 20.0,
            range: 10.0,
            cooldown_secs: 2.0,
            projectile_speed: None,
            movement_speed: 0.0,
        };
        Self {
            objective: structure.clone(),
            tower: structure,
            defender: UnitConfig {
                health: 100.0,
                damage: 20.0,
                range: 10.0,
                cooldown_secs: 2.0,
                projectile_speed: Some(20.0),
                movement_speed: 0.0,
            },
            enemy: UnitConfig {
                health: 100.0,
                damage: 10.0,
                range: 2.0,
                cooldown_secs: 2.0,
                projectile_speed: None,
                movement_speed: 3.5,
            },
        }
    }
}

impl CombatConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, unit) in [
            ("objective", &self.objective),
            ("tower", &self.tower),
            ("defender", &self.defender),
            ("enemy", &self.enemy),
        ] {
            unit.validate(name)?;
        }
        Ok(())
    }
}

/// Combat parameters of a single archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Hit points at spawn.
    pub health: f32,
    /// Damage per attack.
    pub damage: f32,
    /// Attack range on the ground plane.
    pub range: f32,
    /// Seconds between attacks.
    pub cooldown_secs: f32,
    /// Projectile speed; `None` selects instantaneous delivery.
    #[serde(default)]
    pub projectile_speed: Option<f32>,
    /// Movement speed in units per second.
    #[serde(default)]
    pub movement_speed: f32,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            health: 100.0,
            damage: 10.0,
            range: 2.0,
            cooldown_secs: 2.0,
            projectile_speed: None,
            movement_speed: 0.0,
        }
    }
}

impl UnitConfig {
    /// Converts the configuration into a runtime combat profile.
    #[must_use]
    pub fn profile(&self) -> CombatProfile {
        let delivery = match self.projectile_speed {
            Some(speed) => AttackDelivery::Projectile { speed },
            None => AttackDelivery::Instant,
        };
        CombatProfile::new(
            self.damage,
            self.range,
            seconds(self.cooldown_secs),
            delivery,
        )
    }

    fn validate(&self, unit: &'static str) -> Result<(), ConfigError> {
        let values = [
            self.health,
            self.damage,
            self.range,
            self.cooldown_secs,
            self.movement_speed,
        ];
        if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(ConfigError::InvalidUnit(unit));
        }
        if self.health <= 0.0 {
            return Err(ConfigError::InvalidUnit(unit));
        }
        if let Some(speed) = self.projectile_speed {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(ConfigError::InvalidUnit(unit));
            }
        }
        if Duration::try_from_secs_f32(self.cooldown_secs).is_err() {
            return Err(ConfigError::DurationOutOfRange {
                field: "cooldown_secs",
                seconds: self.cooldown_secs,
            });
        }
        Ok(())
    }
}

/// Converts seconds to a duration, clamping negative values to zero and
/// unrepresentable ones to [`Duration::MAX`].
fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::MAX)
}

/// Reasons a configuration is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The grid cannot hold an objective with paths around it.
    #[error("grid size {0} is too small; at least 3 cells per side are required")]
    GridTooSmall(i32),
    /// The grid exceeds [`MAX_GRID_SIZE`].
    #[error("grid size {0} is too large; at most {max} cells per side are supported", max = MAX_GRID_SIZE)]
    GridTooLarge(i32),
    /// A generation distance does not fit inside the grid.
    #[error("{field} = {value} must be smaller than the grid size")]
    ExceedsGrid {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: u32,
    },
    /// Paths need at least one cell of width.
    #[error("path width must be at least 1")]
    ZeroPathWidth,
    /// Biome probability outside `[0, 1]`.
    #[error("primary biome probability {0} must lie within 0.0..=1.0")]
    ProbabilityOutOfRange(f32),
    /// Spawning needs a positive cadence.
    #[error("spawn interval {0}s must be positive")]
    NonPositiveInterval(f32),
    /// A number of seconds cannot be represented as a duration.
    #[error("{field} = {seconds}s is too large to represent as a duration")]
    DurationOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Configured seconds.
        seconds: f32,
    },
    /// A numeric field is NaN or infinite.
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    /// A unit carries negative, non-finite or zero-health values.
    #[error("combat parameters for `{0}` must be finite and non-negative with positive health")]
    InvalidUnit(&'static str),
}
