#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that generates the Frost Defence battlefield.
//!
//! Generation runs once, to completion, before gameplay starts. The
//! occupancy grid is threaded by exclusive reference through every pass and
//! then frozen inside the returned [`Layout`].

use frost_defence_core::{
    config::GenerationConfig, GridCell, Layout, OccupancyGrid, ReservationKind, TierPosition,
    WELCOME_BANNER,
};
use frost_defence_system_path_carving::{Config as CarverConfig, PathCarver};
use frost_defence_system_platforms::{Config as PlacerConfig, PlatformPlacer};
use frost_defence_system_terrain::{Config as TerrainConfig, TerrainGenerator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Clearance ring reserved around the objective footprint.
const OBJECTIVE_BUFFER: u32 = 1;

/// Produces the battlefield and the data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        WELCOME_BANNER
    }

    /// Runs the generation pipeline with a deterministic seed.
    ///
    /// The objective is reserved first, then paths are carved, platforms are
    /// placed, and terrain fills whatever remains before decorations are
    /// scattered over the primary biome.
    #[must_use]
    pub fn generate(&self, config: &GenerationConfig, seed: u64) -> Layout {
        let grid_size = config.grid_size;
        let tiers = config.tiers;
        let objective = GridCell::new(grid_size / 2, grid_size / 2);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut occupancy = OccupancyGrid::new();

        occupancy.reserve(
            TierPosition::at(objective, tiers.objective),
            ReservationKind::Objective,
            OBJECTIVE_BUFFER,
        );

        let carver = PathCarver::new(CarverConfig::new(
            config.path_width,
            config.path_buffer,
            tiers.path,
        ));
        let paths = carver.carve_all(&mut occupancy, grid_size, &config.entrances, objective);

        let placer = PlatformPlacer::new(PlacerConfig::new(
            config.platform_count_per_side,
            config.platform_margin,
            config.objective_exclusion,
            tiers.platform,
        ));
        let platforms = placer.place(&mut occupancy, grid_size, &paths, objective);

        let terrain_generator = TerrainGenerator::new(TerrainConfig::new(
            config.primary_biome_probability,
            config.noise_scale,
            config.height_variation,
            config.max_decorations,
            config.decoration_variants,
        ));
        let (terrain, candidates) = terrain_generator
            .fill(&occupancy, grid_size, &mut rng)
            .into_parts();
        let decorations = terrain_generator.scatter(&occupancy, candidates, &mut rng);

        tracing::info!(
            seed,
            grid_size,
            paths = paths.len(),
            platforms = platforms.len(),
            terrain = terrain.len(),
            decorations = decorations.len(),
            "generated battlefield"
        );

        Layout::new(
            grid_size,
            tiers,
            objective,
            occupancy,
            paths,
            platforms,
            terrain,
            decorations,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_matches_core_constant() {
        assert_eq!(Bootstrap.welcome_banner(), WELCOME_BANNER);
    }

    #[test]
    fn objective_sits_at_grid_centre() {
        let layout = Bootstrap.generate(&GenerationConfig::default(), 1);

        assert_eq!(layout.objective(), GridCell::new(20, 20));
        assert_eq!(
            layout
                .occupancy()
                .kind_at(TierPosition::new(20, 4, 20)),
            Some(ReservationKind::Objective)
        );
    }

    #[test]
    fn default_generation_carves_three_entrances() {
        let layout = Bootstrap.generate(&GenerationConfig::default(), 1);

        assert_eq!(
            layout.entrances(),
            vec![
                GridCell::new(20, 39),
                GridCell::new(0, 20),
                GridCell::new(39, 20),
            ]
        );
        assert_eq!(layout.platforms().len(), 18);
    }
}
