#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure terrain system filling unreserved cells and scattering decorations.
//!
//! Block choice and noise offsets are drawn from a caller-provided random
//! source, so a seeded generator reproduces the same battlefield.

use frost_defence_core::{
    BiomeBlock, Decoration, GridCell, OccupancyGrid, TerrainBlock, TierPosition,
};
use noise::{NoiseFn, Perlin};
use rand::Rng;

const NOISE_OFFSET_RANGE: f64 = 1000.0;

/// Parameters controlling terrain filling and decoration scattering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    primary_probability: f32,
    noise_scale: f64,
    height_variation: f32,
    max_decorations: usize,
    decoration_variants: u32,
}

impl Config {
    /// Creates a new terrain configuration.
    #[must_use]
    pub const fn new(
        primary_probability: f32,
        noise_scale: f64,
        height_variation: f32,
        max_decorations: usize,
        decoration_variants: u32,
    ) -> Self {
        Self {
            primary_probability,
            noise_scale,
            height_variation,
            max_decorations,
            decoration_variants,
        }
    }

    /// Probability of choosing the primary biome for a cell.
    #[must_use]
    pub const fn primary_probability(&self) -> f32 {
        self.primary_probability
    }

    /// Scale applied to coordinates before sampling noise.
    #[must_use]
    pub const fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    /// Maximum cosmetic height.
    #[must_use]
    pub const fn height_variation(&self) -> f32 {
        self.height_variation
    }

    /// Upper bound on placed decorations.
    #[must_use]
    pub const fn max_decorations(&self) -> usize {
        self.max_decorations
    }

    /// Decoration archetypes to choose from.
    #[must_use]
    pub const fn decoration_variants(&self) -> u32 {
        self.decoration_variants
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0.8, 0.1, 4.0, 50, 3)
    }
}

/// Output of the fill pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Terrain {
    blocks: Vec<TerrainBlock>,
    candidates: Vec<TierPosition>,
}

impl Terrain {
    /// Placed blocks in row-major order.
    #[must_use]
    pub fn blocks(&self) -> &[TerrainBlock] {
        &self.blocks
    }

    /// Primary biome positions eligible for decorations.
    #[must_use]
    pub fn candidates(&self) -> &[TierPosition] {
        &self.candidates
    }

    /// Splits the terrain into its blocks and decoration candidates.
    #[must_use]
    pub fn into_parts(self) -> (Vec<TerrainBlock>, Vec<TierPosition>) {
        (self.blocks, self.candidates)
    }
}

/// Fills the battlefield with biome blocks around reserved geometry.
#[derive(Debug)]
pub struct TerrainGenerator {
    config: Config,
}

impl TerrainGenerator {
    /// Creates a generator using the provided configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Places a block on every cell of the grid that is not reserved on any tier.
    pub fn fill<R>(&self, occupancy: &OccupancyGrid, grid_size: i32, rng: &mut R) -> Terrain
    where
        R: Rng + ?Sized,
    {
        let perlin = Perlin::new(rng.gen());
        let offset_x = rng.gen_range(0.0..NOISE_OFFSET_RANGE);
        let offset_z = rng.gen_range(0.0..NOISE_OFFSET_RANGE);

        let mut terrain = Terrain::default();
        for z in 0..grid_size {
            for x in 0..grid_size {
                let cell = GridCell::new(x, z);
                if occupancy.is_cell_reserved(cell) {
                    continue;
                }

                let block = if rng.gen::<f32>() < self.config.primary_probability {
                    BiomeBlock::Snow
                } else {
                    BiomeBlock::Ice
                };
                let sample = perlin.get([
                    (f64::from(x) + offset_x) * self.config.noise_scale,
                    (f64::from(z) + offset_z) * self.config.noise_scale,
                ]);
                let normalised = ((sample + 1.0) * 0.5).clamp(0.0, 1.0) as f32;
                let height = normalised * self.config.height_variation;

                terrain.blocks.push(TerrainBlock {
                    cell,
                    block,
                    height,
                });
                if block == BiomeBlock::Snow {
                    terrain
                        .candidates
                        .push(TierPosition::at(cell, height.floor() as i32));
                }
            }
        }

        tracing::debug!(
            blocks = terrain.blocks.len(),
            candidates = terrain.candidates.len(),
            "filled terrain"
        );
        terrain
    }

    /// Picks random candidates until the decoration budget is spent or none remain.
    ///
    /// Candidates within one cell of any reservation are discarded.
    pub fn scatter<R>(
        &self,
        occupancy: &OccupancyGrid,
        mut candidates: Vec<TierPosition>,
        rng: &mut R,
    ) -> Vec<Decoration>
    where
        R: Rng + ?Sized,
    {
        let variants = self.config.decoration_variants.max(1);
        let mut decorations = Vec::new();

        while decorations.len() < self.config.max_decorations && !candidates.is_empty() {
            let index = rng.gen_range(0..candidates.len());
            let candidate = candidates.swap_remove(index);
            if occupancy.is_cell_near(candidate.cell(), 1) {
                continue;
            }

            decorations.push(Decoration {
                position: TierPosition::at(candidate.cell(), candidate.tier() + 1),
                variant: rng.gen_range(0..variants),
            });
        }

        tracing::debug!(decorations = decorations.len(), "scattered decorations");
        decorations
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_defence_core::ReservationKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn reserved_grid() -> OccupancyGrid {
        let mut occupancy = OccupancyGrid::new();
        occupancy.reserve(TierPosition::new(4, 3, 4), ReservationKind::Path, 1);
        occupancy.reserve(TierPosition::new(8, 2, 1), ReservationKind::Platform, 0);
        occupancy
    }

    #[test]
    fn terrain_never_covers_reserved_columns() {
        let occupancy = reserved_grid();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let terrain = TerrainGenerator::default().fill(&occupancy, 10, &mut rng);

        assert_eq!(terrain.blocks().len(), 100 - 10);
        for block in terrain.blocks() {
            assert!(!occupancy.is_cell_reserved(block.cell));
        }
    }

    #[test]
    fn heights_stay_within_variation() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let terrain = TerrainGenerator::default().fill(&OccupancyGrid::new(), 16, &mut rng);

        assert!(terrain
            .blocks()
            .iter()
            .all(|block| (0.0..=4.0).contains(&block.height)));
    }

    #[test]
    fn candidates_are_primary_biome_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let terrain = TerrainGenerator::default().fill(&OccupancyGrid::new(), 12, &mut rng);

        let snow = terrain
            .blocks()
            .iter()
            .filter(|block| block.block == BiomeBlock::Snow)
            .count();
        assert_eq!(terrain.candidates().len(), snow);
        assert!(snow > 0);
        assert!(snow < terrain.blocks().len());
    }

    #[test]
    fn probability_extremes_select_single_biome() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let ice_only = TerrainGenerator::new(Config::new(0.0, 0.1, 4.0, 50, 3));
        let terrain = ice_only.fill(&OccupancyGrid::new(), 6, &mut rng);

        assert!(terrain
            .blocks()
            .iter()
            .all(|block| block.block == BiomeBlock::Ice));
        assert!(terrain.candidates().is_empty());
    }

    #[test]
    fn same_seed_reproduces_terrain() {
        let generator = TerrainGenerator::default();
        let occupancy = reserved_grid();

        let first = generator.fill(&occupancy, 10, &mut ChaCha8Rng::seed_from_u64(21));
        let second = generator.fill(&occupancy, 10, &mut ChaCha8Rng::seed_from_u64(21));

        assert_eq!(first, second);
    }

    #[test]
    fn decorations_keep_clear_of_reservations() {
        let occupancy = reserved_grid();
        let generator = TerrainGenerator::new(Config::new(1.0, 0.1, 4.0, 500, 3));
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (_, candidates) = generator.fill(&occupancy, 10, &mut rng).into_parts();

        let decorations = generator.scatter(&occupancy, candidates.clone(), &mut rng);

        assert!(!decorations.is_empty());
        for decoration in &decorations {
            assert!(!occupancy.is_cell_near(decoration.position.cell(), 1));
            assert!(decoration.variant < 3);
            let source = candidates
                .iter()
                .find(|candidate| candidate.cell() == decoration.position.cell())
                .expect("decoration originates from a candidate");
            assert_eq!(decoration.position.tier(), source.tier() + 1);
        }
    }

    #[test]
    fn scatter_stops_at_budget() {
        let generator = TerrainGenerator::new(Config::new(1.0, 0.1, 4.0, 5, 3));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (_, candidates) = generator
            .fill(&OccupancyGrid::new(), 10, &mut rng)
            .into_parts();

        let decorations = generator.scatter(&OccupancyGrid::new(), candidates, &mut rng);

        assert_eq!(decorations.len(), 5);
    }

    #[test]
    fn scatter_without_candidates_is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let decorations =
            TerrainGenerator::default().scatter(&OccupancyGrid::new(), Vec::new(), &mut rng);
        assert!(decorations.is_empty());
    }
}
