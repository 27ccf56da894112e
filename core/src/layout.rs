//! Frozen battlefield description produced by the generation pipeline.

use serde::{Deserialize, Serialize};

use crate::{Direction, Edge, GridCell, OccupancyGrid, TierPosition};

/// Fixed tier heights used for occupancy bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TierHeights {
    /// Tier of walkable path cells.
    pub path: i32,
    /// Tier of buildable platforms.
    pub platform: i32,
    /// Tier of the objective footprint.
    pub objective: i32,
}

impl Default for TierHeights {
    fn default() -> Self {
        Self {
            path: 3,
            platform: 2,
            objective: 4,
        }
    }
}

/// Biome block types filling unreserved terrain cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeBlock {
    /// Majority biome; its cells become decoration candidates.
    Snow,
    /// Minority biome.
    Ice,
}

/// Single terrain block placed by the terrain generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainBlock {
    /// Cell the block occupies.
    pub cell: GridCell,
    /// Biome of the block.
    pub block: BiomeBlock,
    /// Cosmetic height sampled from coherent noise.
    pub height: f32,
}

/// Walkable corridor carved from a grid edge toward the objective.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    entrance: Edge,
    direction: Direction,
    width: u32,
    centerline: Vec<GridCell>,
    cells: Vec<GridCell>,
}

impl PathSegment {
    /// Creates a new path segment description.
    #[must_use]
    pub fn new(
        entrance: Edge,
        direction: Direction,
        width: u32,
        centerline: Vec<GridCell>,
        cells: Vec<GridCell>,
    ) -> Self {
        Self {
            entrance,
            direction,
            width,
            centerline,
            cells,
        }
    }

    /// Edge the path enters from.
    #[must_use]
    pub const fn entrance(&self) -> Edge {
        self.entrance
    }

    /// Direction of travel from the edge toward the objective.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of parallel cells per step.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// First centerline cell, located on the grid edge.
    #[must_use]
    pub fn start(&self) -> Option<GridCell> {
        self.centerline.first().copied()
    }

    /// Ordered centerline cells from the edge toward the objective.
    #[must_use]
    pub fn centerline(&self) -> &[GridCell] {
        &self.centerline
    }

    /// Every footprint cell reserved by the path, in emission order.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }
}

/// Buildable site reserved next to a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Cell of the platform.
    pub site: GridCell,
    /// Index of the path the platform flanks.
    pub path_index: usize,
}

/// Cosmetic decoration scattered on the majority biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decoration {
    /// Position of the decoration, one unit above its terrain block.
    pub position: TierPosition,
    /// Archetype index chosen among the configured variants.
    pub variant: u32,
}

/// Complete battlefield produced by one generation run.
///
/// The occupancy grid is frozen inside the layout; gameplay only reads it.
#[derive(Clone, Debug)]
pub struct Layout {
    grid_size: i32,
    tiers: TierHeights,
    objective: GridCell,
    occupancy: OccupancyGrid,
    paths: Vec<PathSegment>,
    platforms: Vec<Platform>,
    terrain: Vec<TerrainBlock>,
    decorations: Vec<Decoration>,
}

impl Layout {
    /// Assembles a layout from the pipeline's outputs.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        grid_size: i32,
        tiers: TierHeights,
        objective: GridCell,
        occupancy: OccupancyGrid,
        paths: Vec<PathSegment>,
        platforms: Vec<Platform>,
        terrain: Vec<TerrainBlock>,
        decorations: Vec<Decoration>,
    ) -> Self {
        Self {
            grid_size,
            tiers,
            objective,
            occupancy,
            paths,
            platforms,
            terrain,
            decorations,
        }
    }

    /// Number of cells along each side of the square grid.
    #[must_use]
    pub const fn grid_size(&self) -> i32 {
        self.grid_size
    }

    /// Tier heights used for bookkeeping.
    #[must_use]
    pub const fn tiers(&self) -> TierHeights {
        self.tiers
    }

    /// Cell hosting the objective where every path converges.
    #[must_use]
    pub const fn objective(&self) -> GridCell {
        self.objective
    }

    /// Frozen reservation set.
    #[must_use]
    pub const fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    /// Carved paths in carving order.
    #[must_use]
    pub fn paths(&self) -> &[PathSegment] {
        &self.paths
    }

    /// Buildable platforms in placement order.
    #[must_use]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Terrain blocks in row-major order.
    #[must_use]
    pub fn terrain(&self) -> &[TerrainBlock] {
        &self.terrain
    }

    /// Scattered decorations.
    #[must_use]
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Entrance cells enemies spawn from, one per path.
    #[must_use]
    pub fn entrances(&self) -> Vec<GridCell> {
        self.paths.iter().filter_map(PathSegment::start).collect()
    }
}
