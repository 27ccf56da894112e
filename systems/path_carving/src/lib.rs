#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure path carving system that reserves walkable corridors toward the objective.

use frost_defence_core::{
    Edge, GridCell, OccupancyGrid, PathSegment, ReservationKind, TierPosition,
};

/// Parameters shared by every carved path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    width: u32,
    buffer: u32,
    tier: i32,
}

impl Config {
    /// Creates a new carving configuration.
    #[must_use]
    pub const fn new(width: u32, buffer: u32, tier: i32) -> Self {
        Self {
            width,
            buffer,
            tier,
        }
    }

    /// Parallel cells emitted per step.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Clearance ring reserved around each emitted cell.
    #[must_use]
    pub const fn buffer(&self) -> u32 {
        self.buffer
    }

    /// Tier height paths are reserved at.
    #[must_use]
    pub const fn tier(&self) -> i32 {
        self.tier
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(3, 1, 3)
    }
}

/// Carves straight corridors from grid edges toward a shared objective.
#[derive(Debug)]
pub struct PathCarver {
    config: Config,
}

impl PathCarver {
    /// Creates a carver using the provided configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Carves a path entering from `edge` and reserves its cells in `occupancy`.
    ///
    /// The walk advances one cell per step for at most half the grid extent
    /// and stops before reaching `objective`. Cells falling outside the grid
    /// are skipped.
    pub fn carve(
        &self,
        occupancy: &mut OccupancyGrid,
        grid_size: i32,
        edge: Edge,
        objective: GridCell,
    ) -> PathSegment {
        let (start, direction) = edge.entrance(grid_size);
        let (dx, dz) = direction.delta();
        let (lx, lz) = direction.lateral();

        let remaining = (objective.x() - start.x()) * dx + (objective.z() - start.z()) * dz;
        let steps = (grid_size / 2).min(remaining).max(0);

        let width = i32::try_from(self.config.width).unwrap_or(i32::MAX);
        let low = -(width / 2);
        let high = width - 1 - width / 2;

        let mut centerline = Vec::with_capacity(steps as usize);
        let mut cells = Vec::with_capacity(steps as usize * self.config.width as usize);

        for step in 0..steps {
            let centre = start.step(direction, step);
            centerline.push(centre);

            for lateral in low..=high {
                let cell = centre.offset(lx * lateral, lz * lateral);
                if !cell.is_within(grid_size) {
                    continue;
                }
                occupancy.reserve(
                    TierPosition::at(cell, self.config.tier),
                    ReservationKind::Path,
                    self.config.buffer,
                );
                cells.push(cell);
            }
        }

        tracing::debug!(
            ?edge,
            steps,
            cells = cells.len(),
            "carved path toward objective"
        );

        PathSegment::new(edge, direction, self.config.width, centerline, cells)
    }

    /// Carves one path per entrance, in the provided order.
    pub fn carve_all(
        &self,
        occupancy: &mut OccupancyGrid,
        grid_size: i32,
        entrances: &[Edge],
        objective: GridCell,
    ) -> Vec<PathSegment> {
        entrances
            .iter()
            .map(|edge| self.carve(occupancy, grid_size, *edge, objective))
            .collect()
    }
}

impl Default for PathCarver {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
