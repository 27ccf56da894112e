#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure platform placement system deriving buildable sites from carved paths.

use frost_defence_core::{
    GridCell, OccupancyGrid, PathSegment, Platform, ReservationKind, TierPosition,
};

/// Parameters controlling platform placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    count_per_side: u32,
    margin: u32,
    exclusion: u32,
    tier: i32,
}

impl Config {
    /// Creates a new placement configuration.
    #[must_use]
    pub const fn new(count_per_side: u32, margin: u32, exclusion: u32, tier: i32) -> Self {
        Self {
            count_per_side,
            margin,
            exclusion,
            tier,
        }
    }

    /// Candidate pairs evaluated along each path.
    #[must_use]
    pub const fn count_per_side(&self) -> u32 {
        self.count_per_side
    }

    /// Cells between the path edge and the platform.
    #[must_use]
    pub const fn margin(&self) -> u32 {
        self.margin
    }

    /// Per-axis distance from the objective that candidates must exceed.
    #[must_use]
    pub const fn exclusion(&self) -> u32 {
        self.exclusion
    }

    /// Tier height platforms are reserved at.
    #[must_use]
    pub const fn tier(&self) -> i32 {
        self.tier
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(3, 2, 2, 2)
    }
}

/// Places buildable platforms on both sides of each carved path.
#[derive(Debug)]
pub struct PlatformPlacer {
    config: Config,
}

impl PlatformPlacer {
    /// Creates a placer using the provided configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Evaluates candidates along every path and reserves the accepted ones.
    ///
    /// Rejected candidates are skipped; they are never relocated.
    pub fn place(
        &self,
        occupancy: &mut OccupancyGrid,
        grid_size: i32,
        paths: &[PathSegment],
        objective: GridCell,
    ) -> Vec<Platform> {
        let count = self.config.count_per_side as usize;
        let spacing = (grid_size.max(0) as usize / (2 * count).max(1)).max(1);
        let mut platforms = Vec::new();

        for (path_index, path) in paths.iter().enumerate() {
            let centerline = path.centerline();
            let (lx, lz) = path.direction().lateral();
            let offset = i32::try_from(path.width() / 2 + self.config.margin).unwrap_or(i32::MAX);

            for slot in 0..count {
                let Some(centre) = centerline.get(spacing * slot).copied() else {
                    continue;
                };

                for sign in [1, -1] {
                    let candidate = centre.offset(lx * offset * sign, lz * offset * sign);
                    if !self.accepts(occupancy, grid_size, candidate, objective) {
                        tracing::debug!(
                            x = candidate.x(),
                            z = candidate.z(),
                            path_index,
                            "platform candidate rejected"
                        );
                        continue;
                    }

                    occupancy.reserve(
                        TierPosition::at(candidate, self.config.tier),
                        ReservationKind::Platform,
                        0,
                    );
                    platforms.push(Platform {
                        site: candidate,
                        path_index,
                    });
                }
            }
        }

        tracing::debug!(platforms = platforms.len(), "placed platforms");
        platforms
    }

    fn accepts(
        &self,
        occupancy: &OccupancyGrid,
        grid_size: i32,
        candidate: GridCell,
        objective: GridCell,
    ) -> bool {
        let outside_exclusion = candidate.x().abs_diff(objective.x()) > self.config.exclusion
            && candidate.z().abs_diff(objective.z()) > self.config.exclusion;
        let overlaps = matches!(
            occupancy.kind_at_cell(candidate),
            Some(ReservationKind::Path | ReservationKind::Platform)
        );
        outside_exclusion && candidate.is_within(grid_size) && !overlaps
    }
}

impl Default for PlatformPlacer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
