//! Reservation bookkeeping consulted by every placement routine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{GridCell, TierPosition};

/// Purpose a position was reserved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReservationKind {
    /// Walkable corridor cell.
    Path,
    /// Buildable platform.
    Platform,
    /// Footprint of the central objective.
    Objective,
    /// Clearance margin kept free of decorations.
    Buffer,
}

impl ReservationKind {
    /// Reports whether the kind marks real geometry rather than a clearance margin.
    #[must_use]
    pub const fn is_footprint(self) -> bool {
        !matches!(self, Self::Buffer)
    }

    fn merge(existing: Self, incoming: Self) -> Self {
        if existing.is_footprint() || !incoming.is_footprint() {
            existing
        } else {
            incoming
        }
    }
}

/// Set of reserved tier positions built once during world generation.
///
/// Reservations are permanent: there is no removal operation, and reserving
/// an already reserved position is idempotent. A footprint reservation
/// replaces a buffer reservation of the same position; the reverse never
/// happens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyGrid {
    positions: BTreeMap<TierPosition, ReservationKind>,
    columns: BTreeMap<GridCell, ReservationKind>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `position` and, when `buffer > 0`, every position on the same
    /// tier within Chebyshev distance `buffer` of it.
    pub fn reserve(&mut self, position: TierPosition, kind: ReservationKind, buffer: u32) {
        self.insert(position, kind);

        let radius = i32::try_from(buffer).unwrap_or(i32::MAX);
        if radius == 0 {
            return;
        }

        let centre = position.cell();
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let neighbour = TierPosition::at(centre.offset(dx, dz), position.tier());
                self.insert(neighbour, ReservationKind::Buffer);
            }
        }
    }

    /// Reports whether the exact position is reserved.
    #[must_use]
    pub fn is_reserved(&self, position: TierPosition) -> bool {
        self.positions.contains_key(&position)
    }

    /// Kind recorded for the exact position, if reserved.
    #[must_use]
    pub fn kind_at(&self, position: TierPosition) -> Option<ReservationKind> {
        self.positions.get(&position).copied()
    }

    /// Reports whether any reserved position lies within `tolerance` of
    /// `position` on each of the three axes.
    #[must_use]
    pub fn is_near(&self, position: TierPosition, tolerance: u32) -> bool {
        let radius = i32::try_from(tolerance).unwrap_or(i32::MAX);
        let centre = position.cell();
        (-radius..=radius).any(|dy| {
            let tier = position.tier() + dy;
            any_within(centre, radius, |cell| {
                self.positions.contains_key(&TierPosition::at(cell, tier))
            })
        })
    }

    /// Reports whether the cell is reserved on any tier.
    #[must_use]
    pub fn is_cell_reserved(&self, cell: GridCell) -> bool {
        self.columns.contains_key(&cell)
    }

    /// Strongest kind reserved on any tier of the cell.
    #[must_use]
    pub fn kind_at_cell(&self, cell: GridCell) -> Option<ReservationKind> {
        self.columns.get(&cell).copied()
    }

    /// Reports whether any tier of any cell within `tolerance` on the ground
    /// plane is reserved.
    #[must_use]
    pub fn is_cell_near(&self, cell: GridCell, tolerance: u32) -> bool {
        let radius = i32::try_from(tolerance).unwrap_or(i32::MAX);
        any_within(cell, radius, |candidate| self.columns.contains_key(&candidate))
    }

    /// Number of reserved positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether nothing has been reserved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterator over reserved positions in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (TierPosition, ReservationKind)> + '_ {
        self.positions.iter().map(|(position, kind)| (*position, *kind))
    }

    /// Number of positions reserved with the provided kind on the provided tier.
    #[must_use]
    pub fn count(&self, kind: ReservationKind, tier: i32) -> usize {
        self.iter()
            .filter(|(position, reserved)| *reserved == kind && position.tier() == tier)
            .count()
    }

    fn insert(&mut self, position: TierPosition, kind: ReservationKind) {
        let entry = self.positions.entry(position).or_insert(kind);
        *entry = ReservationKind::merge(*entry, kind);

        let column = self.columns.entry(position.cell()).or_insert(kind);
        *column = ReservationKind::merge(*column, kind);
    }
}

fn any_within<F>(centre: GridCell, radius: i32, mut probe: F) -> bool
where
    F: FnMut(GridCell) -> bool,
{
    for dz in -radius..=radius {
        for dx in -radius..=radius {
            if probe(centre.offset(dx, dz)) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_marks_exact_position() {
        let mut grid = OccupancyGrid::new();
        let position = TierPosition::new(4, 3, 7);

        grid.reserve(position, ReservationKind::Path, 0);

        assert!(grid.is_reserved(position));
        assert!(!grid.is_reserved(TierPosition::new(4, 0, 7)));
        assert!(grid.is_cell_reserved(GridCell::new(4, 7)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn repeated_reservation_is_idempotent() {
        let mut grid = OccupancyGrid::new();
        let position = TierPosition::new(1, 3, 1);

        grid.reserve(position, ReservationKind::Path, 1);
        let snapshot = grid.clone();
        grid.reserve(position, ReservationKind::Path, 1);

        assert_eq!(grid, snapshot);
        assert_eq!(grid.len(), 9);
    }

    #[test]
    fn buffer_covers_chebyshev_ring_on_same_tier() {
        let mut grid = OccupancyGrid::new();
        grid.reserve(TierPosition::new(5, 3, 5), ReservationKind::Path, 1);

        for dz in -1..=1 {
            for dx in -1..=1 {
                assert!(grid.is_reserved(TierPosition::new(5 + dx, 3, 5 + dz)));
            }
        }
        assert!(!grid.is_reserved(TierPosition::new(7, 3, 5)));
        assert_eq!(
            grid.kind_at(TierPosition::new(6, 3, 6)),
            Some(ReservationKind::Buffer)
        );
        assert_eq!(grid.count(ReservationKind::Buffer, 3), 8);
    }

    #[test]
    fn footprint_upgrades_buffer_but_never_downgrades() {
        let mut grid = OccupancyGrid::new();
        grid.reserve(TierPosition::new(0, 3, 0), ReservationKind::Path, 1);
        grid.reserve(TierPosition::new(1, 3, 0), ReservationKind::Path, 1);

        assert_eq!(
            grid.kind_at(TierPosition::new(1, 3, 0)),
            Some(ReservationKind::Path)
        );
        assert_eq!(
            grid.kind_at(TierPosition::new(0, 3, 0)),
            Some(ReservationKind::Path)
        );
        assert_eq!(
            grid.kind_at_cell(GridCell::new(1, 0)),
            Some(ReservationKind::Path)
        );
    }

    #[test]
    fn is_near_checks_every_axis() {
        let mut grid = OccupancyGrid::new();
        grid.reserve(TierPosition::new(10, 2, 10), ReservationKind::Platform, 0);

        assert!(grid.is_near(TierPosition::new(11, 3, 9), 1));
        assert!(!grid.is_near(TierPosition::new(11, 4, 9), 1));
        assert!(!grid.is_near(TierPosition::new(12, 2, 10), 1));
        assert!(grid.is_near(TierPosition::new(12, 2, 10), 2));
    }

    #[test]
    fn is_cell_near_ignores_tier() {
        let mut grid = OccupancyGrid::new();
        grid.reserve(TierPosition::new(3, 3, 3), ReservationKind::Path, 0);

        assert!(grid.is_cell_near(GridCell::new(4, 4), 1));
        assert!(!grid.is_cell_near(GridCell::new(5, 3), 1));
    }
}
