//! Static routing field steering enemies along carved paths.

use std::collections::VecDeque;

use frost_defence_core::GridCell;

/// Dense breadth-first distance grid seeded from the objective.
///
/// Distances default to `u16::MAX` for cells that are not walkable or not
/// connected, so callers can distinguish terrain from corridor cells.
#[derive(Clone, Debug)]
pub(crate) struct NavigationField {
    size: i32,
    distances: Vec<u16>,
}

impl NavigationField {
    /// Builds the distances using a reverse breadth-first search from `goals`.
    pub(crate) fn build<F>(size: i32, goals: &[GridCell], mut is_walkable: F) -> Self
    where
        F: FnMut(GridCell) -> bool,
    {
        let side = usize::try_from(size).unwrap_or(0);
        let mut field = Self {
            size,
            distances: vec![u16::MAX; side.saturating_mul(side)],
        };
        if field.distances.is_empty() {
            return field;
        }

        let mut queue = VecDeque::new();
        for &goal in goals {
            let Some(goal_index) = index(size, goal) else {
                continue;
            };
            if field.distances[goal_index] == 0 {
                continue;
            }
            field.distances[goal_index] = 0;
            queue.push_back(goal);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(size, cell) else {
                continue;
            };
            let current_distance = field.distances[current_index];
            if current_distance >= u16::MAX.saturating_sub(1) {
                continue;
            }
            let next_distance = current_distance + 1;

            for neighbor in neighbors(cell, size) {
                if !is_walkable(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = index(size, neighbor) else {
                    continue;
                };
                if field.distances[neighbor_index] <= next_distance {
                    continue;
                }
                field.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }

        field
    }

    /// Distance recorded for the cell, if it lies within the field and is reachable.
    #[must_use]
    pub(crate) fn distance(&self, cell: GridCell) -> Option<u16> {
        let offset = index(self.size, cell)?;
        self.distances
            .get(offset)
            .copied()
            .filter(|distance| *distance != u16::MAX)
    }

    /// Neighbour one step closer to a goal, preferring north, east, south, west.
    #[must_use]
    pub(crate) fn next_hop(&self, cell: GridCell) -> Option<GridCell> {
        let current = self.distance(cell)?;
        if current == 0 {
            return None;
        }
        neighbors(cell, self.size).find(|neighbor| self.distance(*neighbor) == Some(current - 1))
    }
}

fn neighbors(cell: GridCell, size: i32) -> impl Iterator<Item = GridCell> {
    [
        cell.offset(0, 1),
        cell.offset(1, 0),
        cell.offset(0, -1),
        cell.offset(-1, 0),
    ]
    .into_iter()
    .filter(move |neighbor| neighbor.is_within(size))
}

fn index(size: i32, cell: GridCell) -> Option<usize> {
    if !cell.is_within(size) {
        return None;
    }
    let side = usize::try_from(size).ok()?;
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.z()).ok()?;
    row.checked_mul(side)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_cells_start_at_zero() {
        let goal = GridCell::new(1, 2);

        let field = NavigationField::build(4, &[goal], |_| true);

        assert_eq!(field.distance(goal), Some(0));
        assert_eq!(field.distance(GridCell::new(1, 1)), Some(1));
        assert_eq!(field.distance(GridCell::new(1, 0)), Some(2));
        assert_eq!(field.distance(GridCell::new(0, 0)), Some(3));
    }

    #[test]
    fn unwalkable_cells_stay_unreachable() {
        let goal = GridCell::new(1, 2);
        let wall = GridCell::new(1, 1);

        let field = NavigationField::build(4, &[goal], |cell| cell != wall);

        assert_eq!(field.distance(wall), None);
        assert_eq!(field.distance(GridCell::new(1, 0)), Some(4));
        assert_eq!(field.distance(GridCell::new(0, 1)), Some(2));
    }

    #[test]
    fn next_hop_descends_toward_goal() {
        let goal = GridCell::new(2, 2);

        let field = NavigationField::build(5, &[goal], |cell| cell.x() == 2);

        assert_eq!(field.next_hop(GridCell::new(2, 0)), Some(GridCell::new(2, 1)));
        assert_eq!(field.next_hop(GridCell::new(2, 4)), Some(GridCell::new(2, 3)));
        assert_eq!(field.next_hop(goal), None);
        assert_eq!(field.next_hop(GridCell::new(0, 0)), None);
    }

    #[test]
    fn out_of_bounds_cells_have_no_distance() {
        let field = NavigationField::build(3, &[GridCell::new(0, 0)], |_| true);

        assert_eq!(field.distance(GridCell::new(-1, 0)), None);
        assert_eq!(field.distance(GridCell::new(3, 0)), None);
    }

    #[test]
    fn field_holds_one_distance_per_cell() {
        let field = NavigationField::build(6, &[GridCell::new(3, 3)], |_| true);
        assert_eq!(field.distances.len(), 36);

        let empty = NavigationField::build(0, &[GridCell::new(0, 0)], |_| true);
        assert!(empty.distances.is_empty());
        assert_eq!(empty.distance(GridCell::new(0, 0)), None);
    }
}
