#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement system that walks enemies along the routing service.
//!
//! Movement is independent of the attack state machine: an enemy keeps
//! walking until the objective enters its attack range, then stands still.

use std::time::Duration;

use frost_defence_core::{
    ground_distance, CombatantSnapshot, CombatantView, Command, EntityKind, Event, RouteService,
};
use glam::Vec3;

/// Pure system that reacts to elapsed time and emits enemy moves.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances every enemy by the time reported in `events`.
    pub fn handle<R>(
        &mut self,
        events: &[Event],
        combatants: &CombatantView,
        route: &R,
        out: &mut Vec<Command>,
    ) where
        R: RouteService + ?Sized,
    {
        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if elapsed.is_zero() {
            return;
        }

        let objective = combatants
            .iter()
            .find(|snapshot| snapshot.kind == EntityKind::Objective)
            .map(|snapshot| snapshot.position);

        for enemy in combatants
            .iter()
            .filter(|snapshot| snapshot.kind == EntityKind::Enemy)
        {
            if let Some(position) = step(enemy, objective, elapsed, route) {
                out.push(Command::MoveEnemy {
                    enemy: enemy.entity,
                    position,
                });
            }
        }
    }
}

/// Position an enemy reaches after walking for `elapsed`, or `None` when it
/// holds still.
pub fn step<R>(
    enemy: &CombatantSnapshot,
    objective: Option<Vec3>,
    elapsed: Duration,
    route: &R,
) -> Option<Vec3>
where
    R: RouteService + ?Sized,
{
    if let Some(objective) = objective {
        if ground_distance(enemy.position, objective) <= enemy.profile.range {
            return None;
        }
    }

    let budget = enemy.speed * elapsed.as_secs_f32();
    if budget <= 0.0 {
        return None;
    }

    let waypoint = route.next_waypoint(enemy.position)?;
    let remaining = ground_distance(enemy.position, waypoint);
    if remaining <= f32::EPSILON {
        return None;
    }
    if remaining <= budget {
        return Some(waypoint);
    }

    Some(enemy.position + (waypoint - enemy.position) * (budget / remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_defence_core::{
        AttackDelivery, CombatProfile, CombatantState, EntityHandle, Health,
    };
    use slotmap::SlotMap;

    struct StraightNorth;

    impl RouteService for StraightNorth {
        fn next_waypoint(&self, from: Vec3) -> Option<Vec3> {
            Some(Vec3::new(from.x.round(), from.y, from.z.round() + 1.0))
        }
    }

    struct Nowhere;

    impl RouteService for Nowhere {
        fn next_waypoint(&self, _from: Vec3) -> Option<Vec3> {
            None
        }
    }

    fn enemy(position: Vec3) -> CombatantSnapshot {
        let mut handles: SlotMap<EntityHandle, ()> = SlotMap::with_key();
        CombatantSnapshot {
            entity: handles.insert(()),
            kind: EntityKind::Enemy,
            position,
            health: Health::full(100.0),
            profile: CombatProfile::new(
                10.0,
                2.0,
                Duration::from_secs(2),
                AttackDelivery::Instant,
            ),
            state: CombatantState::idle(),
            speed: 3.5,
        }
    }

    #[test]
    fn step_is_bounded_by_speed() {
        let walker = enemy(Vec3::new(5.0, 4.0, 0.0));

        let next = step(
            &walker,
            None,
            Duration::from_millis(100),
            &StraightNorth,
        );

        let moved = next.expect("enemy walks");
        assert!((moved.z - 0.35).abs() < 1e-5);
        assert_eq!(moved.x, 5.0);
    }

    #[test]
    fn step_stops_at_waypoint() {
        let walker = enemy(Vec3::new(5.0, 4.0, 0.0));

        let next = step(&walker, None, Duration::from_secs(1), &StraightNorth);

        assert_eq!(next, Some(Vec3::new(5.0, 4.0, 1.0)));
    }

    #[test]
    fn objective_in_range_freezes_enemy() {
        let walker = enemy(Vec3::new(5.0, 4.0, 3.0));

        let next = step(
            &walker,
            Some(Vec3::new(5.0, 4.0, 5.0)),
            Duration::from_secs(1),
            &StraightNorth,
        );

        assert_eq!(next, None);
    }

    #[test]
    fn missing_route_holds_position() {
        let walker = enemy(Vec3::new(0.0, 4.0, 0.0));

        assert_eq!(step(&walker, None, Duration::from_secs(1), &Nowhere), None);
    }

    #[test]
    fn handle_ignores_frames_without_time() {
        let view = CombatantView::from_snapshots(vec![enemy(Vec3::ZERO)]);
        let mut out = Vec::new();

        Movement::new().handle(&[], &view, &StraightNorth, &mut out);

        assert!(out.is_empty());
    }
}
