#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure target acquisition shared by every combat participant.
//!
//! Selection takes the first qualifying entity in the order the spatial
//! query reports them; the selector never re-sorts results.

use frost_defence_core::{
    ground_distance, CombatantSnapshot, EntityHandle, EntityProbe, SpatialQuery,
};

/// Target acquisition that reuses a scratch buffer across scans.
#[derive(Debug, Default)]
pub struct TargetAcquisition {
    scratch: Vec<EntityProbe>,
}

impl TargetAcquisition {
    /// Creates a new acquisition helper with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans the seeker's range and returns the first target it may engage.
    pub fn acquire<Q>(&mut self, seeker: &CombatantSnapshot, query: &Q) -> Option<EntityHandle>
    where
        Q: SpatialQuery + ?Sized,
    {
        acquire(seeker, query, &mut self.scratch)
    }
}

/// Scans the seeker's range using the caller's buffer and returns the first
/// target it may engage.
pub fn acquire<Q>(
    seeker: &CombatantSnapshot,
    query: &Q,
    scratch: &mut Vec<EntityProbe>,
) -> Option<EntityHandle>
where
    Q: SpatialQuery + ?Sized,
{
    query.entities_in_radius(seeker.position, seeker.profile.range, scratch);
    scratch
        .iter()
        .find(|probe| probe.entity != seeker.entity && seeker.kind.targets(probe.kind))
        .map(|probe| probe.entity)
}

/// Reports whether `target` still exists, may be engaged by the seeker and
/// lies within its range.
#[must_use]
pub fn is_valid_target<Q>(seeker: &CombatantSnapshot, target: EntityHandle, query: &Q) -> bool
where
    Q: SpatialQuery + ?Sized,
{
    query.probe(target).is_some_and(|probe| {
        seeker.kind.targets(probe.kind)
            && ground_distance(seeker.position, probe.position) <= seeker.profile.range
    })
}
