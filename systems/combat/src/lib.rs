#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure combat system driving the shared attack state machine.
//!
//! Towers, defenders, enemies and the objective all run the same cycle:
//! scan for a target while idle, count the cooldown down while engaging,
//! attack when it reaches zero, and fall back to idle once the target is
//! gone or out of range.

use std::time::Duration;

use frost_defence_core::{
    CombatPhase, CombatantSnapshot, CombatantState, CombatantView, Command, EntityHandle,
    EntityProbe, Event, SpatialQuery,
};
use frost_defence_system_targeting::{acquire, is_valid_target};

/// Outcome of advancing one combatant by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Advance {
    /// State the combatant holds after the tick.
    pub state: CombatantState,
    /// Target attacked during the tick, if any.
    pub attack: Option<EntityHandle>,
}

impl Advance {
    const fn hold(state: CombatantState) -> Self {
        Self {
            state,
            attack: None,
        }
    }
}

/// Advances a single combatant's state machine by `elapsed`.
///
/// A dropped target leaves the cooldown untouched and acquisition waits for
/// the next tick. The cooldown saturates at zero, so a freshly engaged
/// combatant attacks on its first tick.
pub fn advance<Q>(
    combatant: &CombatantSnapshot,
    elapsed: Duration,
    query: &Q,
    scratch: &mut Vec<EntityProbe>,
) -> Advance
where
    Q: SpatialQuery + ?Sized,
{
    let mut state = combatant.state;

    if state.phase == CombatPhase::Destroyed || combatant.health.is_depleted() {
        state.phase = CombatPhase::Destroyed;
        return Advance::hold(state);
    }

    let target = match state.phase {
        CombatPhase::Engaging { target } => {
            if !is_valid_target(combatant, target, query) {
                state.phase = CombatPhase::Idle;
                return Advance::hold(state);
            }
            target
        }
        CombatPhase::Idle => match acquire(combatant, query, scratch) {
            Some(target) => target,
            None => return Advance::hold(state),
        },
        CombatPhase::Destroyed => return Advance::hold(state),
    };

    state.phase = CombatPhase::Engaging { target };
    state.cooldown_remaining = state.cooldown_remaining.saturating_sub(elapsed);
    if !state.cooldown_remaining.is_zero() {
        return Advance::hold(state);
    }

    state.cooldown_remaining = combatant.profile.cooldown;
    Advance {
        state,
        attack: Some(target),
    }
}

/// Combat system that reuses a scratch buffer for radius scans.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<EntityProbe>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every combatant by the time reported in `events` and emits
    /// state updates and attacks.
    ///
    /// Frames without a `TimeAdvanced` event produce no commands.
    pub fn handle<Q>(
        &mut self,
        events: &[Event],
        combatants: &CombatantView,
        query: &Q,
        out: &mut Vec<Command>,
    ) where
        Q: SpatialQuery + ?Sized,
    {
        let mut elapsed = Duration::ZERO;
        let mut ticked = false;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = elapsed.saturating_add(*dt);
                ticked = true;
            }
        }
        if !ticked {
            return;
        }

        for combatant in combatants.iter() {
            let result = advance(combatant, elapsed, query, &mut self.scratch);

            if result.state != combatant.state {
                out.push(Command::SetCombatState {
                    entity: combatant.entity,
                    state: result.state,
                });
            }

            if let Some(target) = result.attack {
                tracing::trace!(attacker = ?combatant.entity, ?target, "attack ready");
                out.push(Command::Attack {
                    attacker: combatant.entity,
                    target,
                });
            }
        }
    }
}
