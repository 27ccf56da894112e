//! Value types shared by every combatant: health, attack profile and phase.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EntityHandle;

/// Current and maximum hit points of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Creates a health pool filled to `max`.
    #[must_use]
    pub const fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Hit points left.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Hit points the entity spawned with.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Reports whether the pool has reached zero or below.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Subtracts `amount` from the pool.
    ///
    /// Depletion is reported exactly once; further damage is ignored.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_depleted() || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }

        self.current -= amount;
        if self.is_depleted() {
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Damaged
        }
    }
}

/// Result of applying damage to a [`Health`] pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageOutcome {
    /// Health decreased but the entity survives.
    Damaged,
    /// Health reached zero or below with this hit.
    Destroyed,
    /// Nothing changed: the pool was already depleted or the amount was not positive.
    Ignored,
}

/// How an attack reaches its target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttackDelivery {
    /// Damage lands on the target during the tick the attack fires.
    Instant,
    /// A projectile travels toward the target at a constant speed.
    Projectile {
        /// Travel speed in world units per second.
        speed: f32,
    },
}

/// Static attack parameters of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatProfile {
    /// Damage applied per attack.
    pub damage: f32,
    /// Radius, on the ground plane, within which targets are acquired and kept.
    pub range: f32,
    /// Time between consecutive attacks.
    pub cooldown: Duration,
    /// Delivery policy of the attack.
    pub delivery: AttackDelivery,
}

impl CombatProfile {
    /// Creates a new combat profile.
    #[must_use]
    pub const fn new(
        damage: f32,
        range: f32,
        cooldown: Duration,
        delivery: AttackDelivery,
    ) -> Self {
        Self {
            damage,
            range,
            cooldown,
            delivery,
        }
    }
}

/// Phase of the combat state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombatPhase {
    /// No target held; the next tick scans for one.
    Idle,
    /// Target locked and cooldown counting down.
    Engaging {
        /// Handle of the engaged target.
        target: EntityHandle,
    },
    /// Terminal phase after health reached zero.
    Destroyed,
}

/// Mutable combat state owned by a single combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CombatantState {
    /// Current phase.
    pub phase: CombatPhase,
    /// Time left before the next attack may fire.
    pub cooldown_remaining: Duration,
}

impl CombatantState {
    /// State of a freshly spawned combatant: idle and ready to fire.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            phase: CombatPhase::Idle,
            cooldown_remaining: Duration::ZERO,
        }
    }

    /// Target currently engaged, if any.
    #[must_use]
    pub const fn target(&self) -> Option<EntityHandle> {
        match self.phase {
            CombatPhase::Engaging { target } => Some(target),
            CombatPhase::Idle | CombatPhase::Destroyed => None,
        }
    }
}

impl Default for CombatantState {
    fn default() -> Self {
        Self::idle()
    }
}
