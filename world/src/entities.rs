//! Entity records stored in the world's generational table.

use frost_defence_core::{
    CombatProfile, CombatantSnapshot, CombatantState, EntityHandle, EntityKind, EntityProbe,
    GridCell, Health,
};
use glam::Vec3;

/// Single simulated entity.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) kind: EntityKind,
    pub(crate) position: Vec3,
    pub(crate) body: Body,
}

/// Kind-specific state of an entity.
#[derive(Clone, Debug)]
pub(crate) enum Body {
    Combatant(Combatant),
    Projectile(Projectile),
}

/// Health, attack profile and state machine of a combat participant.
#[derive(Clone, Debug)]
pub(crate) struct Combatant {
    pub(crate) health: Health,
    pub(crate) profile: CombatProfile,
    pub(crate) state: CombatantState,
    pub(crate) speed: f32,
    pub(crate) site: Option<GridCell>,
}

/// Projectile in flight toward a captured target.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) target: EntityHandle,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
}

impl Entity {
    pub(crate) fn combatant(kind: EntityKind, position: Vec3, combatant: Combatant) -> Self {
        Self {
            kind,
            position,
            body: Body::Combatant(combatant),
        }
    }

    pub(crate) fn projectile(position: Vec3, projectile: Projectile) -> Self {
        Self {
            kind: EntityKind::Projectile,
            position,
            body: Body::Projectile(projectile),
        }
    }

    pub(crate) fn as_combatant(&self) -> Option<&Combatant> {
        match &self.body {
            Body::Combatant(combatant) => Some(combatant),
            Body::Projectile(_) => None,
        }
    }

    pub(crate) fn as_combatant_mut(&mut self) -> Option<&mut Combatant> {
        match &mut self.body {
            Body::Combatant(combatant) => Some(combatant),
            Body::Projectile(_) => None,
        }
    }

    pub(crate) fn as_projectile(&self) -> Option<Projectile> {
        match &self.body {
            Body::Projectile(projectile) => Some(*projectile),
            Body::Combatant(_) => None,
        }
    }

    pub(crate) fn probe(&self, entity: EntityHandle) -> EntityProbe {
        EntityProbe {
            entity,
            kind: self.kind,
            position: self.position,
        }
    }

    pub(crate) fn snapshot(&self, entity: EntityHandle) -> Option<CombatantSnapshot> {
        let combatant = self.as_combatant()?;
        Some(CombatantSnapshot {
            entity,
            kind: self.kind,
            position: self.position,
            health: combatant.health,
            profile: combatant.profile,
            state: combatant.state,
            speed: combatant.speed,
        })
    }
}
