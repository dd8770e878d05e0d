//! Creature components and the pure blueprint a generator hands to the spawner.

use crate::accessory::AccessoryPlacement;
use crate::chain::SpringLink;
use crate::primitive::{BodyRole, PartBlueprint};
use crate::template::Archetype;
use bevy::prelude::*;

/// Grounded creatures are static scenery; flying ones are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatureRole {
    Grounded,
    Flying,
}

impl CreatureRole {
    /// Body role every part of a creature with this role must have.
    pub fn body_role(self) -> BodyRole {
        match self {
            CreatureRole::Grounded => BodyRole::Kinematic,
            CreatureRole::Flying => BodyRole::Dynamic,
        }
    }
}

/// Root of one creature: the unit of scoring.
///
/// Sits at the centroid of the creature's parts; despawning it despawns every
/// part and accessory with it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Creature {
    pub role: CreatureRole,
    /// Drawn once at spawn.
    pub base_points: u32,
    pub captured: bool,
}

/// One body part of a creature.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreaturePart {
    pub creature: Entity,
    pub index: usize,
}

/// Archetype and seed a template creature was generated from.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatureGenome {
    pub archetype: Archetype,
    pub seed: u64,
}

/// How the parts of a creature are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLayout {
    /// Every part is its own body, linked by springs.
    Chain,
    /// The root is the only body; parts are its colliders.
    Compound,
}

/// Everything needed to spawn one creature.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureBlueprint {
    pub role: CreatureRole,
    pub layout: BodyLayout,
    pub parts: Vec<PartBlueprint>,
    pub links: Vec<SpringLink>,
    pub accessories: Vec<AccessoryPlacement>,
    pub base_points: u32,
    pub genome: Option<CreatureGenome>,
    /// Part that carries the hover behaviour of a winged flyer.
    pub hover_host: Option<usize>,
}

impl CreatureBlueprint {
    /// Mean of the part positions; `Vec2::ZERO` for an empty creature.
    pub fn centroid(&self) -> Vec2 {
        if self.parts.is_empty() {
            return Vec2::ZERO;
        }
        let sum: Vec2 = self.parts.iter().map(|p| p.position).sum();
        sum / self.parts.len() as f32
    }

    /// Force every part to the body role of the creature's role.
    ///
    /// Keeps creatures unmixed: a grounded creature is kinematic throughout,
    /// a flying one dynamic throughout.
    pub fn apply_role(&mut self) {
        let body = self.role.body_role();
        for part in &mut self.parts {
            part.role = body;
        }
    }
}
