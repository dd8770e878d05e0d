//! Free-form creatures: a row of random primitives linked by damped springs.

use crate::primitive::{BodyRole, PartBlueprint};
use crate::shape::ShapeKind;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

/// Damped spring between two consecutive chain parts.
///
/// Stored on the `to` part as an [`ImpulseJoint`] whose parent is `from`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringLink {
    pub from: usize,
    pub to: usize,
    pub rest_length: f32,
    /// Natural frequency in Hz.
    pub frequency: f32,
    /// 1.0 is critical damping.
    pub damping_ratio: f32,
}

impl SpringLink {
    fn omega(&self) -> f32 {
        TAU * self.frequency
    }

    /// Acceleration-based stiffness, ω².
    pub fn stiffness(&self) -> f32 {
        self.omega() * self.omega()
    }

    /// Acceleration-based damping, 2ζω.
    pub fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * self.omega()
    }

    /// Joint to insert on the `to` entity, parented to `from_entity`.
    pub fn joint(&self, from_entity: Entity) -> ImpulseJoint {
        ImpulseJoint::new(
            from_entity,
            SpringJointBuilder::new(self.rest_length, self.stiffness(), self.damping()),
        )
    }
}

/// Inputs of one chain assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainParams {
    pub count: usize,
    pub origin: Vec2,
    pub spacing: f32,
    /// Half of the rendered part size.
    pub shape_size: f32,
    pub anchor_first: bool,
    pub spring_frequency: f32,
    pub spring_damping_ratio: f32,
}

/// Pure result of [`assemble_chain`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainBlueprint {
    pub parts: Vec<PartBlueprint>,
    pub links: Vec<SpringLink>,
}

impl ChainBlueprint {
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Horizontal span from the first part's centre to the last part's.
    pub fn span(&self) -> f32 {
        match (self.parts.first(), self.parts.last()) {
            (Some(first), Some(last)) => last.position.x - first.position.x,
            _ => 0.0,
        }
    }
}

/// Lay out `count` random parts left to right and link each to its predecessor.
///
/// Part `i` sits at `origin + (i × spacing, 0)`.  With `anchor_first` the first
/// part becomes kinematic once the links exist; the links themselves are not
/// touched.  A count of 1 yields a single unlinked part, 0 an empty chain.
pub fn assemble_chain<R: Rng + ?Sized>(params: &ChainParams, rng: &mut R) -> ChainBlueprint {
    let mut parts = Vec::with_capacity(params.count);
    let mut links = Vec::with_capacity(params.count.saturating_sub(1));

    for i in 0..params.count {
        parts.push(PartBlueprint {
            kind: ShapeKind::random(rng),
            position: params.origin + Vec2::new(i as f32 * params.spacing, 0.0),
            rotation: 0.0,
            size: Vec2::splat(params.shape_size * 2.0),
            color: random_part_color(rng),
            role: BodyRole::Dynamic,
            z: 0.0,
            lock_rotation: true,
            slot: None,
        });

        if i > 0 {
            links.push(SpringLink {
                from: i - 1,
                to: i,
                rest_length: params.spacing,
                frequency: params.spring_frequency,
                damping_ratio: params.spring_damping_ratio,
            });
        }
    }

    if params.anchor_first {
        if let Some(first) = parts.first_mut() {
            first.role = BodyRole::Kinematic;
        }
    }

    ChainBlueprint { parts, links }
}

/// Saturated, bright color: hue anywhere, saturation in [0.6, 1), value in [0.7, 1).
pub fn random_part_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let hue = rng.gen::<f32>() * 360.0;
    let saturation = 0.6 + 0.4 * rng.gen::<f32>();
    let value = 0.7 + 0.3 * rng.gen::<f32>();
    Color::hsv(hue, saturation, value)
}
