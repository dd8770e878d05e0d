//! Shape primitive factory: one renderable, collidable, simulated part.
//!
//! A [`PartBlueprint`] is the pure description produced by the assemblers;
//! [`spawn_primitive`] turns it into an entity.  The visual image is attached
//! one frame later by [`crate::sprite_cache::attach_shape_sprite_system`], the
//! same `Added<T>` pattern used for every other spawned renderable.

use crate::shape::ShapeKind;
use crate::template::SlotCategory;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Shape kind of a spawned part; drives its sprite mask and hit-testing.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapePart {
    pub kind: ShapeKind,
}

/// Physics role of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    Dynamic,
    Kinematic,
}

impl BodyRole {
    pub fn rigid_body(self) -> RigidBody {
        match self {
            BodyRole::Dynamic => RigidBody::Dynamic,
            BodyRole::Kinematic => RigidBody::KinematicPositionBased,
        }
    }
}

/// Pure description of one part, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct PartBlueprint {
    pub kind: ShapeKind,
    pub position: Vec2,
    /// Radians, counter-clockwise.
    pub rotation: f32,
    /// Rendered width and height in world units.
    pub size: Vec2,
    pub color: Color,
    pub role: BodyRole,
    /// Draw-order offset added to the creature's base depth.
    pub z: f32,
    pub lock_rotation: bool,
    /// Anatomical slot the part fills, for template creatures.
    pub slot: Option<SlotCategory>,
}

impl PartBlueprint {
    /// Half of the rendered size: the render-bounds extents of the part.
    pub fn extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Local transform of the part under a parent placed at `pivot`.
    pub fn transform_relative_to(&self, pivot: Vec2) -> Transform {
        Transform {
            translation: (self.position - pivot).extend(self.z),
            rotation: Quat::from_rotation_z(self.rotation),
            scale: self.size.extend(1.0),
        }
    }
}

/// Body parameters shared by every standalone primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPhysics {
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

/// Spawn a primitive and optionally parent it.
///
/// With `physics = Some(..)` the part is its own rigid body: fixed collider
/// mass, linear/angular damping, continuous collision detection, and rotation
/// locked when the blueprint asks for it.  With `physics = None` the part only
/// carries a collider and joins the compound body of its nearest rigid-body
/// ancestor (template creatures).
///
/// The collider always comes from [`ShapeKind::collider`], so collision and
/// visual shape cannot diverge.
pub fn spawn_primitive(
    commands: &mut Commands,
    part: &PartBlueprint,
    pivot: Vec2,
    physics: Option<&BodyPhysics>,
    parent: Option<Entity>,
) -> Entity {
    let mut entity = commands.spawn((
        ShapePart { kind: part.kind },
        Sprite {
            color: part.color,
            custom_size: Some(Vec2::ONE),
            ..default()
        },
        part.transform_relative_to(pivot),
        Visibility::default(),
        part.kind.collider(),
    ));

    match physics {
        Some(physics) => {
            let locked = if part.lock_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            };
            entity.insert((
                part.role.rigid_body(),
                ColliderMassProperties::Mass(physics.mass),
                Damping {
                    linear_damping: physics.linear_damping,
                    angular_damping: physics.angular_damping,
                },
                Ccd::enabled(),
                Velocity::zero(),
                GravityScale(1.0),
                locked,
                Sleeping::disabled(),
            ));
        }
        None => {
            entity.insert(ColliderMassProperties::Mass(1.0));
        }
    }

    if let Some(parent) = parent {
        entity.insert(ChildOf(parent));
    }

    entity.id()
}
