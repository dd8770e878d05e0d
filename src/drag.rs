//! Pointer dragging of creature parts.
//!
//! Mouse input is translated into [`PointerInput`] messages by
//! [`mouse_to_pointer_system`]; [`drag_system`] only reacts to those messages,
//! so tests (or other input sources) can drive it directly.
//!
//! Pointer-down over a part grabs it: its body turns kinematic and the grab
//! offset is recorded.  Pointer-move keeps the body at pointer + offset.
//! Pointer-up gives the body back its previous role.  Only one body is held at
//! a time; the rest of a chain follows through its springs.

use crate::config::CreatureConfig;
use crate::creature::CreaturePart;
use crate::error::GenError;
use crate::primitive::ShapePart;
use crate::shape::ShapeKind;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// World-space pointer event.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

/// Last known pointer position in world space, if the cursor is in the window.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PointerWorld(pub Option<Vec2>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTarget {
    /// The body being moved: the part itself, or its creature root when the
    /// part is a collider of a compound body.
    pub entity: Entity,
    /// Body position minus pointer position at grab time.
    pub offset: Vec2,
    /// Role to restore on release.
    pub restore: RigidBody,
}

#[derive(Resource, Debug, Default)]
pub struct DragState {
    pub target: Option<DragTarget>,
}

/// Topmost part whose shape contains `point`.
///
/// The point is mapped into each part's unit space through the inverse of its
/// global transform, so the test follows the real outline, rotation and size.
pub fn hit_test<'a>(
    point: Vec2,
    parts: impl IntoIterator<Item = (Entity, ShapeKind, &'a GlobalTransform)>,
) -> Option<Entity> {
    parts
        .into_iter()
        .filter(|(_, kind, transform)| {
            let local = transform
                .affine()
                .inverse()
                .transform_point3(point.extend(transform.translation().z));
            kind.contains_local(local.truncate())
        })
        .max_by(|a, b| a.2.translation().z.total_cmp(&b.2.translation().z))
        .map(|(entity, _, _)| entity)
}

/// Translate mouse state into [`PointerInput`] messages.
pub fn mouse_to_pointer_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut pointer: ResMut<PointerWorld>,
    mut events: MessageWriter<PointerInput>,
    mut reported_missing: Local<bool>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        if !*reported_missing {
            error!(
                "{}",
                GenError::MissingCollaborator {
                    name: "camera",
                    disables: "pointer input",
                }
            );
            *reported_missing = true;
        }
        return;
    };

    let world = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok());
    let moved = world.is_some() && world != pointer.0;
    pointer.0 = world;
    let Some(world) = world else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        events.write(PointerInput::Down(world));
    } else if buttons.pressed(MouseButton::Left) && moved {
        events.write(PointerInput::Move(world));
    }
    if buttons.just_released(MouseButton::Left) {
        events.write(PointerInput::Up(world));
    }
}

/// Apply pointer messages to the drag state.
pub fn drag_system(
    mut events: MessageReader<PointerInput>,
    mut state: ResMut<DragState>,
    config: Res<CreatureConfig>,
    parts: Query<(Entity, &ShapePart, &CreaturePart, &GlobalTransform)>,
    globals: Query<&GlobalTransform>,
    mut bodies: Query<(&mut RigidBody, &mut Transform, Option<&ChildOf>)>,
) {
    if !config.drag_enabled {
        events.clear();
        return;
    }

    for event in events.read() {
        match *event {
            PointerInput::Down(point) => {
                if state.target.is_some() {
                    continue;
                }
                let Some(hit) = hit_test(
                    point,
                    parts.iter().map(|(e, shape, _, gt)| (e, shape.kind, gt)),
                ) else {
                    continue;
                };
                let body = if bodies.get(hit).is_ok() {
                    hit
                } else {
                    match parts.get(hit) {
                        Ok((_, _, part, _)) => part.creature,
                        Err(_) => continue,
                    }
                };
                let Ok(body_global) = globals.get(body) else {
                    continue;
                };
                let Ok((mut rigid_body, _, _)) = bodies.get_mut(body) else {
                    continue;
                };
                state.target = Some(DragTarget {
                    entity: body,
                    offset: body_global.translation().truncate() - point,
                    restore: *rigid_body,
                });
                *rigid_body = RigidBody::KinematicPositionBased;
            }
            PointerInput::Move(point) => {
                let Some(target) = state.target else {
                    continue;
                };
                let Ok((_, mut transform, parent)) = bodies.get_mut(target.entity) else {
                    state.target = None;
                    continue;
                };
                let desired = (point + target.offset).extend(0.0);
                let local = match parent.and_then(|p| globals.get(p.parent()).ok()) {
                    Some(parent_global) => parent_global.affine().inverse().transform_point3(desired),
                    None => desired,
                };
                transform.translation.x = local.x;
                transform.translation.y = local.y;
            }
            PointerInput::Up(_) => {
                if let Some(target) = state.target.take() {
                    if let Ok((mut rigid_body, _, _)) = bodies.get_mut(target.entity) {
                        *rigid_body = target.restore;
                    }
                }
            }
        }
    }
}
