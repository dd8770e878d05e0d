//! Static walls around the play area.
//!
//! Four fixed cuboids enclose the background rectangle grown by `padding`,
//! each `thickness` thick and long enough to overlap at the corners, so no
//! dynamic body can slip out of the play area.

use crate::config::CreatureConfig;
use crate::error::GenError;
use crate::graphics::Background;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSide {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSpec {
    pub side: WallSide,
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl WallSpec {
    pub fn rect(&self) -> Rect {
        Rect::from_center_half_size(self.center, self.half_extents)
    }
}

/// Marker for a boundary wall entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct WorldWall(pub WallSide);

/// Wall geometry for `extents` grown by `padding`.
pub fn world_walls(extents: Rect, padding: f32, thickness: f32) -> [WallSpec; 4] {
    let inner = extents.inflate(padding);
    let half_t = thickness * 0.5;
    let centre = inner.center();
    let vertical_half = Vec2::new(half_t, inner.height() * 0.5 + thickness);
    let horizontal_half = Vec2::new(inner.width() * 0.5 + thickness, half_t);

    [
        WallSpec {
            side: WallSide::Left,
            center: Vec2::new(inner.min.x - half_t, centre.y),
            half_extents: vertical_half,
        },
        WallSpec {
            side: WallSide::Right,
            center: Vec2::new(inner.max.x + half_t, centre.y),
            half_extents: vertical_half,
        },
        WallSpec {
            side: WallSide::Top,
            center: Vec2::new(centre.x, inner.max.y + half_t),
            half_extents: horizontal_half,
        },
        WallSpec {
            side: WallSide::Bottom,
            center: Vec2::new(centre.x, inner.min.y - half_t),
            half_extents: horizontal_half,
        },
    ]
}

/// Startup: build the four walls around the background, if enabled.
pub fn spawn_world_bounds(
    mut commands: Commands,
    config: Res<CreatureConfig>,
    backgrounds: Query<&Background>,
) {
    if !config.world_bounds_enabled {
        return;
    }
    let Some(background) = backgrounds.iter().next() else {
        error!(
            "{}",
            GenError::MissingCollaborator {
                name: "background",
                disables: "world bounds",
            }
        );
        return;
    };

    for wall in world_walls(background.extents, config.wall_padding, config.wall_thickness) {
        commands.spawn((
            WorldWall(wall.side),
            RigidBody::Fixed,
            Collider::cuboid(wall.half_extents.x, wall.half_extents.y),
            Transform::from_translation(wall.center.extend(0.0)),
        ));
    }
    eprintln!("[SETUP] World bounds spawned");
}
