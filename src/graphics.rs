use crate::config::CreatureConfig;
use bevy::prelude::*;

/// Play-area backdrop.  Its extents define the spawn bands and world bounds.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub extents: Rect,
}

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    eprintln!("[SETUP] Camera spawned");
}

/// Spawn the sky backdrop and the ground strip under it.
pub fn spawn_background(mut commands: Commands, config: Res<CreatureConfig>) {
    let extents = config.background_rect();
    commands.spawn((
        Background { extents },
        Sprite {
            color: Color::srgb(0.55, 0.75, 0.95),
            custom_size: Some(extents.size()),
            ..default()
        },
        Transform::from_translation(extents.center().extend(-10.0)),
    ));

    let ground_height = extents.height() * config.ground_band;
    commands.spawn((
        Sprite {
            color: Color::srgb(0.35, 0.55, 0.25),
            custom_size: Some(Vec2::new(extents.width(), ground_height)),
            ..default()
        },
        Transform::from_xyz(
            extents.center().x,
            extents.min.y + ground_height * 0.5,
            -9.0,
        ),
    ));
    eprintln!(
        "[SETUP] Background spawned: {:.0} x {:.0}",
        extents.width(),
        extents.height()
    );
}
