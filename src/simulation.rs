//! Creature plugins for Bevy ECS.
//!
//! [`CreaturePlugin`] is the headless core: population lifecycle, dragging,
//! scoring and feature animation.  It needs no window, input or render assets,
//! so tests run it on `MinimalPlugins`.  [`CreatureFrontendPlugin`] adds what
//! only makes sense with a window: mouse and keyboard input, the photo shutter
//! and sprite images for the shape masks.

use crate::accessory::AccessoryInventory;
use crate::animation::{eye_follow_system, leg_bounce_system, wing_flap_system, wing_hover_system};
use crate::config::CreatureConfig;
use crate::drag::{drag_system, mouse_to_pointer_system, DragState, PointerInput, PointerWorld};
use crate::photo::shutter_system;
use crate::population::{
    init_gen_rng, population_input_system, regenerate_creature_system, respawn_system,
    PopulationChanged, RespawnRequest, Roster,
};
use crate::scoring::{
    apply_captures_system, reset_win_system, AllTargetsCaptured, ScoreBoard, ScoreChanged,
    TargetCaptured, WinState,
};
use crate::shape::MaskCache;
use crate::sprite_cache::{attach_shape_sprite_system, ShapeSprites};
use crate::template::RegenerateCreature;
use bevy::prelude::*;

pub struct CreaturePlugin;

impl Plugin for CreaturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CreatureConfig>()
            .init_resource::<AccessoryInventory>()
            .init_resource::<Roster>()
            .init_resource::<ScoreBoard>()
            .init_resource::<WinState>()
            .init_resource::<DragState>()
            .init_resource::<PointerWorld>()
            .add_message::<RespawnRequest>()
            .add_message::<PopulationChanged>()
            .add_message::<RegenerateCreature>()
            .add_message::<PointerInput>()
            .add_message::<TargetCaptured>()
            .add_message::<ScoreChanged>()
            .add_message::<AllTargetsCaptured>()
            .add_systems(Startup, init_gen_rng)
            .add_systems(
                Update,
                (
                    respawn_system,
                    regenerate_creature_system.after(respawn_system),
                    reset_win_system.after(respawn_system),
                    apply_captures_system.after(reset_win_system),
                    drag_system,
                    wing_hover_system,
                    wing_flap_system,
                    leg_bounce_system,
                    eye_follow_system,
                ),
            );
    }
}

pub struct CreatureFrontendPlugin;

impl Plugin for CreatureFrontendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MaskCache>()
            .init_resource::<ShapeSprites>()
            .add_systems(
                Update,
                (
                    mouse_to_pointer_system.before(drag_system),
                    population_input_system.before(respawn_system),
                    shutter_system.before(apply_captures_system),
                    attach_shape_sprite_system,
                ),
            );
    }
}
