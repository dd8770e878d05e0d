use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use std::env;

use shutterbug::accessory::AccessoryInventory;
use shutterbug::bounds::spawn_world_bounds;
use shutterbug::config::{self, CreatureConfig};
use shutterbug::graphics;
use shutterbug::population::{init_gen_rng, request_initial_population};
use shutterbug::simulation::{CreatureFrontendPlugin, CreaturePlugin};

/// Configure Rapier physics: world gravity from the creature config.
fn setup_physics_config(
    mut rapier: Query<&mut RapierConfiguration>,
    config: Res<CreatureConfig>,
) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = Vec2::new(0.0, config.gravity);
    }
}

/// Let `SHUTTERBUG_SEED` pin the generation seed without editing the config.
fn apply_seed_override(mut config: ResMut<CreatureConfig>) {
    let Ok(raw) = env::var(config::SEED_ENV_VAR) else {
        return;
    };
    match config::parse_seed_override(&raw) {
        Ok(seed) => {
            config.seed = Some(seed);
            info!("[SETUP] Using seed from {}: {seed}", config::SEED_ENV_VAR);
        }
        Err(e) => warn!("Ignoring {}: {e}", config::SEED_ENV_VAR),
    }
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Shutterbug".into(),
            resolution: WindowResolution::new(1600, 900),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.12)))
    // Compiled defaults; load_creature_config overwrites them from
    // assets/creatures.toml (if present) in the Startup schedule.
    .insert_resource(CreatureConfig::default())
    .insert_resource(AccessoryInventory::default())
    // pixels_per_meter(1.0) keeps world units and physics units identical, so
    // gravity, spring rest lengths and hover speeds are all in pixels.
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
    .add_plugins((CreaturePlugin, CreatureFrontendPlugin))
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            config::load_creature_config,
            apply_seed_override
                .after(config::load_creature_config)
                .before(init_gen_rng),
            graphics::setup_camera.after(config::load_creature_config),
            graphics::spawn_background.after(config::load_creature_config),
            spawn_world_bounds.after(graphics::spawn_background),
            setup_physics_config.after(config::load_creature_config),
            request_initial_population.after(graphics::spawn_background),
        ),
    );

    app.run();
}
