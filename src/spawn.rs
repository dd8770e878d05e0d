//! Turns a [`CreatureBlueprint`] into entities.
//!
//! Hierarchy of one creature:
//!
//! ```text
//! Creature root (centroid pivot; the body itself for compound creatures)
//! ├── part 0 ── accessories (eyes → pupil, wing, limb, ornament)
//! ├── part 1 ── …            (ImpulseJoint → part 0 for chains)
//! └── …
//! ```
//!
//! Despawning the root despawns the whole tree.

use crate::accessory::{Accessory, AccessoryPlacement, PlacementKind};
use crate::animation::{EyeFollow, LegBounce, WingFlap, WingHover, PUPIL_SCALE, PUPIL_TRAVEL};
use crate::config::CreatureConfig;
use crate::creature::{BodyLayout, Creature, CreatureBlueprint, CreaturePart, CreatureRole};
use crate::primitive::{spawn_primitive, BodyPhysics, PartBlueprint, ShapePart};
use crate::shape::ShapeKind;
use crate::template::SlotCategory;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::f32::consts::TAU;

/// Golden angle, used to spread hover phases between creatures.
const PHASE_STEP: f32 = 2.399_963;

/// Components that turn a body into static scenery.
pub fn frozen() -> (GravityScale, Velocity, LockedAxes) {
    (
        GravityScale(0.0),
        Velocity::zero(),
        LockedAxes::ROTATION_LOCKED | LockedAxes::TRANSLATION_LOCKED,
    )
}

/// Spawn a creature root at the blueprint's centroid and everything under it.
pub fn spawn_creature(
    commands: &mut Commands,
    blueprint: &CreatureBlueprint,
    depth: f32,
    config: &CreatureConfig,
) -> Entity {
    let pivot = blueprint.centroid();
    let root = commands
        .spawn((
            Creature {
                role: blueprint.role,
                base_points: blueprint.base_points,
                captured: false,
            },
            Transform::from_translation(pivot.extend(depth)),
            Visibility::default(),
        ))
        .id();

    if let Some(genome) = blueprint.genome {
        commands.entity(root).insert(genome);
    }

    if blueprint.layout == BodyLayout::Compound {
        commands.entity(root).insert((
            blueprint.role.body_role().rigid_body(),
            Damping {
                linear_damping: config.part_linear_damping,
                angular_damping: config.part_angular_damping,
            },
            Ccd::enabled(),
            Sleeping::disabled(),
        ));
        match blueprint.role {
            CreatureRole::Grounded => {
                commands.entity(root).insert(frozen());
            }
            CreatureRole::Flying => {
                commands
                    .entity(root)
                    .insert((Velocity::zero(), GravityScale(1.0)));
            }
        }
    }

    spawn_parts(commands, root, blueprint, pivot, config);
    root
}

/// Spawn the parts, links and accessories of `blueprint` under `root`.
///
/// `pivot` is the root's world position; part transforms are made relative to
/// it.
pub fn spawn_parts(
    commands: &mut Commands,
    root: Entity,
    blueprint: &CreatureBlueprint,
    pivot: Vec2,
    config: &CreatureConfig,
) -> Vec<Entity> {
    let physics = BodyPhysics {
        mass: config.part_mass,
        linear_damping: config.part_linear_damping,
        angular_damping: config.part_angular_damping,
    };
    let standalone = match blueprint.layout {
        BodyLayout::Chain => Some(&physics),
        BodyLayout::Compound => None,
    };

    let entities: Vec<Entity> = blueprint
        .parts
        .iter()
        .enumerate()
        .map(|(index, part)| {
            let entity = spawn_primitive(commands, part, pivot, standalone, Some(root));
            commands.entity(entity).insert(CreaturePart {
                creature: root,
                index,
            });
            decorate_slot(commands, entity, part, pivot, config);
            entity
        })
        .collect();

    if blueprint.layout == BodyLayout::Chain && blueprint.role == CreatureRole::Grounded {
        for entity in &entities {
            commands.entity(*entity).insert(frozen());
        }
    }

    for link in &blueprint.links {
        if let (Some(from), Some(to)) = (entities.get(link.from), entities.get(link.to)) {
            commands.entity(*to).insert(link.joint(*from));
        }
    }

    for placement in &blueprint.accessories {
        if let (Some(host), Some(part)) = (
            entities.get(placement.host),
            blueprint.parts.get(placement.host),
        ) {
            spawn_accessory(commands, *host, part, placement, config);
        }
    }

    if blueprint.role == CreatureRole::Flying {
        let body = match blueprint.layout {
            BodyLayout::Chain => blueprint.hover_host.and_then(|h| entities.get(h).copied()),
            BodyLayout::Compound => blueprint.hover_host.map(|_| root),
        };
        if let Some(body) = body {
            commands.entity(body).insert(WingHover {
                amplitude: config.wing_hover_amplitude,
                frequency: config.wing_hover_frequency,
                phase: (root.index() as f32 * PHASE_STEP) % TAU,
            });
        }
    }

    entities
}

/// Feature animation for template slots: wings flap, legs bounce.
fn decorate_slot(
    commands: &mut Commands,
    entity: Entity,
    part: &PartBlueprint,
    pivot: Vec2,
    config: &CreatureConfig,
) {
    match part.slot {
        Some(SlotCategory::Wing) => {
            commands
                .entity(entity)
                .insert(WingFlap::new(part.rotation, config));
        }
        Some(SlotCategory::Leg) => {
            let rest = part.transform_relative_to(pivot);
            commands.entity(entity).insert(LegBounce {
                rest_translation: rest.translation,
                rest_scale: rest.scale,
                speed: config.leg_bounce_speed,
                amount: config.leg_bounce_amount,
                squish: config.leg_squish_amount,
            });
        }
        _ => {}
    }
}

/// Spawn one accessory as a child of its host part.
///
/// The host transform is scaled to the host's world size, so the accessory's
/// local offset and scale are divided by it.
pub fn spawn_accessory(
    commands: &mut Commands,
    host: Entity,
    host_part: &PartBlueprint,
    placement: &AccessoryPlacement,
    config: &CreatureConfig,
) -> Entity {
    let host_size = host_part.size.max(Vec2::splat(f32::EPSILON));
    let transform = Transform {
        translation: (placement.offset / host_size).extend(placement.sort_bias),
        rotation: Quat::IDENTITY,
        scale: (placement.size / host_size).extend(1.0),
    };

    let accessory = commands
        .spawn((
            Accessory {
                kind: placement.kind,
            },
            ShapePart {
                kind: placement.shape,
            },
            Sprite {
                color: placement.color,
                custom_size: Some(Vec2::ONE),
                ..default()
            },
            transform,
            Visibility::default(),
            ChildOf(host),
        ))
        .id();

    match placement.kind {
        PlacementKind::Eye => {
            let pupil = commands
                .spawn((
                    ShapePart {
                        kind: ShapeKind::Circle,
                    },
                    Sprite {
                        color: Color::BLACK,
                        custom_size: Some(Vec2::ONE),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, 0.01).with_scale(Vec3::splat(PUPIL_SCALE)),
                    Visibility::default(),
                    ChildOf(accessory),
                ))
                .id();
            commands.entity(accessory).insert(EyeFollow {
                pupil,
                travel: PUPIL_TRAVEL,
            });
        }
        PlacementKind::Wing => {
            commands
                .entity(accessory)
                .insert(WingFlap::new(0.0, config));
        }
        PlacementKind::Limb => {
            commands.entity(accessory).insert((
                placement.shape.collider(),
                ColliderMassProperties::Mass(0.0),
            ));
        }
        PlacementKind::Ornament => {}
    }

    accessory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::PlacementKind;
    use crate::chain::SpringLink;
    use crate::primitive::BodyRole;

    fn part(x: f32, role: BodyRole) -> PartBlueprint {
        PartBlueprint {
            kind: ShapeKind::Square,
            position: Vec2::new(x, 100.0),
            rotation: 0.0,
            size: Vec2::splat(32.0),
            color: Color::WHITE,
            role,
            z: 0.0,
            lock_rotation: true,
            slot: None,
        }
    }

    fn chain_blueprint(role: CreatureRole) -> CreatureBlueprint {
        let body = role.body_role();
        CreatureBlueprint {
            role,
            layout: BodyLayout::Chain,
            parts: vec![part(0.0, body), part(32.0, body), part(64.0, body)],
            links: (1..3)
                .map(|i| SpringLink {
                    from: i - 1,
                    to: i,
                    rest_length: 32.0,
                    frequency: 100.0,
                    damping_ratio: 1.0,
                })
                .collect(),
            accessories: vec![AccessoryPlacement {
                host: 2,
                name: "eye-0".into(),
                kind: PlacementKind::Eye,
                shape: ShapeKind::Circle,
                offset: Vec2::new(2.0, -1.0),
                size: Vec2::splat(8.0),
                color: Color::WHITE,
                sort_bias: 0.2,
            }],
            base_points: 120,
            genome: None,
            hover_host: Some(1),
        }
    }

    fn spawn(blueprint: &CreatureBlueprint) -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        let config = CreatureConfig::default();
        let world = app.world_mut();
        let mut queue = bevy::ecs::world::CommandQueue::default();
        let root = {
            let mut commands = Commands::new(&mut queue, world);
            spawn_creature(&mut commands, blueprint, 1.0, &config)
        };
        queue.apply(world);
        (app, root)
    }

    #[test]
    fn root_sits_at_centroid_with_parts_relative() {
        let (mut app, root) = spawn(&chain_blueprint(CreatureRole::Flying));
        let world = app.world_mut();
        let root_t = world.entity(root).get::<Transform>().copied().unwrap();
        assert_eq!(root_t.translation, Vec3::new(32.0, 100.0, 1.0));
        let mut xs: Vec<f32> = world
            .query::<(&CreaturePart, &Transform)>()
            .iter(world)
            .map(|(_, t)| t.translation.x)
            .collect();
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs, vec![-32.0, 0.0, 32.0]);
    }

    #[test]
    fn links_live_on_the_to_part() {
        let (mut app, _) = spawn(&chain_blueprint(CreatureRole::Flying));
        let world = app.world_mut();
        let mut parts: Vec<(usize, Entity, Option<Entity>)> = world
            .query::<(Entity, &CreaturePart, Option<&ImpulseJoint>)>()
            .iter(world)
            .map(|(e, p, j)| (p.index, e, j.map(|j| j.parent)))
            .collect();
        parts.sort_by_key(|p| p.0);
        assert_eq!(parts[0].2, None);
        assert_eq!(parts[1].2, Some(parts[0].1));
        assert_eq!(parts[2].2, Some(parts[1].1));
    }

    #[test]
    fn grounded_chain_parts_are_frozen() {
        let (mut app, _) = spawn(&chain_blueprint(CreatureRole::Grounded));
        let world = app.world_mut();
        let mut count = 0;
        for (body, gravity, velocity) in world
            .query_filtered::<(&RigidBody, &GravityScale, &Velocity), With<CreaturePart>>()
            .iter(world)
        {
            assert_eq!(*body, RigidBody::KinematicPositionBased);
            assert_eq!(gravity.0, 0.0);
            assert_eq!(velocity.linvel, Vec2::ZERO);
            assert_eq!(velocity.angvel, 0.0);
            count += 1;
        }
        assert_eq!(count, 3);
        // Grounded creatures never hover.
        assert_eq!(world.query::<&WingHover>().iter(world).count(), 0);
    }

    #[test]
    fn flying_chain_hovers_on_the_wing_host() {
        let (mut app, _) = spawn(&chain_blueprint(CreatureRole::Flying));
        let world = app.world_mut();
        let hovering: Vec<usize> = world
            .query_filtered::<&CreaturePart, With<WingHover>>()
            .iter(world)
            .map(|p| p.index)
            .collect();
        assert_eq!(hovering, vec![1]);
    }

    #[test]
    fn accessory_offset_is_expressed_in_host_units() {
        let (mut app, _) = spawn(&chain_blueprint(CreatureRole::Flying));
        let world = app.world_mut();
        let (t, follow) = world
            .query::<(&Transform, &EyeFollow)>()
            .single(world)
            .unwrap();
        assert_eq!(t.translation, Vec3::new(2.0 / 32.0, -1.0 / 32.0, 0.2));
        assert_eq!(t.scale, Vec3::new(0.25, 0.25, 1.0));
        assert!(world.get_entity(follow.pupil).is_ok());
    }

    #[test]
    fn despawning_root_removes_the_whole_creature() {
        let (mut app, root) = spawn(&chain_blueprint(CreatureRole::Flying));
        let world = app.world_mut();
        world.entity_mut(root).despawn();
        assert_eq!(world.query::<&CreaturePart>().iter(world).count(), 0);
        assert_eq!(world.query::<&Accessory>().iter(world).count(), 0);
        assert_eq!(world.query::<&ShapePart>().iter(world).count(), 0);
    }
}
