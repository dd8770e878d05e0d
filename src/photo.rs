//! Photo scoring: the creature nearest the frame centre earns points.
//!
//! Distances are measured in viewport space (0..1 on both axes).  A shot's
//! quality falls from 1 at dead centre to 0 at `max_center_distance` along a
//! smoothstep curve; the points awarded are `round(base_points × quality)`.

use crate::accessory::Accessory;
use crate::config::CreatureConfig;
use crate::creature::{Creature, CreaturePart};
use crate::error::GenError;
use crate::scoring::TargetCaptured;
use bevy::prelude::*;
use std::collections::HashMap;

const VIEWPORT_CENTRE: Vec2 = Vec2::new(0.5, 0.5);

/// Cubic ease-in-out on [0, 1].
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Quality of a shot whose target sits `distance` from the viewport centre.
pub fn shot_quality(distance: f32, max_center_distance: f32) -> f32 {
    if max_center_distance <= 0.0 {
        return 0.0;
    }
    let normalized = (distance / max_center_distance).clamp(0.0, 1.0);
    1.0 - ease_in_out(normalized)
}

/// One creature as seen through the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub creature: Entity,
    /// Viewport position of the aim point.
    pub viewport: Vec2,
    pub base_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotResult {
    pub creature: Entity,
    pub distance: f32,
    pub quality: f32,
    pub points: u32,
}

/// Score the in-frame candidate nearest the viewport centre.
pub fn evaluate_shot(candidates: &[Candidate], max_center_distance: f32) -> Option<ShotResult> {
    candidates
        .iter()
        .filter(|c| (0.0..=1.0).contains(&c.viewport.x) && (0.0..=1.0).contains(&c.viewport.y))
        .map(|c| (c, c.viewport.distance(VIEWPORT_CENTRE)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, distance)| {
            let quality = shot_quality(distance, max_center_distance);
            ShotResult {
                creature: c.creature,
                distance,
                quality,
                points: (c.base_points as f32 * quality).round() as u32,
            }
        })
}

/// Centre of the box enclosing every sprite of each creature, in world space.
///
/// Items are `(creature, transform)` pairs for body parts and accessories
/// alike.  Each sprite's box is its translation ± half its scale (the rendered
/// size).
pub fn aim_points<'a>(
    sprites: impl IntoIterator<Item = (Entity, &'a GlobalTransform)>,
) -> HashMap<Entity, Vec2> {
    let mut boxes: HashMap<Entity, Rect> = HashMap::new();
    for (creature, transform) in sprites {
        let (scale, _, translation) = transform.to_scale_rotation_translation();
        let rect = Rect::from_center_size(translation.truncate(), scale.truncate().abs());
        boxes
            .entry(creature)
            .and_modify(|r| *r = r.union(rect))
            .or_insert(rect);
    }
    boxes.into_iter().map(|(e, r)| (e, r.center())).collect()
}

/// Aim point of every creature from its parts and the accessories they host.
pub fn creature_aim_points(
    parts: &Query<(&CreaturePart, &GlobalTransform)>,
    accessories: &Query<(&ChildOf, &GlobalTransform), With<Accessory>>,
) -> HashMap<Entity, Vec2> {
    let hosted = accessories.iter().filter_map(|(host, transform)| {
        let (part, _) = parts.get(host.parent()).ok()?;
        Some((part.creature, transform))
    });
    aim_points(
        parts
            .iter()
            .map(|(part, transform)| (part.creature, transform))
            .chain(hosted),
    )
}

/// Shutter: on `Space`, photograph the uncaptured creature nearest the centre.
pub fn shutter_system(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<CreatureConfig>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    creatures: Query<(Entity, &Creature)>,
    parts: Query<(&CreaturePart, &GlobalTransform)>,
    accessories: Query<(&ChildOf, &GlobalTransform), With<Accessory>>,
    mut captured: MessageWriter<TargetCaptured>,
    mut reported_missing: Local<bool>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    let Ok((camera, camera_transform)) = cameras.single() else {
        if !*reported_missing {
            error!(
                "{}",
                GenError::MissingCollaborator {
                    name: "camera",
                    disables: "photo scoring",
                }
            );
            *reported_missing = true;
        }
        return;
    };

    let Some(viewport_size) = camera.logical_viewport_size() else {
        return;
    };
    let aims = creature_aim_points(&parts, &accessories);
    let candidates: Vec<Candidate> = creatures
        .iter()
        .filter(|(_, c)| !c.captured)
        .filter_map(|(entity, creature)| {
            let aim = aims.get(&entity)?;
            let pixel = camera
                .world_to_viewport(camera_transform, aim.extend(0.0))
                .ok()?;
            Some(Candidate {
                creature: entity,
                viewport: pixel / viewport_size,
                base_points: creature.base_points,
            })
        })
        .collect();

    match evaluate_shot(&candidates, config.max_center_distance) {
        Some(shot) => {
            info!(
                "Photo hit {:?} | dist={:.3} | quality={:.2} | +{}",
                shot.creature, shot.distance, shot.quality, shot.points
            );
            if shot.points > 0 {
                captured.write(TargetCaptured {
                    creature: shot.creature,
                    points: shot.points,
                });
            }
        }
        None => info!("No target in frame."),
    }
}
