//! Population lifecycle: populate, respawn and per-creature regeneration.
//!
//! The roster moves between two states only:
//!
//! ```text
//! Empty ──populate──▶ Populated ──respawn──▶ Empty ──populate──▶ Populated …
//! ```
//!
//! A respawn destroys every creature and then spawns the new population inside
//! a single system run, so no other system ever observes a half-built roster.

use crate::accessory::AccessoryInventory;
use crate::config::CreatureConfig;
use crate::creature::{Creature, CreatureGenome, CreaturePart, CreatureRole};
use crate::error::GenError;
use crate::generator::{generator_for, GenContext, TemplateGenerator};
use crate::graphics::Background;
use crate::spawn::{spawn_creature, spawn_parts};
use crate::template::RegenerateCreature;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Pure placement rules ──────────────────────────────────────────────────────

/// Flying iff the inventory holds a wing and the coin flip succeeds.
pub fn decide_role<R: Rng + ?Sized>(
    inventory: &AccessoryInventory,
    flying_chance: f64,
    rng: &mut R,
) -> CreatureRole {
    if inventory.has_wing() && rng.gen_bool(flying_chance.clamp(0.0, 1.0)) {
        CreatureRole::Flying
    } else {
        CreatureRole::Grounded
    }
}

/// Left end of a creature `width` units wide.
///
/// `x` is uniform over the background minus the side margins and the width
/// itself.  `y` is drawn from the sky band for flyers and fixed at the ground
/// band for grounded creatures; both are fractions of the background height
/// measured from its bottom edge.
pub fn spawn_origin<R: Rng + ?Sized>(
    bounds: Rect,
    role: CreatureRole,
    width: f32,
    config: &CreatureConfig,
    rng: &mut R,
) -> Vec2 {
    let margin = bounds.width() * config.spawn_margin_fraction;
    let x_min = bounds.min.x + margin;
    let x_max = (bounds.max.x - margin - width).max(x_min);
    let x = x_min + (x_max - x_min) * rng.gen::<f32>();

    let fraction = match role {
        CreatureRole::Flying => {
            config.sky_band_min + (config.sky_band_max - config.sky_band_min) * rng.gen::<f32>()
        }
        CreatureRole::Grounded => config.ground_band,
    };
    Vec2::new(x, bounds.min.y + bounds.height() * fraction)
}

/// Score drawn uniformly from `[min, max)`; `min` when the range is empty.
pub fn roll_base_points<R: Rng + ?Sized>(min: u32, max: u32, rng: &mut R) -> u32 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}

// ── Resources & messages ──────────────────────────────────────────────────────

/// Generation RNG shared by every random decision except template anatomy.
#[derive(Resource, Debug, Clone)]
pub struct GenRng(pub StdRng);

impl GenRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopulationState {
    #[default]
    Empty,
    Populated,
}

/// Live creature roots, in spawn order.
#[derive(Resource, Debug, Default)]
pub struct Roster {
    pub creatures: Vec<Entity>,
    pub state: PopulationState,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}

/// Destroy the current population and spawn a new one.
///
/// `count: None` uses the configured population size.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RespawnRequest {
    pub count: Option<usize>,
}

/// The roster was rebuilt; carries the new size.
#[derive(Message, Debug, Clone, Copy)]
pub struct PopulationChanged {
    pub count: usize,
}

// ── Populate / destroy ────────────────────────────────────────────────────────

/// Despawn every creature (parts and accessories go with their root).
pub fn despawn_all(commands: &mut Commands, roster: &mut Roster) {
    for creature in roster.creatures.drain(..) {
        if let Ok(mut entity) = commands.get_entity(creature) {
            entity.despawn();
        }
    }
    roster.state = PopulationState::Empty;
}

/// Spawn `count` creatures into an empty roster.
pub fn populate(
    commands: &mut Commands,
    ctx: &mut GenContext,
    count: usize,
    roster: &mut Roster,
) {
    for i in 0..count {
        let generator = generator_for(ctx.config.strategy, ctx.rng);
        let blueprint = generator.generate(ctx);
        let root = spawn_creature(commands, &blueprint, creature_depth(i), ctx.config);
        roster.creatures.push(root);
    }
    if count > 0 {
        roster.state = PopulationState::Populated;
    }
}

/// Base draw depth of the `index`-th creature, keeping creatures from interleaving.
pub fn creature_depth(index: usize) -> f32 {
    1.0 + index as f32
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Startup: seed the generation RNG from config.
pub fn init_gen_rng(mut commands: Commands, config: Res<CreatureConfig>) {
    match config.seed {
        Some(seed) => info!("[SETUP] Creature RNG seeded with {seed}"),
        None => info!("[SETUP] Creature RNG seeded from entropy"),
    }
    commands.insert_resource(GenRng::new(config.seed));
}

/// Startup: queue the first population.
pub fn request_initial_population(mut requests: MessageWriter<RespawnRequest>) {
    requests.write(RespawnRequest::default());
}

/// Handle [`RespawnRequest`]s: destroy all, then spawn all.
///
/// Without a [`Background`] there are no spawn bands; the failure is logged
/// once and requests are dropped until one appears.
pub fn respawn_system(
    mut commands: Commands,
    mut requests: MessageReader<RespawnRequest>,
    mut roster: ResMut<Roster>,
    mut rng: ResMut<GenRng>,
    config: Res<CreatureConfig>,
    inventory: Res<AccessoryInventory>,
    backgrounds: Query<&Background>,
    mut changed: MessageWriter<PopulationChanged>,
    mut reported_missing: Local<bool>,
) {
    let requests: Vec<RespawnRequest> = requests.read().copied().collect();
    if requests.is_empty() {
        return;
    }
    let Some(background) = backgrounds.iter().next() else {
        if !*reported_missing {
            error!(
                "{}",
                GenError::MissingCollaborator {
                    name: "background",
                    disables: "creature spawning",
                }
            );
            *reported_missing = true;
        }
        return;
    };

    for request in requests {
        let count = request.count.unwrap_or(config.population_count);
        despawn_all(&mut commands, &mut roster);

        let mut ctx = GenContext {
            config: &config,
            inventory: &inventory,
            bounds: background.extents,
            rng: &mut rng.0,
        };
        populate(&mut commands, &mut ctx, count, &mut roster);
        info!("Population respawned: {} creatures", roster.len());
        changed.write(PopulationChanged { count: roster.len() });
    }
}

/// Rebuild template creatures from a new seed, keeping their root and score.
///
/// Every existing part of the creature is despawned before the new parts are
/// spawned under the same root.  Chain creatures carry no genome and ignore
/// the request, as do creatures no longer in the roster: a respawn earlier in
/// the frame has queued their despawn.
pub fn regenerate_creature_system(
    mut commands: Commands,
    mut requests: MessageReader<RegenerateCreature>,
    mut creatures: Query<(&Creature, &mut CreatureGenome, &Transform)>,
    parts: Query<(Entity, &CreaturePart)>,
    roster: Res<Roster>,
    mut rng: ResMut<GenRng>,
    config: Res<CreatureConfig>,
    inventory: Res<AccessoryInventory>,
) {
    for request in requests.read() {
        if !roster.creatures.contains(&request.creature) {
            continue;
        }
        let Ok((creature, mut genome, transform)) = creatures.get_mut(request.creature) else {
            continue;
        };

        for (entity, part) in parts.iter() {
            if part.creature == request.creature {
                commands.entity(entity).despawn();
            }
        }

        let seed = request.seed.unwrap_or_else(|| rng.0.gen::<u64>());
        let mut ctx = GenContext {
            config: &config,
            inventory: &inventory,
            bounds: Rect::default(),
            rng: &mut rng.0,
        };
        let mut blueprint = TemplateGenerator::generate_seeded(&mut ctx, genome.archetype, seed);
        let pivot = transform.translation.truncate();
        let offset = pivot - blueprint.centroid();
        for part in &mut blueprint.parts {
            part.position += offset;
        }
        blueprint.base_points = creature.base_points;

        spawn_parts(&mut commands, request.creature, &blueprint, pivot, &config);
        genome.seed = seed;
        info!("Regenerated {:?} from seed {seed}", genome.archetype);
    }
}

/// Keyboard shortcuts: `R` respawns the population, `G` regenerates every
/// template creature.
pub fn population_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    genomes: Query<Entity, With<CreatureGenome>>,
    mut respawn: MessageWriter<RespawnRequest>,
    mut regenerate: MessageWriter<RegenerateCreature>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        respawn.write(RespawnRequest::default());
    }
    if keys.just_pressed(KeyCode::KeyG) {
        for creature in genomes.iter() {
            regenerate.write(RegenerateCreature {
                creature,
                seed: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::{AccessoryDescriptor, AccessoryKind};
    use crate::shape::ShapeKind;

    fn wing_inventory() -> AccessoryInventory {
        AccessoryInventory {
            items: vec![AccessoryDescriptor {
                name: "wing".into(),
                kind: AccessoryKind::Wing,
                shape: ShapeKind::Triangle,
                size: [1.0, 0.6],
                color: [1.0, 1.0, 1.0],
            }],
        }
    }

    #[test]
    fn role_requires_a_wing_in_inventory() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty = AccessoryInventory::default();
        for _ in 0..50 {
            assert_eq!(decide_role(&empty, 1.0, &mut rng), CreatureRole::Grounded);
            assert_eq!(decide_role(&wing_inventory(), 1.0, &mut rng), CreatureRole::Flying);
            assert_eq!(decide_role(&wing_inventory(), 0.0, &mut rng), CreatureRole::Grounded);
        }
    }

    #[test]
    fn flyers_spawn_in_sky_band_and_grounded_on_ground_band() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = CreatureConfig::default();
        let bounds = config.background_rect();
        for _ in 0..200 {
            let sky = spawn_origin(bounds, CreatureRole::Flying, 96.0, &config, &mut rng);
            let frac = (sky.y - bounds.min.y) / bounds.height();
            assert!(frac >= config.sky_band_min - 1e-5 && frac <= config.sky_band_max + 1e-5);
            let margin = bounds.width() * config.spawn_margin_fraction;
            assert!(sky.x >= bounds.min.x + margin - 1e-3);
            assert!(sky.x + 96.0 <= bounds.max.x - margin + 1e-3);

            let ground = spawn_origin(bounds, CreatureRole::Grounded, 96.0, &config, &mut rng);
            let frac = (ground.y - bounds.min.y) / bounds.height();
            assert!((frac - config.ground_band).abs() < 1e-5);
        }
    }

    #[test]
    fn base_points_lie_in_half_open_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let points = roll_base_points(50, 200, &mut rng);
            assert!((50..200).contains(&points));
        }
        assert_eq!(roll_base_points(7, 7, &mut rng), 7);
    }

    #[test]
    fn seeded_gen_rng_is_reproducible() {
        let mut a = GenRng::new(Some(42));
        let mut b = GenRng::new(Some(42));
        assert_eq!(a.0.gen::<u64>(), b.0.gen::<u64>());
    }
}
