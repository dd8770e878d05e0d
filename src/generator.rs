//! The two interchangeable creature generation strategies.
//!
//! Both produce a [`CreatureBlueprint`]; the spawner never needs to know which
//! one ran.  [`GenerationStrategy`] (from config) selects between them, with
//! `Mixed` flipping a coin per creature.

use crate::accessory::{attach_wing, pick_accessory, place_accessory, plan_eyes, AccessoryInventory, AccessoryParams};
use crate::chain::{assemble_chain, ChainParams};
use crate::config::CreatureConfig;
use crate::creature::{BodyLayout, CreatureBlueprint, CreatureGenome, CreatureRole};
use crate::population::{decide_role, roll_base_points, spawn_origin};
use crate::template::{self, Archetype, SlotCategory};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Deserialize;

/// Template slot layouts span roughly this many template units edge to edge.
const TEMPLATE_SPAN: f32 = 1.8;

/// Which generator the population spawner uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum GenerationStrategy {
    /// Free-form spring chains with accessories.
    #[default]
    Chain,
    /// Slot-based anatomical templates.
    Template,
    /// Per creature, either of the above on a fair coin flip.
    Mixed,
}

/// Everything a generator may read, plus the shared generation RNG.
pub struct GenContext<'a> {
    pub config: &'a CreatureConfig,
    pub inventory: &'a AccessoryInventory,
    /// Background extents used for the spawn bands.
    pub bounds: Rect,
    pub rng: &'a mut StdRng,
}

/// A strategy that turns a context into one creature blueprint.
pub trait CreatureGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    fn generate(&self, ctx: &mut GenContext) -> CreatureBlueprint;
}

/// Resolve the generator for one creature.
pub fn generator_for(
    strategy: GenerationStrategy,
    rng: &mut StdRng,
) -> &'static dyn CreatureGenerator {
    match strategy {
        GenerationStrategy::Chain => &ChainGenerator,
        GenerationStrategy::Template => &TemplateGenerator,
        GenerationStrategy::Mixed => {
            if rng.gen_bool(0.5) {
                &ChainGenerator
            } else {
                &TemplateGenerator
            }
        }
    }
}

// ── Chain strategy ────────────────────────────────────────────────────────────

pub struct ChainGenerator;

impl CreatureGenerator for ChainGenerator {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn generate(&self, ctx: &mut GenContext) -> CreatureBlueprint {
        let config = ctx.config;
        let params = AccessoryParams::from_config(config);
        let role = decide_role(ctx.inventory, config.flying_chance, ctx.rng);

        let count = if config.chain_len_min < config.chain_len_max {
            ctx.rng.gen_range(config.chain_len_min..config.chain_len_max)
        } else {
            config.chain_len_min
        };
        let spacing = 2.0 * config.shape_size;
        let span = count.saturating_sub(1) as f32 * spacing;
        let origin = spawn_origin(ctx.bounds, role, span, config, ctx.rng);

        let chain = assemble_chain(
            &ChainParams {
                count,
                origin,
                spacing,
                shape_size: config.shape_size,
                // An anchored flyer would mix kinematic and dynamic parts.
                anchor_first: config.anchor_first && role == CreatureRole::Grounded,
                spring_frequency: config.spring_frequency,
                spring_damping_ratio: config.spring_damping_ratio,
            },
            ctx.rng,
        );

        let mut accessories = Vec::new();
        if let Some(first) = chain.parts.first() {
            accessories.extend(plan_eyes(0, first, &params, ctx.rng));
        }
        if chain.parts.len() > 1 {
            let last = chain.parts.len() - 1;
            accessories.extend(plan_eyes(last, &chain.parts[last], &params, ctx.rng));
        }
        for link in &chain.links {
            let host = &chain.parts[link.to];
            if let Some(descriptor) =
                pick_accessory(&ctx.inventory.items, role, params.skip_chance, ctx.rng)
            {
                accessories.push(place_accessory(link.to, host, descriptor, &params, ctx.rng));
            }
        }

        let mut hover_host = None;
        if role == CreatureRole::Flying {
            if let Some(wing) = attach_wing(&chain.parts, &ctx.inventory.items, &params, ctx.rng) {
                hover_host = Some(wing.host);
                accessories.push(wing);
            }
        }

        let base_points = roll_base_points(config.base_points_min, config.base_points_max, ctx.rng);

        let mut blueprint = CreatureBlueprint {
            role,
            layout: BodyLayout::Chain,
            parts: chain.parts,
            links: chain.links,
            accessories,
            base_points,
            genome: None,
            hover_host,
        };
        blueprint.apply_role();
        blueprint
    }
}

// ── Template strategy ─────────────────────────────────────────────────────────

pub struct TemplateGenerator;

impl TemplateGenerator {
    /// Build a template creature from an explicit archetype and seed.
    ///
    /// The placement roll still uses the context RNG; the anatomy itself only
    /// depends on `seed`.
    pub fn generate_seeded(
        ctx: &mut GenContext,
        archetype: Archetype,
        seed: u64,
    ) -> CreatureBlueprint {
        let config = ctx.config;
        let role = archetype.default_role();
        let width = TEMPLATE_SPAN * config.template_scale;
        let origin = spawn_origin(ctx.bounds, role, width, config, ctx.rng);
        let centre = origin + Vec2::new(width * 0.5, 0.0);

        let creature = template::generate(archetype, seed, &config.palette_colors());
        let parts = creature.to_parts(centre, config.template_scale, role.body_role());
        let hover_host = match role {
            CreatureRole::Flying => parts
                .iter()
                .position(|p| p.slot == Some(SlotCategory::Body)),
            CreatureRole::Grounded => None,
        };
        let base_points = roll_base_points(config.base_points_min, config.base_points_max, ctx.rng);

        CreatureBlueprint {
            role,
            layout: BodyLayout::Compound,
            parts,
            links: Vec::new(),
            accessories: Vec::new(),
            base_points,
            genome: Some(CreatureGenome { archetype, seed }),
            hover_host,
        }
    }
}

impl CreatureGenerator for TemplateGenerator {
    fn name(&self) -> &'static str {
        "template"
    }

    fn generate(&self, ctx: &mut GenContext) -> CreatureBlueprint {
        let archetype = ctx
            .config
            .forced_archetype
            .unwrap_or_else(|| Archetype::random(ctx.rng));
        let seed = ctx.rng.gen::<u64>();
        Self::generate_seeded(ctx, archetype, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::PlacementKind;
    use crate::primitive::BodyRole;
    use rand::SeedableRng;

    fn inventory() -> AccessoryInventory {
        AccessoryInventory {
            items: CreatureConfig::default().accessories,
        }
    }

    fn run(
        generator: &dyn CreatureGenerator,
        config: &CreatureConfig,
        inventory: &AccessoryInventory,
        seed: u64,
    ) -> CreatureBlueprint {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = GenContext {
            config,
            inventory,
            bounds: config.background_rect(),
            rng: &mut rng,
        };
        generator.generate(&mut ctx)
    }

    #[test]
    fn chain_roles_are_never_mixed() {
        let config = CreatureConfig {
            anchor_first: true,
            ..default()
        };
        let inventory = inventory();
        for seed in 0..200 {
            let bp = run(&ChainGenerator, &config, &inventory, seed);
            let expected = bp.role.body_role();
            assert!(bp.parts.iter().all(|p| p.role == expected), "seed {seed}");
        }
    }

    #[test]
    fn anchored_grounded_chain_is_fully_kinematic() {
        let config = CreatureConfig {
            anchor_first: true,
            flying_chance: 0.0,
            ..default()
        };
        let bp = run(&ChainGenerator, &config, &inventory(), 9);
        assert_eq!(bp.role, CreatureRole::Grounded);
        assert!(bp.parts.iter().all(|p| p.role == BodyRole::Kinematic));
    }

    #[test]
    fn chain_links_and_points_respect_config_ranges() {
        let config = CreatureConfig::default();
        let inventory = inventory();
        for seed in 0..100 {
            let bp = run(&ChainGenerator, &config, &inventory, seed);
            assert!((1..6).contains(&bp.parts.len()));
            assert_eq!(bp.links.len(), bp.parts.len() - 1);
            assert!((50..200).contains(&bp.base_points));
        }
    }

    #[test]
    fn flyers_with_wing_inventory_try_for_a_wing() {
        let config = CreatureConfig {
            flying_chance: 1.0,
            ..default()
        };
        let bp = run(&ChainGenerator, &config, &inventory(), 21);
        assert_eq!(bp.role, CreatureRole::Flying);
        let wing = bp
            .accessories
            .iter()
            .find(|a| a.kind == PlacementKind::Wing)
            .expect("a wing is available, so the first attempt succeeds");
        assert_eq!(bp.hover_host, Some(wing.host));
    }

    #[test]
    fn grounded_chains_carry_no_wing() {
        let config = CreatureConfig {
            flying_chance: 0.0,
            accessory_skip_chance: 0.0,
            ..default()
        };
        let inventory = inventory();
        for seed in 0..100 {
            let bp = run(&ChainGenerator, &config, &inventory, seed);
            assert!(bp.accessories.iter().all(|a| a.kind != PlacementKind::Wing));
            assert!(bp.hover_host.is_none());
        }
    }

    #[test]
    fn no_wing_in_inventory_means_no_flyers() {
        let config = CreatureConfig {
            flying_chance: 1.0,
            ..default()
        };
        let inventory = AccessoryInventory::default();
        for seed in 0..50 {
            assert_eq!(
                run(&ChainGenerator, &config, &inventory, seed).role,
                CreatureRole::Grounded
            );
        }
    }

    #[test]
    fn eyes_go_only_on_chain_extremities() {
        let config = CreatureConfig::default();
        let inventory = inventory();
        for seed in 0..100 {
            let bp = run(&ChainGenerator, &config, &inventory, seed);
            let last = bp.parts.len() - 1;
            for eye in bp.accessories.iter().filter(|a| a.kind == PlacementKind::Eye) {
                assert!(eye.host == 0 || eye.host == last);
            }
        }
    }

    #[test]
    fn template_creatures_carry_their_genome() {
        let config = CreatureConfig {
            forced_archetype: Some(Archetype::Bird),
            ..default()
        };
        let bp = run(&TemplateGenerator, &config, &inventory(), 4);
        assert_eq!(bp.layout, BodyLayout::Compound);
        assert_eq!(bp.role, CreatureRole::Flying);
        let genome = bp.genome.expect("template creatures record a genome");
        assert_eq!(genome.archetype, Archetype::Bird);
        assert!(bp.links.is_empty());
        assert_eq!(bp.hover_host, Some(0));

        let again = template::generate(Archetype::Bird, genome.seed, &config.palette_colors());
        assert_eq!(again.slots.len(), bp.parts.len());
    }

    #[test]
    fn mixed_strategy_uses_both_generators() {
        let mut rng = StdRng::seed_from_u64(8);
        let names: Vec<_> = (0..50)
            .map(|_| generator_for(GenerationStrategy::Mixed, &mut rng).name())
            .collect();
        assert!(names.contains(&"chain"));
        assert!(names.contains(&"template"));
    }
}
