//! Slot-based anatomical creatures.
//!
//! Each [`Archetype`] owns a fixed, read-only list of [`SlotTemplate`]s: where a
//! body part sits (in template units, roughly ±1), which shapes it may take and
//! the size/rotation box it is drawn from.  [`generate`] realizes one creature
//! from an archetype and a seed; the result is fully determined by the seed.
//!
//! ## Draw order
//!
//! | Category            | Tier | Drawn        |
//! |---------------------|------|--------------|
//! | `Eye`               | 3    | topmost      |
//! | everything else     | 2    | middle       |
//! | `Wing` `Fin` `Tail` | 1    | behind body  |
//! | `Leg`               | 0    | bottommost   |

use crate::creature::CreatureRole;
use crate::primitive::{BodyRole, PartBlueprint};
use crate::shape::ShapeKind;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Named anatomical template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Archetype {
    Worm,
    Bird,
    Fish,
    Spider,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Worm,
        Archetype::Bird,
        Archetype::Fish,
        Archetype::Spider,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn slots(self) -> &'static [SlotTemplate] {
        match self {
            Archetype::Worm => &WORM,
            Archetype::Bird => &BIRD,
            Archetype::Fish => &FISH,
            Archetype::Spider => &SPIDER,
        }
    }

    /// Birds and fish float in the sky band; worms and spiders stay grounded.
    pub fn default_role(self) -> CreatureRole {
        match self {
            Archetype::Bird | Archetype::Fish => CreatureRole::Flying,
            Archetype::Worm | Archetype::Spider => CreatureRole::Grounded,
        }
    }
}

/// Anatomical category of a slot.  Drives accent coloring and draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotCategory {
    Segment,
    Body,
    Head,
    Eye,
    Beak,
    Wing,
    Fin,
    Tail,
    Spot,
    Leg,
}

impl SlotCategory {
    /// Sensory, flight and marking slots take the accent color.
    pub fn is_accent(self) -> bool {
        matches!(
            self,
            SlotCategory::Eye | SlotCategory::Wing | SlotCategory::Fin | SlotCategory::Spot
        )
    }

    pub fn render_tier(self) -> RenderTier {
        match self {
            SlotCategory::Eye => RenderTier::Top,
            SlotCategory::Wing | SlotCategory::Fin | SlotCategory::Tail => RenderTier::BehindBody,
            SlotCategory::Leg => RenderTier::Bottom,
            _ => RenderTier::Middle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderTier {
    Bottom = 0,
    BehindBody = 1,
    Middle = 2,
    Top = 3,
}

impl RenderTier {
    /// Depth offset under the creature root.
    pub fn z(self) -> f32 {
        self as u8 as f32 * 0.05
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotTemplate {
    pub name: &'static str,
    pub category: SlotCategory,
    pub allowed: &'static [ShapeKind],
    pub position: Vec2,
    pub size_min: Vec2,
    pub size_max: Vec2,
    /// Degrees, inclusive range.
    pub rotation: (f32, f32),
    /// Skipped on a fair coin flip when set.
    pub optional: bool,
}

const ROUND: &[ShapeKind] = &[ShapeKind::Circle, ShapeKind::Square];
const POINTED: &[ShapeKind] = &[ShapeKind::Triangle];
const DOT: &[ShapeKind] = &[ShapeKind::Circle];
const LIMB: &[ShapeKind] = &[ShapeKind::Square, ShapeKind::Triangle];
const TAIL: &[ShapeKind] = &[ShapeKind::Triangle, ShapeKind::Square];

const fn slot(
    name: &'static str,
    category: SlotCategory,
    allowed: &'static [ShapeKind],
    position: (f32, f32),
    size_min: (f32, f32),
    size_max: (f32, f32),
    rotation: (f32, f32),
    optional: bool,
) -> SlotTemplate {
    SlotTemplate {
        name,
        category,
        allowed,
        position: Vec2::new(position.0, position.1),
        size_min: Vec2::new(size_min.0, size_min.1),
        size_max: Vec2::new(size_max.0, size_max.1),
        rotation,
        optional,
    }
}

use SlotCategory as C;

static WORM: [SlotTemplate; 5] = [
    slot("Segment1", C::Segment, ROUND, (-0.6, 0.0), (0.35, 0.35), (0.5, 0.5), (0.0, 0.0), false),
    slot("Segment2", C::Segment, ROUND, (-0.15, 0.0), (0.35, 0.35), (0.5, 0.5), (0.0, 0.0), false),
    slot("Segment3", C::Segment, ROUND, (0.3, 0.0), (0.3, 0.3), (0.45, 0.45), (0.0, 0.0), false),
    slot("Head", C::Head, ROUND, (0.7, 0.05), (0.3, 0.3), (0.4, 0.4), (0.0, 0.0), false),
    slot("Eye", C::Eye, DOT, (0.82, 0.12), (0.07, 0.07), (0.1, 0.1), (0.0, 0.0), false),
];

static BIRD: [SlotTemplate; 7] = [
    slot("Body", C::Body, ROUND, (0.0, 0.0), (0.5, 0.35), (0.7, 0.5), (0.0, 0.0), false),
    slot("Head", C::Head, ROUND, (0.45, 0.25), (0.25, 0.25), (0.35, 0.35), (0.0, 0.0), false),
    slot("WingTop", C::Wing, POINTED, (-0.1, 0.3), (0.4, 0.3), (0.6, 0.45), (-20.0, 20.0), false),
    slot("WingBot", C::Wing, POINTED, (-0.1, -0.3), (0.4, 0.3), (0.6, 0.45), (160.0, 200.0), false),
    slot("Beak", C::Beak, POINTED, (0.68, 0.22), (0.15, 0.1), (0.22, 0.15), (-10.0, 10.0), false),
    slot("Eye", C::Eye, DOT, (0.54, 0.31), (0.06, 0.06), (0.09, 0.09), (0.0, 0.0), false),
    slot("Tail", C::Tail, TAIL, (-0.55, 0.0), (0.2, 0.15), (0.3, 0.25), (170.0, 190.0), true),
];

static FISH: [SlotTemplate; 5] = [
    slot("Body", C::Body, ROUND, (0.0, 0.0), (0.6, 0.35), (0.85, 0.55), (0.0, 0.0), false),
    slot("TailFin", C::Fin, POINTED, (-0.6, 0.0), (0.25, 0.3), (0.4, 0.45), (170.0, 190.0), false),
    slot("TopFin", C::Fin, POINTED, (0.05, 0.38), (0.2, 0.2), (0.3, 0.3), (-10.0, 10.0), false),
    slot("Eye", C::Eye, DOT, (0.32, 0.1), (0.07, 0.07), (0.11, 0.11), (0.0, 0.0), false),
    slot("Spot", C::Spot, ROUND, (-0.05, 0.05), (0.1, 0.1), (0.2, 0.2), (0.0, 0.0), true),
];

static SPIDER: [SlotTemplate; 10] = [
    slot("Abdomen", C::Body, ROUND, (-0.3, 0.0), (0.45, 0.4), (0.6, 0.55), (0.0, 0.0), false),
    slot("Head", C::Head, ROUND, (0.2, 0.0), (0.28, 0.28), (0.38, 0.38), (0.0, 0.0), false),
    slot("Eye1", C::Eye, DOT, (0.28, 0.1), (0.05, 0.05), (0.08, 0.08), (0.0, 0.0), false),
    slot("Eye2", C::Eye, DOT, (0.34, 0.1), (0.05, 0.05), (0.08, 0.08), (0.0, 0.0), false),
    slot("LegFL", C::Leg, LIMB, (0.15, 0.28), (0.08, 0.35), (0.1, 0.45), (-30.0, -10.0), false),
    slot("LegFR", C::Leg, LIMB, (0.15, -0.28), (0.08, 0.35), (0.1, 0.45), (10.0, 30.0), false),
    slot("LegML", C::Leg, LIMB, (-0.05, 0.3), (0.08, 0.35), (0.1, 0.45), (-20.0, 5.0), false),
    slot("LegMR", C::Leg, LIMB, (-0.05, -0.3), (0.08, 0.35), (0.1, 0.45), (-5.0, 20.0), false),
    slot("LegBL", C::Leg, LIMB, (-0.25, 0.28), (0.08, 0.35), (0.1, 0.45), (-10.0, 20.0), false),
    slot("LegBR", C::Leg, LIMB, (-0.25, -0.28), (0.08, 0.35), (0.1, 0.45), (-20.0, 10.0), false),
];

// ── Generation ────────────────────────────────────────────────────────────────

/// One realized slot, in template units.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySlotInstance {
    pub name: &'static str,
    pub category: SlotCategory,
    pub kind: ShapeKind,
    pub position: Vec2,
    pub size: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub color: Color,
    pub tier: RenderTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCreature {
    pub archetype: Archetype,
    pub seed: u64,
    pub slots: Vec<BodySlotInstance>,
}

/// Realize `archetype` from `seed`.
///
/// All randomness comes from one generator seeded here, so equal seeds give
/// equal creatures.  The base and accent colors are drawn first, then each
/// slot in declaration order: optional skip, kind, size, rotation.
pub fn generate(archetype: Archetype, seed: u64, palette: &[Color]) -> TemplateCreature {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = pick_color(palette, &mut rng);
    let accent = pick_color(palette, &mut rng);

    let mut slots = Vec::with_capacity(archetype.slots().len());
    for template in archetype.slots() {
        if template.optional && rng.gen_bool(0.5) {
            continue;
        }
        let kind = template.allowed[rng.gen_range(0..template.allowed.len())];
        let size = Vec2::new(
            lerp(template.size_min.x, template.size_max.x, rng.gen()),
            lerp(template.size_min.y, template.size_max.y, rng.gen()),
        );
        let rotation = lerp(template.rotation.0, template.rotation.1, rng.gen());
        let color = if template.category.is_accent() { accent } else { base };

        slots.push(BodySlotInstance {
            name: template.name,
            category: template.category,
            kind,
            position: template.position,
            size,
            rotation,
            color,
            tier: template.category.render_tier(),
        });
    }

    TemplateCreature {
        archetype,
        seed,
        slots,
    }
}

fn pick_color(palette: &[Color], rng: &mut StdRng) -> Color {
    if palette.is_empty() {
        return Color::WHITE;
    }
    palette[rng.gen_range(0..palette.len())]
}

fn lerp(min: f32, max: f32, t: f32) -> f32 {
    min + (max - min) * t
}

impl TemplateCreature {
    /// World-space part blueprints for a creature centred at `origin`.
    ///
    /// Template parts keep their rotation free; they ride on the creature's
    /// compound body rather than simulating on their own.
    pub fn to_parts(&self, origin: Vec2, scale: f32, role: BodyRole) -> Vec<PartBlueprint> {
        self.slots
            .iter()
            .map(|slot| PartBlueprint {
                kind: slot.kind,
                position: origin + slot.position * scale,
                rotation: slot.rotation.to_radians(),
                size: slot.size * scale,
                color: slot.color,
                role,
                z: slot.tier.z(),
                lock_rotation: false,
                slot: Some(slot.category),
            })
            .collect()
    }
}

/// Ask for one creature to be rebuilt from a new (or given) seed.
#[derive(Message, Debug, Clone, Copy)]
pub struct RegenerateCreature {
    pub creature: Entity,
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<Color> {
        vec![
            Color::srgb(0.3, 0.8, 0.3),
            Color::srgb(0.8, 0.4, 0.2),
            Color::srgb(0.2, 0.5, 0.9),
        ]
    }

    #[test]
    fn same_seed_reproduces_the_same_creature() {
        for archetype in Archetype::ALL {
            let a = generate(archetype, 1234, &palette());
            let b = generate(archetype, 1234, &palette());
            assert_eq!(a, b, "{archetype:?} must be deterministic");
        }
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = generate(Archetype::Spider, 1, &palette());
        let b = generate(Archetype::Spider, 2, &palette());
        assert_ne!(a.slots, b.slots);
    }

    #[test]
    fn realized_values_stay_inside_slot_ranges() {
        for seed in 0..50 {
            for archetype in Archetype::ALL {
                let creature = generate(archetype, seed, &palette());
                for slot in &creature.slots {
                    let template = archetype
                        .slots()
                        .iter()
                        .find(|t| t.name == slot.name)
                        .unwrap();
                    assert!(template.allowed.contains(&slot.kind));
                    assert!(slot.size.x >= template.size_min.x && slot.size.x <= template.size_max.x);
                    assert!(slot.size.y >= template.size_min.y && slot.size.y <= template.size_max.y);
                    assert!(slot.rotation >= template.rotation.0);
                    assert!(slot.rotation <= template.rotation.1);
                }
            }
        }
    }

    #[test]
    fn only_optional_slots_are_ever_skipped() {
        for seed in 0..100 {
            let creature = generate(Archetype::Bird, seed, &palette());
            let names: Vec<_> = creature.slots.iter().map(|s| s.name).collect();
            for template in Archetype::Bird.slots().iter().filter(|t| !t.optional) {
                assert!(names.contains(&template.name));
            }
            assert!(creature.slots.len() == 6 || creature.slots.len() == 7);
        }
    }

    #[test]
    fn accent_slots_share_one_color_and_body_slots_another() {
        let creature = generate(Archetype::Fish, 99, &palette());
        let accent: Vec<_> = creature
            .slots
            .iter()
            .filter(|s| s.category.is_accent())
            .map(|s| s.color)
            .collect();
        let base: Vec<_> = creature
            .slots
            .iter()
            .filter(|s| !s.category.is_accent())
            .map(|s| s.color)
            .collect();
        assert!(accent.windows(2).all(|w| w[0] == w[1]));
        assert!(base.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn draw_tiers_put_eyes_on_top_and_legs_at_the_bottom() {
        assert_eq!(SlotCategory::Eye.render_tier(), RenderTier::Top);
        assert_eq!(SlotCategory::Leg.render_tier(), RenderTier::Bottom);
        assert_eq!(SlotCategory::Fin.render_tier(), RenderTier::BehindBody);
        assert_eq!(SlotCategory::Tail.render_tier(), RenderTier::BehindBody);
        assert_eq!(SlotCategory::Head.render_tier(), RenderTier::Middle);
        assert!(RenderTier::Top.z() > RenderTier::Middle.z());
        assert!(RenderTier::Bottom.z() < RenderTier::BehindBody.z());
    }

    #[test]
    fn template_slot_counts() {
        assert_eq!(Archetype::Worm.slots().len(), 5);
        assert_eq!(Archetype::Bird.slots().len(), 7);
        assert_eq!(Archetype::Fish.slots().len(), 5);
        assert_eq!(Archetype::Spider.slots().len(), 10);
    }

    #[test]
    fn parts_are_scaled_around_origin() {
        let creature = generate(Archetype::Worm, 5, &palette());
        let parts = creature.to_parts(Vec2::new(100.0, 0.0), 60.0, BodyRole::Dynamic);
        assert_eq!(parts.len(), creature.slots.len());
        let head = &parts[3];
        assert!((head.position - Vec2::new(142.0, 3.0)).length() < 1e-3);
        assert!(parts.iter().all(|p| !p.lock_rotation));
        assert_eq!(parts[4].slot, Some(SlotCategory::Eye));
    }

    #[test]
    fn empty_palette_falls_back_to_white() {
        let creature = generate(Archetype::Worm, 1, &[]);
        assert!(creature.slots.iter().all(|s| s.color == Color::WHITE));
    }
}
