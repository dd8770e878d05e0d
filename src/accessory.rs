//! Decorative sub-parts: eyes, wings, limbs and ornaments.
//!
//! Accessories are planned as pure [`AccessoryPlacement`]s against a host
//! part's blueprint and spawned later as children of the host entity.  Every
//! offset is drawn inside `±offset_fraction × host extents` on each axis, so an
//! accessory never drifts off its host's silhouette by more than that margin.
//!
//! Which accessories a creature may receive depends on its role: flying
//! creatures may take anything in the pool, grounded ones never take a wing.
//! Wing capability is the explicit [`AccessoryKind::Wing`] tag on the
//! descriptor, never a property of its name.

use crate::config::CreatureConfig;
use crate::creature::CreatureRole;
use crate::primitive::PartBlueprint;
use crate::shape::ShapeKind;
use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

/// Capability tag of an authored accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessoryKind {
    Wing,
    Limb,
    Ornament,
}

/// One externally authored accessory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessoryDescriptor {
    pub name: String,
    pub kind: AccessoryKind,
    pub shape: ShapeKind,
    /// Width and height as fractions of the host's rendered size.
    pub size: [f32; 2],
    /// sRGB.
    pub color: [f32; 3],
}

impl AccessoryDescriptor {
    pub fn is_wing(&self) -> bool {
        self.kind == AccessoryKind::Wing
    }
}

/// Accessories available to the generators.
#[derive(Resource, Debug, Clone, Default)]
pub struct AccessoryInventory {
    pub items: Vec<AccessoryDescriptor>,
}

impl AccessoryInventory {
    /// Whether any wing-capable accessory exists; gates the Flying role.
    pub fn has_wing(&self) -> bool {
        self.items.iter().any(AccessoryDescriptor::is_wing)
    }
}

/// What a spawned accessory is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    Eye,
    Wing,
    Limb,
    Ornament,
}

impl From<AccessoryKind> for PlacementKind {
    fn from(kind: AccessoryKind) -> Self {
        match kind {
            AccessoryKind::Wing => PlacementKind::Wing,
            AccessoryKind::Limb => PlacementKind::Limb,
            AccessoryKind::Ornament => PlacementKind::Ornament,
        }
    }
}

/// Marker on a spawned accessory entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accessory {
    pub kind: PlacementKind,
}

/// A planned accessory, relative to its host part.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessoryPlacement {
    /// Index of the host in the creature's part list.
    pub host: usize,
    pub name: String,
    pub kind: PlacementKind,
    pub shape: ShapeKind,
    /// World-unit offset from the host centre.
    pub offset: Vec2,
    /// World-unit rendered size.
    pub size: Vec2,
    pub color: Color,
    /// Depth added on top of the host so the accessory draws above it.
    pub sort_bias: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessoryParams {
    pub offset_fraction: f32,
    pub skip_chance: f64,
    pub eye_count_max: u32,
    pub eye_size_fraction: f32,
    pub eye_sort_bias: f32,
    pub accessory_sort_bias: f32,
    pub wing_attach_attempts: u32,
}

impl AccessoryParams {
    pub fn from_config(config: &CreatureConfig) -> Self {
        Self {
            offset_fraction: config.accessory_offset_fraction,
            skip_chance: config.accessory_skip_chance,
            eye_count_max: config.eye_count_max,
            eye_size_fraction: config.eye_size_fraction,
            eye_sort_bias: config.eye_sort_bias,
            accessory_sort_bias: config.accessory_sort_bias,
            wing_attach_attempts: config.wing_attach_attempts,
        }
    }
}

/// Uniform offset within `±fraction × extents` on each axis.
pub fn random_offset<R: Rng + ?Sized>(extents: Vec2, fraction: f32, rng: &mut R) -> Vec2 {
    let bound = extents * fraction;
    Vec2::new(
        bound.x * (2.0 * rng.gen::<f32>() - 1.0),
        bound.y * (2.0 * rng.gen::<f32>() - 1.0),
    )
}

/// Plan between zero and `eye_count_max - 1` eyes on one host.
pub fn plan_eyes<R: Rng + ?Sized>(
    host_index: usize,
    host: &PartBlueprint,
    params: &AccessoryParams,
    rng: &mut R,
) -> Vec<AccessoryPlacement> {
    if params.eye_count_max == 0 {
        return Vec::new();
    }
    let count = rng.gen_range(0..params.eye_count_max);
    let diameter = host.size.min_element() * params.eye_size_fraction;
    (0..count)
        .map(|i| AccessoryPlacement {
            host: host_index,
            name: format!("eye-{i}"),
            kind: PlacementKind::Eye,
            shape: ShapeKind::Circle,
            offset: random_offset(host.extents(), params.offset_fraction, rng),
            size: Vec2::splat(diameter),
            color: Color::WHITE,
            sort_bias: params.eye_sort_bias,
        })
        .collect()
}

/// Roll for one accessory from `pool`, filtered by `role`.
///
/// Skips outright with probability `skip_chance`.  Flying creatures draw from
/// the whole pool; grounded creatures only from its non-wing part.  An empty
/// filtered pool yields `None`.
pub fn pick_accessory<'a, R: Rng + ?Sized>(
    pool: &'a [AccessoryDescriptor],
    role: CreatureRole,
    skip_chance: f64,
    rng: &mut R,
) -> Option<&'a AccessoryDescriptor> {
    if rng.gen_bool(skip_chance.clamp(0.0, 1.0)) {
        return None;
    }
    let eligible: Vec<&AccessoryDescriptor> = pool
        .iter()
        .filter(|a| role == CreatureRole::Flying || !a.is_wing())
        .collect();
    if eligible.is_empty() {
        return None;
    }
    Some(eligible[rng.gen_range(0..eligible.len())])
}

/// Plan `descriptor` on a host at a random bounded offset.
pub fn place_accessory<R: Rng + ?Sized>(
    host_index: usize,
    host: &PartBlueprint,
    descriptor: &AccessoryDescriptor,
    params: &AccessoryParams,
    rng: &mut R,
) -> AccessoryPlacement {
    let [r, g, b] = descriptor.color;
    AccessoryPlacement {
        host: host_index,
        name: descriptor.name.clone(),
        kind: descriptor.kind.into(),
        shape: descriptor.shape,
        offset: random_offset(host.extents(), params.offset_fraction, rng),
        size: host.size * Vec2::from(descriptor.size),
        color: Color::srgb(r, g, b),
        sort_bias: params.accessory_sort_bias,
    }
}

/// Best-effort wing: up to `wing_attach_attempts` tries on random segments.
///
/// Returns the first successful placement, or `None` when every try found no
/// wing in the pool (or there are no parts).  A wingless flyer is valid.
pub fn attach_wing<R: Rng + ?Sized>(
    parts: &[PartBlueprint],
    pool: &[AccessoryDescriptor],
    params: &AccessoryParams,
    rng: &mut R,
) -> Option<AccessoryPlacement> {
    if parts.is_empty() {
        return None;
    }
    let wings: Vec<&AccessoryDescriptor> = pool.iter().filter(|a| a.is_wing()).collect();
    for _ in 0..params.wing_attach_attempts {
        let host = rng.gen_range(0..parts.len());
        if wings.is_empty() {
            continue;
        }
        let wing = wings[rng.gen_range(0..wings.len())];
        return Some(place_accessory(host, &parts[host], wing, params, rng));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::BodyRole;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn host(size: Vec2) -> PartBlueprint {
        PartBlueprint {
            kind: ShapeKind::Square,
            position: Vec2::ZERO,
            rotation: 0.0,
            size,
            color: Color::WHITE,
            role: BodyRole::Dynamic,
            z: 0.0,
            lock_rotation: true,
            slot: None,
        }
    }

    fn params() -> AccessoryParams {
        AccessoryParams::from_config(&CreatureConfig::default())
    }

    fn descriptor(name: &str, kind: AccessoryKind) -> AccessoryDescriptor {
        AccessoryDescriptor {
            name: name.into(),
            kind,
            shape: ShapeKind::Triangle,
            size: [0.5, 0.5],
            color: [1.0, 1.0, 1.0],
        }
    }

    #[test]
    fn offsets_stay_within_fifteen_percent_of_extents() {
        let mut rng = StdRng::seed_from_u64(11);
        let host = host(Vec2::new(40.0, 20.0));
        let pool = vec![descriptor("spot", AccessoryKind::Ornament)];
        let p = params();
        for _ in 0..500 {
            for eye in plan_eyes(0, &host, &p, &mut rng) {
                assert!(eye.offset.x.abs() <= 0.15 * 20.0 + 1e-5);
                assert!(eye.offset.y.abs() <= 0.15 * 10.0 + 1e-5);
            }
            let placed = place_accessory(0, &host, &pool[0], &p, &mut rng);
            assert!(placed.offset.x.abs() <= 0.15 * 20.0 + 1e-5);
            assert!(placed.offset.y.abs() <= 0.15 * 10.0 + 1e-5);
        }
    }

    #[test]
    fn eye_count_is_below_the_maximum() {
        let mut rng = StdRng::seed_from_u64(2);
        let host = host(Vec2::splat(32.0));
        let mut seen = [false; 4];
        for _ in 0..400 {
            let eyes = plan_eyes(0, &host, &params(), &mut rng);
            assert!(eyes.len() < 4);
            seen[eyes.len()] = true;
            assert!(eyes.iter().all(|e| e.sort_bias == params().eye_sort_bias));
        }
        assert!(seen.iter().all(|s| *s), "every count in [0,4) should occur");
    }

    #[test]
    fn grounded_creatures_never_pick_wings() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = vec![
            descriptor("wing", AccessoryKind::Wing),
            descriptor("leg", AccessoryKind::Limb),
        ];
        for _ in 0..300 {
            if let Some(a) = pick_accessory(&pool, CreatureRole::Grounded, 0.5, &mut rng) {
                assert!(!a.is_wing());
            }
        }
    }

    #[test]
    fn flying_creatures_may_pick_either_kind() {
        let mut rng = StdRng::seed_from_u64(4);
        let pool = vec![
            descriptor("wing", AccessoryKind::Wing),
            descriptor("leg", AccessoryKind::Limb),
        ];
        let picks: Vec<_> = (0..300)
            .filter_map(|_| pick_accessory(&pool, CreatureRole::Flying, 0.0, &mut rng))
            .collect();
        assert_eq!(picks.len(), 300);
        assert!(picks.iter().any(|a| a.is_wing()));
        assert!(picks.iter().any(|a| !a.is_wing()));
    }

    #[test]
    fn empty_or_fully_filtered_pool_skips() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(pick_accessory(&[], CreatureRole::Flying, 0.0, &mut rng).is_none());
        let wings_only = vec![descriptor("wing", AccessoryKind::Wing)];
        assert!(pick_accessory(&wings_only, CreatureRole::Grounded, 0.0, &mut rng).is_none());
    }

    #[test]
    fn wing_attaches_when_pool_has_one() {
        let mut rng = StdRng::seed_from_u64(6);
        let parts = vec![host(Vec2::splat(32.0)); 3];
        let pool = vec![
            descriptor("leg", AccessoryKind::Limb),
            descriptor("wing", AccessoryKind::Wing),
        ];
        let wing = attach_wing(&parts, &pool, &params(), &mut rng).expect("wing expected");
        assert_eq!(wing.kind, PlacementKind::Wing);
        assert!(wing.host < 3);
        assert_eq!(wing.size, Vec2::splat(16.0));
    }

    #[test]
    fn wing_attempts_fail_quietly_without_wings() {
        let mut rng = StdRng::seed_from_u64(7);
        let parts = vec![host(Vec2::splat(32.0)); 2];
        let pool = vec![descriptor("leg", AccessoryKind::Limb)];
        assert!(attach_wing(&parts, &pool, &params(), &mut rng).is_none());
        assert!(attach_wing(&[], &pool, &params(), &mut rng).is_none());
    }

    #[test]
    fn inventory_wing_check_uses_the_kind_tag() {
        let inventory = AccessoryInventory {
            items: vec![descriptor("wingnut", AccessoryKind::Ornament)],
        };
        assert!(!inventory.has_wing());
        let inventory = AccessoryInventory {
            items: vec![descriptor("sail", AccessoryKind::Wing)],
        };
        assert!(inventory.has_wing());
    }
}
