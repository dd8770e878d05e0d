//! Primitive shape kinds, their collider geometry, and mask rasterization.
//!
//! Every creature part is one of three closed [`ShapeKind`]s.  A kind fixes two
//! things that must always agree:
//!
//! | Kind       | Collider (local units)                          | Raster mask            |
//! |------------|-------------------------------------------------|------------------------|
//! | `Circle`   | ball, radius 0.5                                | disc, pixel-centre test |
//! | `Square`   | cuboid, half-extents 0.5                        | fully opaque           |
//! | `Triangle` | (-0.5,-0.433), (0.5,-0.433), (0, 0.433)         | sign-consistency test  |
//!
//! Entity transforms scale the unit geometry to world size, so the collider and
//! the sprite are scaled by the same factor.
//!
//! Masks are pure data ([`ShapeMask`]); [`MaskCache`] memoizes them per
//! `(kind, resolution)` so each pair rasterizes at most once per process.

use bevy::prelude::*;
use bevy_rapier2d::prelude::Collider;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;

/// Triangle collider vertices in local space (apex up, unit base).
pub const TRIANGLE_VERTICES: [Vec2; 3] = [
    Vec2::new(-0.5, -0.433),
    Vec2::new(0.5, -0.433),
    Vec2::new(0.0, 0.433),
];

/// The three primitive shapes a creature part can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
}

/// Collider geometry in local (unit) space, independent of Rapier types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec2 },
    Triangle([Vec2; 3]),
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Triangle];

    /// Uniformly random kind.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn geometry(self) -> ShapeGeometry {
        match self {
            ShapeKind::Circle => ShapeGeometry::Ball { radius: 0.5 },
            ShapeKind::Square => ShapeGeometry::Cuboid {
                half_extents: Vec2::splat(0.5),
            },
            ShapeKind::Triangle => ShapeGeometry::Triangle(TRIANGLE_VERTICES),
        }
    }

    /// Rapier collider matching [`Self::geometry`] exactly.
    pub fn collider(self) -> Collider {
        match self.geometry() {
            ShapeGeometry::Ball { radius } => Collider::ball(radius),
            ShapeGeometry::Cuboid { half_extents } => {
                Collider::cuboid(half_extents.x, half_extents.y)
            }
            ShapeGeometry::Triangle([a, b, c]) => Collider::triangle(a, b, c),
        }
    }

    /// Whether a point in local (unit) space lies on the shape.
    ///
    /// Used for pointer hit-testing so a click only grabs a part when it lands
    /// on the collider, not merely inside its bounding square.
    pub fn contains_local(self, p: Vec2) -> bool {
        match self.geometry() {
            ShapeGeometry::Ball { radius } => p.length_squared() <= radius * radius,
            ShapeGeometry::Cuboid { half_extents } => {
                p.x.abs() <= half_extents.x && p.y.abs() <= half_extents.y
            }
            ShapeGeometry::Triangle([a, b, c]) => point_in_triangle(p, a, b, c),
        }
    }
}

// ── Rasterization ─────────────────────────────────────────────────────────────

/// Square occupancy mask, row 0 at the bottom (y up, like world space).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMask {
    resolution: u32,
    pixels: Vec<bool>,
}

impl ShapeMask {
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Occupancy at `(x, y)`; out-of-range coordinates are outside.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.resolution || y >= self.resolution {
            return false;
        }
        self.pixels[(y * self.resolution + x) as usize]
    }

    pub fn filled(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// White-on-transparent RGBA8 bytes, rows top-to-bottom as GPU images expect.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let res = self.resolution;
        let mut data = Vec::with_capacity((res * res * 4) as usize);
        for row in 0..res {
            let y = res - 1 - row;
            for x in 0..res {
                let alpha = if self.get(x, y) { 255 } else { 0 };
                data.extend_from_slice(&[255, 255, 255, alpha]);
            }
        }
        data
    }
}

/// Rasterize `kind` into a `resolution × resolution` occupancy mask.
pub fn rasterize(kind: ShapeKind, resolution: u32) -> ShapeMask {
    let res = resolution;
    let mut pixels = vec![false; (res * res) as usize];

    match kind {
        ShapeKind::Square => pixels.fill(true),
        ShapeKind::Circle => {
            let center = res as f32 / 2.0;
            let radius = center - 1.0;
            for y in 0..res {
                for x in 0..res {
                    let dx = x as f32 - center + 0.5;
                    let dy = y as f32 - center + 0.5;
                    pixels[(y * res + x) as usize] = dx * dx + dy * dy <= radius * radius;
                }
            }
        }
        ShapeKind::Triangle => {
            let a = Vec2::new(0.0, 0.0);
            let b = Vec2::new(res as f32 - 1.0, 0.0);
            let c = Vec2::new(res as f32 / 2.0, res as f32 - 1.0);
            for y in 0..res {
                for x in 0..res {
                    let p = Vec2::new(x as f32, y as f32);
                    pixels[(y * res + x) as usize] = point_in_triangle(p, a, b, c);
                }
            }
        }
    }

    ShapeMask {
        resolution: res,
        pixels,
    }
}

/// Inside test: `p` is inside unless the three edge signs disagree.
/// Points on an edge count as inside.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

fn sign(p1: Vec2, p2: Vec2, p3: Vec2) -> f32 {
    (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
}

// ── Cache ─────────────────────────────────────────────────────────────────────

/// Lazily populated, never invalidated mask cache.
#[derive(Resource, Debug, Default)]
pub struct MaskCache {
    masks: HashMap<(ShapeKind, u32), ShapeMask>,
    rasterizations: usize,
}

impl MaskCache {
    /// Cached mask for `(kind, resolution)`, rasterizing on first request.
    pub fn get_or_rasterize(&mut self, kind: ShapeKind, resolution: u32) -> &ShapeMask {
        let rasterizations = &mut self.rasterizations;
        self.masks.entry((kind, resolution)).or_insert_with(|| {
            *rasterizations += 1;
            rasterize(kind, resolution)
        })
    }

    /// How many masks have actually been rasterized so far.
    pub fn rasterizations(&self) -> usize {
        self.rasterizations
    }
}
