//! Centralised generation and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant is mirrored by a field of [`crate::config::CreatureConfig`], so
//! `assets/creatures.toml` can override any of them without recompiling.  The
//! values here remain the authoritative defaults.

// ── Population ────────────────────────────────────────────────────────────────

/// Number of creatures spawned by a populate call that does not name a count.
pub const POPULATION_COUNT: usize = 6;

/// Smallest chain length drawn for a free-form creature (inclusive).
pub const CHAIN_LEN_MIN: usize = 1;

/// Largest chain length drawn for a free-form creature (exclusive).
pub const CHAIN_LEN_MAX: usize = 6;

/// Probability that a creature becomes `Flying` when the inventory holds a wing.
pub const FLYING_CHANCE: f64 = 0.5;

/// Inclusive lower bound of the per-creature photo score.
pub const BASE_POINTS_MIN: u32 = 50;

/// Exclusive upper bound of the per-creature photo score.
pub const BASE_POINTS_MAX: u32 = 200;

// ── Spawn Bands ───────────────────────────────────────────────────────────────

/// Lower edge of the sky band, as a fraction of background height from the bottom.
pub const SKY_BAND_MIN: f32 = 0.55;

/// Upper edge of the sky band.
pub const SKY_BAND_MAX: f32 = 0.9;

/// Height of grounded spawns, as a fraction of background height from the bottom.
///
/// Raising this lifts grounded creatures off the terrain strip; at 0.0 they
/// spawn intersecting the bottom wall.
pub const GROUND_BAND: f32 = 0.12;

/// Horizontal margin kept clear on each side of the background (fraction of width).
pub const SPAWN_MARGIN_FRACTION: f32 = 0.05;

// ── Shape Primitives ──────────────────────────────────────────────────────────

/// Half-size of a chain primitive (world units).
///
/// A primitive is rendered `2 × SHAPE_SIZE` wide, and chain spacing is
/// `2 × SHAPE_SIZE`, so neighbouring links just touch at rest.
pub const SHAPE_SIZE: f32 = 16.0;

/// Resolution (pixels per side) of the rasterized shape masks.
pub const MASK_RESOLUTION: u32 = 64;

/// Collider mass of each standalone primitive.
pub const PART_MASS: f32 = 1.0;

/// Linear damping applied to every primitive body.
pub const PART_LINEAR_DAMPING: f32 = 0.5;

/// Angular damping applied to every primitive body.
pub const PART_ANGULAR_DAMPING: f32 = 0.5;

// ── Springs ───────────────────────────────────────────────────────────────────

/// Natural frequency (Hz) of the spring linking two chain parts.
///
/// 100 Hz makes the chain nearly rigid; values below ~5 Hz let links sag
/// visibly under gravity.
pub const SPRING_FREQUENCY: f32 = 100.0;

/// Damping ratio of chain springs. 1.0 is critical damping (no overshoot).
pub const SPRING_DAMPING_RATIO: f32 = 1.0;

// ── Accessories ───────────────────────────────────────────────────────────────

/// Accessory offsets stay within this fraction of the host extents, per axis.
pub const ACCESSORY_OFFSET_FRACTION: f32 = 0.15;

/// Probability that a generic accessory roll attaches nothing.
pub const ACCESSORY_SKIP_CHANCE: f64 = 0.5;

/// Exclusive upper bound of the eye count drawn per eligible host.
pub const EYE_COUNT_MAX: u32 = 4;

/// Eye diameter as a fraction of the host's smaller dimension.
pub const EYE_SIZE_FRACTION: f32 = 0.3;

/// Z bias that puts eyes above their host and above generic accessories.
pub const EYE_SORT_BIAS: f32 = 0.2;

/// Z bias that puts generic accessories above their host.
pub const ACCESSORY_SORT_BIAS: f32 = 0.1;

/// Attempts made to place a wing on a flying creature before giving up.
pub const WING_ATTACH_ATTEMPTS: u32 = 6;

// ── Templates ─────────────────────────────────────────────────────────────────

/// World units per template unit; template slot layouts are authored around ±1.
pub const TEMPLATE_SCALE: f32 = 60.0;

// ── World ─────────────────────────────────────────────────────────────────────

/// Width of the background / play area (world units).
pub const BACKGROUND_WIDTH: f32 = 1600.0;

/// Height of the background / play area (world units).
pub const BACKGROUND_HEIGHT: f32 = 900.0;

/// Gap between the background edge and the inner face of each boundary wall.
pub const WALL_PADDING: f32 = 10.0;

/// Thickness of each boundary wall.
pub const WALL_THICKNESS: f32 = 50.0;

/// Vertical gravity (world units / s²). Negative pulls down.
pub const GRAVITY: f32 = -300.0;

// ── Photo Scoring ─────────────────────────────────────────────────────────────

/// Normalized viewport distance at which a photo's quality reaches zero.
pub const MAX_CENTER_DISTANCE: f32 = 0.35;

// ── Feature Animation ─────────────────────────────────────────────────────────

/// Peak vertical hover speed of a winged part (world units / s).
pub const WING_HOVER_AMPLITUDE: f32 = 24.0;

/// Hover oscillation frequency (rad / s).
pub const WING_HOVER_FREQUENCY: f32 = 1.5;

/// Seconds between wing flap toggles.
pub const FLAP_INTERVAL: f32 = 0.1;

/// Seconds a wing rests after a burst of flaps.
pub const FLAP_PAUSE: f32 = 0.5;

/// Flap toggles per burst.
pub const FLAPS_PER_BURST: u32 = 6;

/// Leg bob speed (rad / s).
pub const LEG_BOUNCE_SPEED: f32 = 3.0;

/// Leg bob height, as a fraction of the leg's own height.
pub const LEG_BOUNCE_AMOUNT: f32 = 0.1;

/// Leg squish, as a fraction of the leg's own height.
pub const LEG_SQUISH_AMOUNT: f32 = 0.05;
