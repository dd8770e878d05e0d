//! Runtime generation configuration loaded from `assets/creatures.toml`.
//!
//! [`CreatureConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_creature_config`] reads
//! `assets/creatures.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<CreatureConfig>` to any system parameter list and read values
//! with `config.shape_size`, `config.flying_chance`, etc.
//!
//! ## Accessory inventory
//!
//! Decorative accessories are authored in the same file as `[[accessories]]`
//! tables and copied into the [`AccessoryInventory`] resource after loading:
//!
//! ```toml
//! [[accessories]]
//! name = "feather-wing"
//! kind = "wing"
//! shape = "Triangle"
//! size = [0.9, 0.6]
//! color = [0.95, 0.95, 1.0]
//! ```

use crate::accessory::{AccessoryDescriptor, AccessoryInventory, AccessoryKind};
use crate::constants::*;
use crate::error::{
    validate_fraction_range, validate_half_open, validate_positive, validate_probability,
    GenError, GenResult,
};
use crate::generator::GenerationStrategy;
use crate::shape::ShapeKind;
use crate::template::Archetype;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable generation and gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/creatures.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    // ── Generation ────────────────────────────────────────────────────────────
    /// Fixed seed for the generation RNG; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub strategy: GenerationStrategy,
    /// Template archetype used for every template creature; `None` draws one.
    pub forced_archetype: Option<Archetype>,

    // ── Population ────────────────────────────────────────────────────────────
    pub population_count: usize,
    pub chain_len_min: usize,
    pub chain_len_max: usize,
    pub flying_chance: f64,
    pub base_points_min: u32,
    pub base_points_max: u32,
    pub anchor_first: bool,

    // ── Spawn Bands ───────────────────────────────────────────────────────────
    pub sky_band_min: f32,
    pub sky_band_max: f32,
    pub ground_band: f32,
    pub spawn_margin_fraction: f32,

    // ── Shape Primitives ──────────────────────────────────────────────────────
    pub shape_size: f32,
    pub mask_resolution: u32,
    pub part_mass: f32,
    pub part_linear_damping: f32,
    pub part_angular_damping: f32,

    // ── Springs ───────────────────────────────────────────────────────────────
    pub spring_frequency: f32,
    pub spring_damping_ratio: f32,

    // ── Accessories ───────────────────────────────────────────────────────────
    pub accessory_offset_fraction: f32,
    pub accessory_skip_chance: f64,
    pub eye_count_max: u32,
    pub eye_size_fraction: f32,
    pub eye_sort_bias: f32,
    pub accessory_sort_bias: f32,
    pub wing_attach_attempts: u32,
    pub accessories: Vec<AccessoryDescriptor>,

    // ── Templates ─────────────────────────────────────────────────────────────
    pub template_scale: f32,
    /// sRGB palette the template assembler draws base and accent colors from.
    pub palette: Vec<[f32; 3]>,

    // ── World ─────────────────────────────────────────────────────────────────
    pub background_width: f32,
    pub background_height: f32,
    pub world_bounds_enabled: bool,
    pub wall_padding: f32,
    pub wall_thickness: f32,
    pub gravity: f32,
    pub drag_enabled: bool,

    // ── Photo Scoring ─────────────────────────────────────────────────────────
    pub max_center_distance: f32,

    // ── Feature Animation ─────────────────────────────────────────────────────
    pub wing_hover_amplitude: f32,
    pub wing_hover_frequency: f32,
    pub flap_interval: f32,
    pub flap_pause: f32,
    pub flaps_per_burst: u32,
    pub leg_bounce_speed: f32,
    pub leg_bounce_amount: f32,
    pub leg_squish_amount: f32,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            // Generation
            seed: None,
            strategy: GenerationStrategy::default(),
            forced_archetype: None,
            // Population
            population_count: POPULATION_COUNT,
            chain_len_min: CHAIN_LEN_MIN,
            chain_len_max: CHAIN_LEN_MAX,
            flying_chance: FLYING_CHANCE,
            base_points_min: BASE_POINTS_MIN,
            base_points_max: BASE_POINTS_MAX,
            anchor_first: false,
            // Spawn Bands
            sky_band_min: SKY_BAND_MIN,
            sky_band_max: SKY_BAND_MAX,
            ground_band: GROUND_BAND,
            spawn_margin_fraction: SPAWN_MARGIN_FRACTION,
            // Shape Primitives
            shape_size: SHAPE_SIZE,
            mask_resolution: MASK_RESOLUTION,
            part_mass: PART_MASS,
            part_linear_damping: PART_LINEAR_DAMPING,
            part_angular_damping: PART_ANGULAR_DAMPING,
            // Springs
            spring_frequency: SPRING_FREQUENCY,
            spring_damping_ratio: SPRING_DAMPING_RATIO,
            // Accessories
            accessory_offset_fraction: ACCESSORY_OFFSET_FRACTION,
            accessory_skip_chance: ACCESSORY_SKIP_CHANCE,
            eye_count_max: EYE_COUNT_MAX,
            eye_size_fraction: EYE_SIZE_FRACTION,
            eye_sort_bias: EYE_SORT_BIAS,
            accessory_sort_bias: ACCESSORY_SORT_BIAS,
            wing_attach_attempts: WING_ATTACH_ATTEMPTS,
            accessories: default_accessories(),
            // Templates
            template_scale: TEMPLATE_SCALE,
            palette: vec![
                [0.3, 0.8, 0.3],
                [0.8, 0.4, 0.2],
                [0.2, 0.5, 0.9],
                [0.9, 0.8, 0.2],
                [0.7, 0.3, 0.8],
            ],
            // World
            background_width: BACKGROUND_WIDTH,
            background_height: BACKGROUND_HEIGHT,
            world_bounds_enabled: true,
            wall_padding: WALL_PADDING,
            wall_thickness: WALL_THICKNESS,
            gravity: GRAVITY,
            drag_enabled: true,
            // Photo Scoring
            max_center_distance: MAX_CENTER_DISTANCE,
            // Feature Animation
            wing_hover_amplitude: WING_HOVER_AMPLITUDE,
            wing_hover_frequency: WING_HOVER_FREQUENCY,
            flap_interval: FLAP_INTERVAL,
            flap_pause: FLAP_PAUSE,
            flaps_per_burst: FLAPS_PER_BURST,
            leg_bounce_speed: LEG_BOUNCE_SPEED,
            leg_bounce_amount: LEG_BOUNCE_AMOUNT,
            leg_squish_amount: LEG_SQUISH_AMOUNT,
        }
    }
}

/// Built-in accessory set used when the config file does not list any.
fn default_accessories() -> Vec<AccessoryDescriptor> {
    vec![
        AccessoryDescriptor {
            name: "membrane-wing".into(),
            kind: AccessoryKind::Wing,
            shape: ShapeKind::Triangle,
            size: [1.1, 0.7],
            color: [0.92, 0.95, 1.0],
        },
        AccessoryDescriptor {
            name: "stub-leg".into(),
            kind: AccessoryKind::Limb,
            shape: ShapeKind::Square,
            size: [0.2, 0.7],
            color: [0.25, 0.2, 0.15],
        },
        AccessoryDescriptor {
            name: "antenna".into(),
            kind: AccessoryKind::Ornament,
            shape: ShapeKind::Square,
            size: [0.1, 0.8],
            color: [0.15, 0.15, 0.15],
        },
        AccessoryDescriptor {
            name: "spot".into(),
            kind: AccessoryKind::Ornament,
            shape: ShapeKind::Circle,
            size: [0.35, 0.35],
            color: [1.0, 1.0, 1.0],
        },
    ]
}

impl CreatureConfig {
    /// Check every value generation depends on; the first violation is returned.
    pub fn validate(&self) -> GenResult<()> {
        validate_half_open("chain_len", self.chain_len_min, self.chain_len_max)?;
        if self.chain_len_min == 0 {
            return Err(GenError::InvalidConfig {
                field: "chain_len_min",
                reason: "a chain needs at least one part".into(),
            });
        }
        validate_half_open("base_points", self.base_points_min, self.base_points_max)?;
        validate_probability("flying_chance", self.flying_chance)?;
        validate_probability("accessory_skip_chance", self.accessory_skip_chance)?;
        validate_fraction_range("sky_band", self.sky_band_min, self.sky_band_max)?;
        validate_fraction_range("ground_band", self.ground_band, self.ground_band)?;
        validate_fraction_range(
            "accessory_offset_fraction",
            0.0,
            self.accessory_offset_fraction,
        )?;
        validate_fraction_range("spawn_margin_fraction", 0.0, self.spawn_margin_fraction)?;
        validate_positive("shape_size", self.shape_size)?;
        validate_positive("template_scale", self.template_scale)?;
        validate_positive("background_width", self.background_width)?;
        validate_positive("background_height", self.background_height)?;
        validate_positive("spring_frequency", self.spring_frequency)?;
        validate_positive("max_center_distance", self.max_center_distance)?;
        if self.mask_resolution < 2 {
            return Err(GenError::InvalidConfig {
                field: "mask_resolution",
                reason: format!("need at least 2 pixels per side, got {}", self.mask_resolution),
            });
        }
        if self.palette.is_empty() {
            return Err(GenError::InvalidConfig {
                field: "palette",
                reason: "palette must hold at least one color".into(),
            });
        }
        Ok(())
    }

    /// Template palette converted to Bevy colors.
    pub fn palette_colors(&self) -> Vec<Color> {
        self.palette
            .iter()
            .map(|[r, g, b]| Color::srgb(*r, *g, *b))
            .collect()
    }

    /// Axis-aligned play area centred on the origin.
    pub fn background_rect(&self) -> Rect {
        Rect::from_center_size(
            Vec2::ZERO,
            Vec2::new(self.background_width, self.background_height),
        )
    }
}

/// Parse a TOML document into a validated config.
pub fn parse_creature_config(path: &str, contents: &str) -> GenResult<CreatureConfig> {
    let config = toml::from_str::<CreatureConfig>(contents).map_err(|e| GenError::ConfigParse {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Environment variable that pins [`CreatureConfig::seed`] at startup.
pub const SEED_ENV_VAR: &str = "SHUTTERBUG_SEED";

/// Parse the value of [`SEED_ENV_VAR`]; surrounding whitespace is ignored.
pub fn parse_seed_override(raw: &str) -> GenResult<u64> {
    raw.trim().parse::<u64>().map_err(|e| GenError::InvalidConfig {
        field: SEED_ENV_VAR,
        reason: format!("expected an unsigned integer, got {raw:?} ({e})"),
    })
}

/// Startup system: attempt to load `assets/creatures.toml` and overwrite the
/// `CreatureConfig` resource with any values present in the file, then publish
/// the accessory inventory.
///
/// Missing keys retain their compiled defaults.  Parse or validation errors are
/// logged but do not abort the game.  A missing file is silently ignored
/// (defaults are already in place from `insert_resource`).
pub fn load_creature_config(
    mut config: ResMut<CreatureConfig>,
    mut inventory: ResMut<AccessoryInventory>,
) {
    let path = "assets/creatures.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_creature_config(path, &contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("✓ Loaded creature config from {path}");
            }
            Err(e) => {
                error!("⚠ {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present; defaults are already in place.
            info!("ℹ No {path} found; using compiled defaults");
        }
    }
    inventory.items = config.accessories.clone();
    info!(
        "[SETUP] Accessory inventory: {} items ({} wing-capable)",
        inventory.items.len(),
        inventory.items.iter().filter(|a| a.is_wing()).count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_override_accepts_integers_only() {
        assert_eq!(parse_seed_override("42"), Ok(42));
        assert_eq!(parse_seed_override(" 7\n"), Ok(7));
        let err = parse_seed_override("abc").unwrap_err();
        assert!(err.to_string().contains(SEED_ENV_VAR));
        assert!(parse_seed_override("-1").is_err());
    }

    #[test]
    fn defaults_are_valid() {
        assert!(CreatureConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = parse_creature_config("test.toml", "population_count = 3\nseed = 42\n")
            .expect("partial config should parse");
        assert_eq!(config.population_count, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.chain_len_max, CHAIN_LEN_MAX);
        assert_eq!(config.shape_size, SHAPE_SIZE);
    }

    #[test]
    fn accessory_tables_parse_with_explicit_kind() {
        let toml = r#"
            [[accessories]]
            name = "feather"
            kind = "wing"
            shape = "Triangle"
            size = [1.0, 0.5]
            color = [1.0, 1.0, 1.0]

            [[accessories]]
            name = "wingnut-bolt"
            kind = "ornament"
            shape = "Square"
            size = [0.2, 0.2]
            color = [0.5, 0.5, 0.5]
        "#;
        let config = parse_creature_config("test.toml", toml).unwrap();
        assert_eq!(config.accessories.len(), 2);
        assert!(config.accessories[0].is_wing());
        // Capability comes from the kind field, never from the name.
        assert!(!config.accessories[1].is_wing());
    }

    #[test]
    fn strategy_and_archetype_parse() {
        let config = parse_creature_config(
            "test.toml",
            "strategy = \"Template\"\nforced_archetype = \"Spider\"\n",
        )
        .unwrap();
        assert_eq!(config.strategy, GenerationStrategy::Template);
        assert_eq!(config.forced_archetype, Some(Archetype::Spider));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_creature_config("bad.toml", "population_count = \"lots\"").unwrap_err();
        assert!(matches!(err, GenError::ConfigParse { .. }));
    }

    #[test]
    fn empty_chain_range_is_rejected() {
        let err = parse_creature_config("bad.toml", "chain_len_min = 4\nchain_len_max = 4\n")
            .unwrap_err();
        assert!(matches!(
            err,
            GenError::InvalidConfig {
                field: "chain_len",
                ..
            }
        ));
    }

    #[test]
    fn empty_palette_is_rejected() {
        let mut config = CreatureConfig::default();
        config.palette.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn background_rect_is_centred() {
        let config = CreatureConfig::default();
        let rect = config.background_rect();
        assert_eq!(rect.center(), Vec2::ZERO);
        assert_eq!(rect.width(), BACKGROUND_WIDTH);
        assert_eq!(rect.height(), BACKGROUND_HEIGHT);
    }
}
