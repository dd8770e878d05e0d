//! Generation-specific error types.
//!
//! Creature generation itself never fails: empty pools skip, zero-sized
//! populations are no-ops and failed wing placements leave a creature wingless.
//! What *can* go wrong is configuration: a missing collaborator (background,
//! camera) or a config file whose values make no sense.  Those are reported once
//! through these types and disable the dependent behaviour instead of panicking.
//!
//! ## Usage
//!
//! ```rust
//! use shutterbug::error::{validate_fraction_range, GenResult};
//!
//! fn check(min: f32, max: f32) -> GenResult<()> {
//!     validate_fraction_range("sky_band", min, max)?;
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Top-level error enum for creature generation and its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum GenError {
    /// A collaborator the game needs is not present in the world.
    MissingCollaborator {
        /// What is missing (e.g. "background").
        name: &'static str,
        /// The behaviour that stays disabled until it appears.
        disables: &'static str,
    },

    /// A configuration value is outside the range generation can work with.
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// The configuration file exists but could not be parsed.
    ConfigParse {
        /// Path of the file that failed to parse.
        path: String,
        /// Parser message.
        message: String,
    },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::MissingCollaborator { name, disables } => {
                write!(f, "no {} found; {} is disabled", name, disables)
            }
            GenError::InvalidConfig { field, reason } => {
                write!(f, "invalid config value '{}': {}", field, reason)
            }
            GenError::ConfigParse { path, message } => {
                write!(f, "failed to parse {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for GenError {}

/// Convenience alias: a `Result` using `GenError` as the error type.
pub type GenResult<T> = Result<T, GenError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `0 ≤ min ≤ max ≤ 1`.
pub fn validate_fraction_range(field: &'static str, min: f32, max: f32) -> GenResult<()> {
    if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
        Err(GenError::InvalidConfig {
            field,
            reason: format!("expected 0 ≤ min ≤ max ≤ 1, got [{min}, {max}]"),
        })
    } else {
        Ok(())
    }
}

/// Returns an error unless `p` is a probability.
pub fn validate_probability(field: &'static str, p: f64) -> GenResult<()> {
    if !(0.0..=1.0).contains(&p) {
        Err(GenError::InvalidConfig {
            field,
            reason: format!("probability must lie in [0, 1], got {p}"),
        })
    } else {
        Ok(())
    }
}

/// Returns an error unless the half-open range `[min, max)` is non-empty.
pub fn validate_half_open<T: PartialOrd + fmt::Display>(
    field: &'static str,
    min: T,
    max: T,
) -> GenResult<()> {
    if min < max {
        Ok(())
    } else {
        Err(GenError::InvalidConfig {
            field,
            reason: format!("range [{min}, {max}) is empty"),
        })
    }
}

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(field: &'static str, value: f32) -> GenResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(GenError::InvalidConfig {
            field,
            reason: format!("must be > 0, got {value}"),
        })
    }
}
