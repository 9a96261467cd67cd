//! Configuration errors
//!
//! Runtime paths never fail (placement exhaustion and missing targets are
//! logged and skipped). Only loading and validating settings can error.

use thiserror::Error;

/// Invalid or unparseable configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Layout has no lanes
    #[error("lane_positions must contain at least one lane")]
    NoLanes,

    /// Coin clusters need at least one coin
    #[error("coins_per_cluster must be at least 1")]
    ZeroCoinsPerCluster,

    /// Field must be strictly positive
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Offending field name
        field: &'static str,
        /// Value supplied
        value: f32,
    },

    /// Field must not be negative
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Offending field name
        field: &'static str,
        /// Value supplied
        value: f32,
    },

    /// Track has nothing to spawn
    #[error("at least one layout variant is required")]
    NoLayoutVariants,

    /// Layout variants disagree on lane placement
    #[error("all layout variants must share the same lane positions and offset")]
    LaneMismatch,

    /// Obstacle type with an empty or inverted vertical band
    #[error("obstacle type '{name}' has top {top} below bottom {bottom}")]
    InvertedObstacle {
        name: String,
        bottom: f32,
        top: f32,
    },

    /// JSON could not be parsed
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fail with `NonPositive` unless `value > 0`
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Fail with `Negative` unless `value >= 0`
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
