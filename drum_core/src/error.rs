//! Validation errors raised while building a kit.

use thiserror::Error;

/// Rejected zone layout or detector tuning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A kit needs at least one zone.
    #[error("zone map is empty")]
    NoZones,

    /// Two zones share a name.
    #[error("duplicate zone name `{0}`")]
    DuplicateZone(String),

    /// Zone names are also sound file stems.
    #[error("invalid zone name `{0}` (use letters, digits, `-` or `_`)")]
    InvalidZoneName(String),

    /// Radius must be a positive, finite number of pixels.
    #[error("zone `{name}` has invalid radius {radius}")]
    InvalidRadius { name: String, radius: f32 },

    /// Threshold must be finite and non-negative.
    #[error("invalid velocity threshold {0}")]
    InvalidThreshold(f32),

    /// Normalizer must be finite and strictly positive.
    #[error("invalid velocity normalizer {0}")]
    InvalidNormalizer(f32),
}
