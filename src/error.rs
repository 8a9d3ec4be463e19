//! Error types.
//!
//! The per-tick controller never fails; errors only surface when validating
//! configuration at initialization and when the level flow is asked to do
//! something it can't.

/// A tunable that is out of its valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{field}` must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be finite and at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        min: f32,
        value: f32,
    },

    #[error("minimum scale {min} must be smaller than maximum scale {max}")]
    InvertedScaleBounds { min: f32, max: f32 },

    #[error("collider size must be finite and positive on both axes, got {0:?}")]
    InvalidColliderSize(bevy::math::Vec2),
}

/// Errors produced by the level flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("invalid level number: {number} (expected 1..={count})")]
    InvalidLevel { number: usize, count: usize },

    #[error("currently in a non-level scene: {0}")]
    NotALevel(String),
}
