//! Error definitions for the lever module

use thiserror::Error;

/// Errors raised when a lever is configured with values it cannot work with.
///
/// Runtime degeneracies (zero-length grab direction, equal angle limits) are
/// not errors; the state machine handles them locally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LeverError {
    /// An angle limit lies outside the allowed swing range
    #[error("{name} must lie within [{min}, {max}] degrees, got {value}")]
    AngleOutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// A value is NaN or infinite
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    /// A lever or knob value lies outside [0, 1]
    #[error("{name} must lie within [0, 1], got {value}")]
    ValueOutOfRange { name: &'static str, value: f32 },
}
