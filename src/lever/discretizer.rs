//! Quantization of a continuous lever angle into the three lever positions
//!
//! Order matters: the raw angle is clamped into the configured range first,
//! then normalized so that the numerically smaller limit maps to 0 and the
//! larger one to 1, then looked up in the three bands. The neutral band [0.33, 0.67) is wider than a
//! half split so that a hand resting near the middle cannot flip the lever
//! straight from reverse to forward.

use crate::lever::lever_types::{LeverConfig, LeverPosition};
use tracing::{debug, warn};

/// Clamps a raw angle into `[lower_bound, upper_bound]` of the config
pub fn clamp_angle(raw_angle: f32, config: &LeverConfig) -> f32 {
    raw_angle.clamp(config.lower_bound(), config.upper_bound())
}

/// Normalizes an angle against the configured limits.
///
/// The smaller limit is the 0-end whichever field holds it, so a mirrored
/// axis yields the same value for the same angle. Returns `None` when both
/// limits coincide.
pub fn normalize(angle: f32, config: &LeverConfig) -> Option<f32> {
    if config.is_degenerate() {
        return None;
    }

    let lower = config.lower_bound();
    let span = config.upper_bound() - lower;
    Some(((angle - lower) / span).clamp(0.0, 1.0))
}

/// Maps a normalized angle onto one of the three lever values
pub fn quantize(normalized: f32) -> f32 {
    LeverPosition::from_normalized(normalized).value()
}

/// Resolves a raw angle to a lever position
pub fn discretize_position(raw_angle: f32, config: &LeverConfig) -> LeverPosition {
    if !raw_angle.is_finite() {
        warn!("Discarding non-finite lever angle {}, using neutral", raw_angle);
        return LeverPosition::Neutral;
    }

    let clamped = clamp_angle(raw_angle, config);
    match normalize(clamped, config) {
        Some(normalized) => LeverPosition::from_normalized(normalized),
        None => {
            debug!(
                "Lever limits coincide at {} degrees, resolving to neutral",
                config.min_angle
            );
            LeverPosition::Neutral
        }
    }
}

/// Resolves a raw angle to one of {0.0, 0.5, 1.0}
pub fn discretize(raw_angle: f32, config: &LeverConfig) -> f32 {
    discretize_position(raw_angle, config).value()
}
