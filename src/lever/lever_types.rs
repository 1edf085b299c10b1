//! Shared data types for the lever
//!
//! Holds the per-session angle configuration, the typed view of the three
//! lever positions and the edge events the lever publishes.

use crate::lever::error::LeverError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest angle either limit may take, in degrees
pub const MIN_SWING_ANGLE: f32 = -90.0;
/// Largest angle either limit may take, in degrees
pub const MAX_SWING_ANGLE: f32 = 90.0;

/// Value published while the lever points backwards
pub const REVERSE_VALUE: f32 = 0.0;
/// Value published at dead center
pub const NEUTRAL_VALUE: f32 = 0.5;
/// Value published while the lever points forwards
pub const FORWARD_VALUE: f32 = 1.0;

/// Midline for the activate/deactivate edge events
pub const ON_THRESHOLD: f32 = 0.5;

/// Lower edge of the neutral band in normalized angle space
pub const NEUTRAL_BAND_START: f32 = 0.33;
/// Upper edge (exclusive) of the neutral band in normalized angle space
pub const NEUTRAL_BAND_END: f32 = 0.67;

/// Tolerance used when comparing lever values
pub const VALUE_TOLERANCE: f32 = 1e-6;

/// Returns true when two lever values are equal within [`VALUE_TOLERANCE`]
pub fn approximately(a: f32, b: f32) -> bool {
    (a - b).abs() <= VALUE_TOLERANCE
}

/// Angle limits and snapping behaviour of a lever.
///
/// `min_angle > max_angle` is allowed and describes a mirrored swing axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeverConfig {
    /// Angle of the handle in the reverse position (value 0.0)
    pub min_angle: f32,
    /// Angle of the handle in the forward position (value 1.0)
    pub max_angle: f32,
    /// Snap the handle on every programmatic value change while idle
    pub lock_to_value: bool,
}

impl Default for LeverConfig {
    fn default() -> Self {
        Self {
            min_angle: MIN_SWING_ANGLE,
            max_angle: MAX_SWING_ANGLE,
            lock_to_value: false,
        }
    }
}

impl LeverConfig {
    /// Creates a validated configuration
    pub fn new(min_angle: f32, max_angle: f32, lock_to_value: bool) -> Result<Self, LeverError> {
        let config = Self {
            min_angle,
            max_angle,
            lock_to_value,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that both limits are finite and inside the swing range
    pub fn validate(&self) -> Result<(), LeverError> {
        validate_angle("min_angle", self.min_angle)?;
        validate_angle("max_angle", self.max_angle)
    }

    /// Numerically smaller of the two limits
    pub fn lower_bound(&self) -> f32 {
        self.min_angle.min(self.max_angle)
    }

    /// Numerically larger of the two limits
    pub fn upper_bound(&self) -> f32 {
        self.min_angle.max(self.max_angle)
    }

    /// Angle halfway between the limits, used for the neutral position
    pub fn midpoint(&self) -> f32 {
        (self.min_angle + self.max_angle) / 2.0
    }

    /// True when the limits coincide and no range is left to normalize against
    pub fn is_degenerate(&self) -> bool {
        (self.max_angle - self.min_angle).abs() <= f32::EPSILON
    }

    /// True when `min_angle` lies above `max_angle`
    pub fn is_mirrored(&self) -> bool {
        self.min_angle > self.max_angle
    }

    /// Handle angle for one of the three positions
    pub fn angle_for(&self, position: LeverPosition) -> f32 {
        match position {
            LeverPosition::Reverse => self.min_angle,
            LeverPosition::Neutral => self.midpoint(),
            LeverPosition::Forward => self.max_angle,
        }
    }
}

fn validate_angle(name: &'static str, value: f32) -> Result<(), LeverError> {
    if !value.is_finite() {
        return Err(LeverError::NonFinite { name, value });
    }
    if !(MIN_SWING_ANGLE..=MAX_SWING_ANGLE).contains(&value) {
        return Err(LeverError::AngleOutOfRange {
            name,
            value,
            min: MIN_SWING_ANGLE,
            max: MAX_SWING_ANGLE,
        });
    }
    Ok(())
}

/// Clamps an angle limit into the swing range
pub fn clamp_limit(angle: f32) -> f32 {
    angle.clamp(MIN_SWING_ANGLE, MAX_SWING_ANGLE)
}

/// Typed view of the three lever magnitudes.
///
/// Consumers read the literal `f32` because they multiply against it; this
/// enum is for code that wants to match on the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeverPosition {
    Reverse,
    Neutral,
    Forward,
}

impl LeverPosition {
    /// Published magnitude for this position
    pub fn value(self) -> f32 {
        match self {
            LeverPosition::Reverse => REVERSE_VALUE,
            LeverPosition::Neutral => NEUTRAL_VALUE,
            LeverPosition::Forward => FORWARD_VALUE,
        }
    }

    /// Position for an exact lever magnitude, `None` for anything in between
    pub fn from_value(value: f32) -> Option<Self> {
        [
            LeverPosition::Reverse,
            LeverPosition::Neutral,
            LeverPosition::Forward,
        ]
        .into_iter()
        .find(|position| approximately(position.value(), value))
    }

    /// Band lookup for a normalized angle in [0, 1].
    ///
    /// Band edges resolve to the upper band.
    pub fn from_normalized(normalized: f32) -> Self {
        if normalized < NEUTRAL_BAND_START {
            LeverPosition::Reverse
        } else if normalized < NEUTRAL_BAND_END {
            LeverPosition::Neutral
        } else {
            LeverPosition::Forward
        }
    }

    /// Whether this position lies above the activation midline
    pub fn is_on(self) -> bool {
        self.value() > ON_THRESHOLD
    }
}

impl fmt::Display for LeverPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeverPosition::Reverse => write!(f, "Reverse"),
            LeverPosition::Neutral => write!(f, "Neutral"),
            LeverPosition::Forward => write!(f, "Forward"),
        }
    }
}

/// Edge notifications published when the value crosses the midline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeverEvent {
    /// Value moved from at-or-below 0.5 to above it
    Activated,
    /// Value moved from above 0.5 to at-or-below it
    Deactivated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, LeverPosition::Reverse)]
    #[case(0.329, LeverPosition::Reverse)]
    #[case(0.33, LeverPosition::Neutral)]
    #[case(0.5, LeverPosition::Neutral)]
    #[case(0.669, LeverPosition::Neutral)]
    #[case(0.67, LeverPosition::Forward)]
    #[case(1.0, LeverPosition::Forward)]
    fn bands_resolve_edges_upwards(#[case] normalized: f32, #[case] expected: LeverPosition) {
        assert_eq!(LeverPosition::from_normalized(normalized), expected);
    }

    #[test]
    fn only_forward_is_on() {
        assert!(!LeverPosition::Reverse.is_on());
        assert!(!LeverPosition::Neutral.is_on());
        assert!(LeverPosition::Forward.is_on());
    }

    #[test]
    fn from_value_rejects_intermediate_magnitudes() {
        assert_eq!(LeverPosition::from_value(0.5), Some(LeverPosition::Neutral));
        assert_eq!(LeverPosition::from_value(0.25), None);
    }

    #[test]
    fn config_rejects_angles_outside_swing_range() {
        assert!(matches!(
            LeverConfig::new(-120.0, 90.0, false),
            Err(LeverError::AngleOutOfRange { name: "min_angle", .. })
        ));
        assert!(matches!(
            LeverConfig::new(-90.0, f32::NAN, false),
            Err(LeverError::NonFinite { name: "max_angle", .. })
        ));
    }

    #[test]
    fn mirrored_config_keeps_bounds_ordered() {
        let config = LeverConfig::new(60.0, -30.0, true).unwrap();
        assert!(config.is_mirrored());
        assert_eq!(config.lower_bound(), -30.0);
        assert_eq!(config.upper_bound(), 60.0);
        assert_eq!(config.angle_for(LeverPosition::Reverse), 60.0);
        assert_eq!(config.angle_for(LeverPosition::Neutral), 15.0);
        assert_eq!(config.angle_for(LeverPosition::Forward), -30.0);
    }
}
