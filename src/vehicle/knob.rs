//! Companion rotary knob steering the vehicle

use crate::vehicle::ControlSource;
use tracing::warn;

/// Continuous rotary input in [0, 1]; 0.5 steers straight ahead
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knob {
    value: f32,
}

impl Default for Knob {
    fn default() -> Self {
        Self { value: 0.5 }
    }
}

impl Knob {
    pub fn new(value: f32) -> Self {
        let mut knob = Self::default();
        knob.set_value(value);
        knob
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Sets the knob, clamped into [0, 1]. Non-finite input is ignored.
    pub fn set_value(&mut self, value: f32) {
        if !value.is_finite() {
            warn!("Ignoring non-finite knob value {}", value);
            return;
        }
        self.value = value.clamp(0.0, 1.0);
    }
}

impl ControlSource for Knob {
    fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_unit_range() {
        assert_eq!(Knob::new(1.4).value(), 1.0);
        assert_eq!(Knob::new(-0.2).value(), 0.0);
        assert_eq!(Knob::new(f32::NAN).value(), 0.5);
    }
}
