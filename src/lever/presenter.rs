//! Visual side of the lever: rotating the bound handle to a discrete angle

use crate::lever::lever_types::{LeverConfig, LeverPosition};
use glam::{Quat, Vec3};
use tracing::trace;

/// The object that is visually grabbed and rotated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// World position of the handle, the origin of grab measurements
    pub position: Vec3,
    /// Rotation relative to the lever frame
    pub local_rotation: Quat,
    /// Swing angle currently rendered, in degrees
    pub swing_angle: f32,
}

impl Handle {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            local_rotation: Quat::IDENTITY,
            swing_angle: 0.0,
        }
    }

    /// Sets the rotation around the swing axis, other axes zeroed
    pub fn set_swing_angle(&mut self, angle_degrees: f32) {
        self.swing_angle = angle_degrees;
        self.local_rotation = Quat::from_rotation_x(angle_degrees.to_radians());
    }
}

/// Handle angle for a lever value.
///
/// Values between the three positions fall back to the band lookup, treating
/// the value as a normalized angle.
pub fn target_angle(value: f32, config: &LeverConfig) -> f32 {
    let position =
        LeverPosition::from_value(value).unwrap_or_else(|| LeverPosition::from_normalized(value));
    config.angle_for(position)
}

/// Rotates the handle to match `value`, no-op without a handle.
///
/// Returns the angle applied.
pub fn snap_handle(handle: Option<&mut Handle>, value: f32, config: &LeverConfig) -> Option<f32> {
    let handle = handle?;
    let angle = target_angle(value, config);
    handle.set_swing_angle(angle);
    trace!("Handle snapped to {} degrees", angle);
    Some(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, -90.0)]
    #[case(0.5, 0.0)]
    #[case(1.0, 90.0)]
    fn full_range_targets(#[case] value: f32, #[case] expected: f32) {
        let config = LeverConfig::default();
        assert_eq!(target_angle(value, &config), expected);
    }

    #[test]
    fn snap_rotates_only_around_swing_axis() {
        let config = LeverConfig::new(-60.0, 30.0, false).unwrap();
        let mut handle = Handle::new(Vec3::ZERO);

        assert_eq!(snap_handle(Some(&mut handle), 1.0, &config), Some(30.0));
        assert_eq!(handle.swing_angle, 30.0);

        let (axis, angle) = handle.local_rotation.to_axis_angle();
        assert!((axis - Vec3::X).length() < 1e-5);
        assert!((angle.to_degrees() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn snap_without_handle_is_a_no_op() {
        assert_eq!(snap_handle(None, 1.0, &LeverConfig::default()), None);
    }
}
