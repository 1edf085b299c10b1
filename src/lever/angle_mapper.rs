//! Conversion of a grab position into a signed swing angle
//!
//! The lever swings around its local X axis. A grab is measured as the
//! direction from the handle to the interactor's attach point, expressed in
//! the lever's local frame with the X component dropped, and read off as
//! `atan2(z, y)`: 0 degrees points straight up, positive angles lean towards
//! local +Z.

use glam::{Quat, Vec3};
use tracing::trace;

/// Squared length below which a grab direction carries no usable angle
pub const MIN_DIRECTION_LENGTH_SQUARED: f32 = 1e-10;

/// World placement of the lever's parent frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeverFrame {
    /// Pivot of the lever in world space
    pub position: Vec3,
    /// World rotation of the lever's local frame
    pub rotation: Quat,
}

impl Default for LeverFrame {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl LeverFrame {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Rotates a world-space direction into the lever's local frame
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }

    /// Rotates a local direction into world space
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }
}

/// Unit direction from the handle to the attach point, projected onto the
/// swing plane. `None` when the projection has no length.
pub fn look_direction(attach_point: Vec3, handle_position: Vec3, frame: &LeverFrame) -> Option<Vec3> {
    let mut direction = frame.inverse_transform_direction(attach_point - handle_position);
    direction.x = 0.0;

    if !direction.is_finite() || direction.length_squared() < MIN_DIRECTION_LENGTH_SQUARED {
        trace!("Grab direction {:?} too short to measure", direction);
        return None;
    }

    Some(direction.normalize())
}

/// Signed swing angle in degrees for a grab, or `None` for a degenerate grab
pub fn look_angle(attach_point: Vec3, handle_position: Vec3, frame: &LeverFrame) -> Option<f32> {
    look_direction(attach_point, handle_position, frame)
        .map(|direction| direction.z.atan2(direction.y).to_degrees())
}

/// Local direction of the handle tip for a given swing angle, the inverse of
/// [`look_angle`] for unit vectors in the swing plane
pub fn direction_for_angle(angle_degrees: f32) -> Vec3 {
    let radians = angle_degrees.to_radians();
    Vec3::new(0.0, radians.cos(), radians.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(45.0)]
    #[case(-80.0)]
    #[case(80.0)]
    #[case(135.0)]
    fn angle_round_trips_through_direction(#[case] angle: f32) {
        let frame = LeverFrame::default();
        let attach = direction_for_angle(angle) * 0.3;
        assert_close(look_angle(attach, Vec3::ZERO, &frame).unwrap(), angle);
    }

    #[test]
    fn lateral_offset_is_ignored() {
        let frame = LeverFrame::default();
        let attach = Vec3::new(5.0, 1.0, 1.0);
        assert_close(look_angle(attach, Vec3::ZERO, &frame).unwrap(), 45.0);
    }

    #[test]
    fn coincident_points_give_no_angle() {
        let frame = LeverFrame::default();
        let point = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(look_angle(point, point, &frame), None);
    }

    #[test]
    fn purely_lateral_grab_gives_no_angle() {
        let frame = LeverFrame::default();
        assert_eq!(look_angle(Vec3::X, Vec3::ZERO, &frame), None);
    }

    #[test]
    fn angle_is_measured_in_the_lever_frame() {
        let rotation = Quat::from_rotation_y(90f32.to_radians());
        let frame = LeverFrame::new(Vec3::new(2.0, 0.0, -1.0), rotation);
        let handle = frame.position + Vec3::Y * 0.1;
        let attach = handle + frame.transform_direction(direction_for_angle(30.0));
        assert_close(look_angle(attach, handle, &frame).unwrap(), 30.0);
    }
}
