//! Car-style drive: the lever sets signed speed, the knob steers
//!
//! The lever is read around its neutral center: 0.5 stops, 1.0 drives at
//! full speed one way, 0.0 the other. Steering scales with throttle so the
//! car cannot turn on the spot.

use crate::vehicle::{lerp, DriveInputs, MotionController, Pose};
use glam::Quat;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarSettings {
    /// World units per second at full throttle
    pub forward_speed: f32,
    /// Degrees per second at full throttle and full knob deflection
    pub turn_speed: f32,
}

impl Default for CarSettings {
    fn default() -> Self {
        Self {
            forward_speed: 3.0,
            turn_speed: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CarController {
    settings: CarSettings,
    pose: Pose,
}

impl CarController {
    pub fn new(settings: CarSettings, pose: Pose) -> Self {
        Self { settings, pose }
    }

    pub fn settings(&self) -> &CarSettings {
        &self.settings
    }

    /// Throttle ratio in [0, 1], distance of the lever from neutral
    pub fn throttle(lever: f32) -> f32 {
        (lever - 0.5).abs() * 2.0
    }

    /// Signed velocity along the car's forward axis
    pub fn forward_velocity(&self, lever: f32) -> f32 {
        -self.settings.forward_speed * (lever - 0.5) * 2.0
    }

    /// Knob mapped to -1 (right) ..= 1 (left)
    pub fn turn_input(knob: f32) -> f32 {
        lerp(-1.0, 1.0, knob)
    }
}

impl MotionController for CarController {
    fn update(&mut self, inputs: DriveInputs, delta_seconds: f32) {
        let throttle = Self::throttle(inputs.lever);
        let forward_velocity = self.forward_velocity(inputs.lever);
        let yaw_delta =
            self.settings.turn_speed * Self::turn_input(inputs.knob) * throttle * delta_seconds;

        // Yaw around the local Y axis, then move along the new heading.
        self.pose.rotation = self.pose.rotation * Quat::from_rotation_y(yaw_delta.to_radians());
        self.pose.position += self.pose.forward() * forward_velocity * delta_seconds;

        trace!(
            "Car update: throttle={} velocity={} yaw_delta={}",
            throttle,
            forward_velocity,
            yaw_delta
        );
    }

    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn name(&self) -> &str {
        "car"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rstest::rstest;

    fn default_car() -> CarController {
        CarController::new(CarSettings::default(), Pose::default())
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.5, 0.0)]
    #[case(1.0, 1.0)]
    fn throttle_is_distance_from_neutral(#[case] lever: f32, #[case] expected: f32) {
        assert_eq!(CarController::throttle(lever), expected);
    }

    #[test]
    fn neutral_lever_holds_still() {
        let mut car = default_car();
        car.update(DriveInputs { lever: 0.5, knob: 1.0 }, 1.0);
        assert_eq!(*car.pose(), Pose::default());
    }

    #[test]
    fn forward_lever_drives_along_negative_forward() {
        let mut car = default_car();
        car.update(DriveInputs { lever: 1.0, knob: 0.5 }, 0.5);
        assert!((car.pose().position - Vec3::new(0.0, 0.0, -1.5)).length() < 1e-5);
    }

    #[test]
    fn reverse_lever_drives_the_other_way() {
        let mut car = default_car();
        car.update(DriveInputs { lever: 0.0, knob: 0.5 }, 1.0);
        assert!((car.pose().position - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn knob_turns_proportionally_to_throttle() {
        let mut car = default_car();
        car.update(DriveInputs { lever: 1.0, knob: 1.0 }, 1.0);
        assert!((car.pose().yaw_degrees() - 20.0).abs() < 1e-3);

        let mut car = default_car();
        car.update(DriveInputs { lever: 0.5, knob: 0.0 }, 1.0);
        assert!(car.pose().yaw_degrees().abs() < 1e-6);
    }
}
