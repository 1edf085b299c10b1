//! Environment scroll: the world moves past a stationary rig
//!
//! Unlike the car, the lever value is used as a plain speed factor, so the
//! neutral position still scrolls at half speed.

use crate::vehicle::{lerp, DriveInputs, MotionController, Pose};
use glam::Vec3;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSettings {
    /// World units per second along Z at lever 1.0
    pub forward_speed: f32,
    /// World units per second along X at lever 1.0 and full knob deflection
    pub side_speed: f32,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            forward_speed: 3.0,
            side_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvironmentController {
    settings: EnvironmentSettings,
    pose: Pose,
}

impl EnvironmentController {
    pub fn new(settings: EnvironmentSettings, pose: Pose) -> Self {
        Self { settings, pose }
    }

    pub fn settings(&self) -> &EnvironmentSettings {
        &self.settings
    }

    /// World-space velocity for one set of inputs
    pub fn velocity(&self, inputs: DriveInputs) -> Vec3 {
        let forward_velocity = -self.settings.forward_speed * inputs.lever;
        let side_velocity = self.settings.side_speed * inputs.lever * lerp(1.0, -1.0, inputs.knob);
        Vec3::new(side_velocity, 0.0, forward_velocity)
    }
}

impl MotionController for EnvironmentController {
    fn update(&mut self, inputs: DriveInputs, delta_seconds: f32) {
        let velocity = self.velocity(inputs);
        self.pose.position += velocity * delta_seconds;
        trace!("Environment update: velocity={:?}", velocity);
    }

    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn name(&self) -> &str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment() -> EnvironmentController {
        EnvironmentController::new(EnvironmentSettings::default(), Pose::default())
    }

    #[test]
    fn reverse_lever_stops_the_world() {
        let mut environment = environment();
        environment.update(DriveInputs { lever: 0.0, knob: 0.0 }, 1.0);
        assert_eq!(environment.pose().position, Vec3::ZERO);
    }

    #[test]
    fn neutral_lever_scrolls_at_half_speed() {
        let environment = environment();
        let velocity = environment.velocity(DriveInputs { lever: 0.5, knob: 0.5 });
        assert_eq!(velocity, Vec3::new(0.0, 0.0, -1.5));
    }

    #[test]
    fn knob_slides_sideways() {
        let mut environment = environment();
        environment.update(DriveInputs { lever: 1.0, knob: 0.0 }, 2.0);
        assert_eq!(environment.pose().position, Vec3::new(2.0, 0.0, -6.0));
    }
}
