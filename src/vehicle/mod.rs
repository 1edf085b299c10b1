//! Consumers that turn lever and knob values into motion
//!
//! Consumers never hold on to the inputs. The frame loop reads every
//! [`ControlSource`] once per frame and hands the values over in
//! [`DriveInputs`], which keeps consumer update order irrelevant.

pub mod car;
pub mod environment;
pub mod knob;

pub use car::{CarController, CarSettings};
pub use environment::{EnvironmentController, EnvironmentSettings};
pub use knob::Knob;

use crate::lever::Lever;
use glam::{Quat, Vec3};

/// Anything that publishes a polled control value
pub trait ControlSource {
    fn value(&self) -> f32;
}

impl ControlSource for Lever {
    fn value(&self) -> f32 {
        Lever::value(self)
    }
}

/// Snapshot of the control values for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveInputs {
    /// Lever value: 0.0 reverse, 0.5 stop, 1.0 forward
    pub lever: f32,
    /// Knob value in [0, 1], 0.5 is straight ahead
    pub knob: f32,
}

impl DriveInputs {
    /// Polls both sources
    pub fn poll(lever: &dyn ControlSource, knob: &dyn ControlSource) -> Self {
        Self {
            lever: lever.value(),
            knob: knob.value(),
        }
    }
}

/// World placement of a moving object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Local +Z in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Heading around world Y in degrees
    pub fn yaw_degrees(&self) -> f32 {
        let forward = self.forward();
        forward.x.atan2(forward.z).to_degrees()
    }
}

/// A per-frame motion consumer
pub trait MotionController: Send {
    /// Applies one frame of motion
    fn update(&mut self, inputs: DriveInputs, delta_seconds: f32);

    /// Pose after the last update
    fn pose(&self) -> &Pose;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Unclamped linear interpolation
pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
