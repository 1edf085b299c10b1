//! Frame loop driving the lever host and the motion consumer
//!
//! One frame runs every [`UpdatePhase`] in order. The lever acts during
//! `Dynamic`, after scripted hand moves were applied; the consumer polls the
//! lever and knob during `Late` so it always sees this frame's value.
//!
//! ```text
//! HandScript ──► ScriptedHand ──► LeverHost ──► Lever::value ──┐
//!                                                Knob::value ──┴─► MotionController
//! ```

use crate::config::{AppConfig, VehicleMode};
use crate::interaction::{Enabled, Interactor, LeverHost, ScriptedHand, UpdatePhase};
use crate::lever::angle_mapper::direction_for_angle;
use crate::lever::{Handle, Lever, LeverError, LeverFrame, LeverPosition};
use crate::vehicle::{
    lerp, CarController, DriveInputs, EnvironmentController, Knob, MotionController, Pose,
};
use glam::Vec3;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info};

/// Distance of the scripted hand from the handle
pub const HAND_REACH: f32 = 0.25;

/// One step of a scripted hand performance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptStep {
    /// Take hold of the lever
    Grab,
    /// Move the hand to a swing angle over a number of frames
    Sweep { to: f32, frames: u32 },
    /// Keep the hand where it is
    Hold { frames: u32 },
    /// Let go of the lever
    Release,
    /// Turn the knob
    SetKnob(f32),
}

/// What the script asks for within one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandCommand {
    Grab,
    Release,
    MoveTo(f32),
    SetKnob(f32),
}

/// Plays a list of [`ScriptStep`]s back frame by frame
#[derive(Debug, Clone)]
pub struct HandScript {
    steps: VecDeque<ScriptStep>,
    hand_angle: f32,
    sweep_start: f32,
    elapsed: u32,
}

impl HandScript {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>, start_angle: f32) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            hand_angle: start_angle,
            sweep_start: start_angle,
            elapsed: 0,
        }
    }

    /// Grab, push forward, release, steer, pull back to reverse, release
    pub fn demo() -> Self {
        Self::new(
            [
                ScriptStep::Hold { frames: 18 },
                ScriptStep::Grab,
                ScriptStep::Sweep { to: 80.0, frames: 36 },
                ScriptStep::Hold { frames: 18 },
                ScriptStep::Release,
                ScriptStep::Hold { frames: 72 },
                ScriptStep::SetKnob(0.8),
                ScriptStep::Hold { frames: 72 },
                ScriptStep::Grab,
                ScriptStep::Sweep { to: -80.0, frames: 48 },
                ScriptStep::Release,
                ScriptStep::SetKnob(0.5),
            ],
            0.0,
        )
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Current swing angle of the hand
    pub fn hand_angle(&self) -> f32 {
        self.hand_angle
    }

    /// Commands for the next frame. Instant steps run until a step that
    /// takes time consumes the frame.
    pub fn next_frame(&mut self) -> Vec<HandCommand> {
        let mut commands = Vec::new();

        while let Some(step) = self.steps.front().copied() {
            match step {
                ScriptStep::Grab => commands.push(HandCommand::Grab),
                ScriptStep::Release => commands.push(HandCommand::Release),
                ScriptStep::SetKnob(value) => commands.push(HandCommand::SetKnob(value)),
                ScriptStep::Hold { frames } => {
                    self.elapsed += 1;
                    if self.elapsed >= frames {
                        self.finish_step();
                    }
                    return commands;
                }
                ScriptStep::Sweep { to, frames } => {
                    if self.elapsed == 0 {
                        self.sweep_start = self.hand_angle;
                    }
                    self.elapsed += 1;
                    let t = (self.elapsed as f32 / frames.max(1) as f32).min(1.0);
                    self.hand_angle = lerp(self.sweep_start, to, t);
                    commands.push(HandCommand::MoveTo(self.hand_angle));
                    if self.elapsed >= frames {
                        self.finish_step();
                    }
                    return commands;
                }
            }
            self.finish_step();
        }

        commands
    }

    fn finish_step(&mut self) {
        self.steps.pop_front();
        self.elapsed = 0;
    }
}

/// State published after each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub lever_value: f32,
    pub lever_position: LeverPosition,
    pub grabbed: bool,
    pub knob_value: f32,
    pub pose: Pose,
}

/// Lever, knob and consumer wired into one frame loop
pub struct Simulation {
    host: LeverHost<Enabled>,
    knob: Knob,
    controller: Box<dyn MotionController>,
    hand: Arc<ScriptedHand>,
    script: HandScript,
    delta_seconds: f32,
    frame: u64,
}

impl Simulation {
    /// Builds the scene described by `config`
    pub fn new(config: &AppConfig, script: HandScript) -> Result<Self, LeverError> {
        let lever_config = config.lever.lever_config()?;
        let frame = LeverFrame::default();
        let handle = Handle::new(frame.position + Vec3::Y * 0.1);
        let lever = Lever::with_value(lever_config, frame, Some(handle), config.lever.initial_value)?;
        let host = LeverHost::create("drive lever", lever).on_activate();

        let controller: Box<dyn MotionController> = match config.vehicle.mode {
            VehicleMode::Car => Box::new(CarController::new(
                config.vehicle.car_settings(),
                Pose::default(),
            )),
            VehicleMode::Environment => Box::new(EnvironmentController::new(
                config.vehicle.environment_settings(),
                Pose::default(),
            )),
        };
        info!("Simulation driving the {} consumer", controller.name());

        let mut simulation = Self {
            host,
            knob: Knob::new(config.vehicle.knob_value),
            controller,
            hand: Arc::new(ScriptedHand::new("scripted hand", Vec3::ZERO)),
            script,
            delta_seconds: config.simulation.delta_seconds(),
            frame: 0,
        };
        simulation.move_hand(simulation.script.hand_angle());
        Ok(simulation)
    }

    pub fn lever(&self) -> &Lever {
        self.host.lever()
    }

    pub fn lever_mut(&mut self) -> &mut Lever {
        self.host.lever_mut()
    }

    pub fn knob(&self) -> &Knob {
        &self.knob
    }

    pub fn controller(&self) -> &dyn MotionController {
        self.controller.as_ref()
    }

    pub fn script(&self) -> &HandScript {
        &self.script
    }

    /// Runs one frame
    pub fn step(&mut self) -> FrameReport {
        for command in self.script.next_frame() {
            self.apply(command);
        }

        for phase in UpdatePhase::ORDER {
            self.host.process(phase);
            if phase == UpdatePhase::Late {
                let inputs = DriveInputs::poll(self.host.lever(), &self.knob);
                self.controller.update(inputs, self.delta_seconds);
            }
        }

        self.frame += 1;
        let report = FrameReport {
            frame: self.frame,
            lever_value: self.host.lever().value(),
            lever_position: self.host.lever().position(),
            grabbed: self.host.lever().is_grabbed(),
            knob_value: self.knob.value(),
            pose: *self.controller.pose(),
        };
        debug!("Frame {}: {:?}", report.frame, report);
        report
    }

    /// Runs `frames` frames and collects their reports
    pub fn run(&mut self, frames: u32) -> Vec<FrameReport> {
        (0..frames).map(|_| self.step()).collect()
    }

    /// Detaches the lever host, releasing any active grab
    pub fn shutdown(self) -> Lever {
        info!("Shutting down simulation after {} frames", self.frame);
        self.host.on_deactivate().into_lever()
    }

    fn apply(&mut self, command: HandCommand) {
        match command {
            HandCommand::Grab => {
                let interactor: Arc<dyn Interactor> = self.hand.clone();
                self.host.grab(&interactor);
            }
            HandCommand::Release => self.host.release(),
            HandCommand::MoveTo(angle) => self.move_hand(angle),
            HandCommand::SetKnob(value) => {
                info!("Knob turned to {}", value);
                self.knob.set_value(value);
            }
        }
    }

    fn move_hand(&self, angle: f32) {
        let lever = self.host.lever();
        let origin = lever
            .handle()
            .map(|handle| handle.position)
            .unwrap_or(lever.frame().position);
        let direction = lever.frame().transform_direction(direction_for_angle(angle));
        self.hand.move_to(origin + direction * HAND_REACH);
    }
}
