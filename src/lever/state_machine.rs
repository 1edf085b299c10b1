//! The three-position lever component
//!
//! # State Machine
//!
//! ```text
//!            grab begin
//!   Idle ─────────────────► Grabbed ──┐
//!    ▲                         │      │ Dynamic tick:
//!    │   grab end (snap)       │      │ angle → discretize → apply
//!    └─────────────────────────┘ ◄────┘
//! ```
//!
//! While idle the value always sits on one of {0.0, 0.5, 1.0}. Every change
//! of value goes through one setter which fires the edge events and decides
//! whether the handle snaps.

use crate::interaction::interactor::{Interactor, UpdatePhase};
use crate::lever::angle_mapper::{look_angle, LeverFrame};
use crate::lever::discretizer::{discretize, quantize};
use crate::lever::error::LeverError;
use crate::lever::events::LeverEvents;
use crate::lever::lever_types::{
    approximately, clamp_limit, LeverConfig, LeverEvent, LeverPosition, NEUTRAL_VALUE,
    ON_THRESHOLD,
};
use crate::lever::presenter::{snap_handle, Handle};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Grab lifecycle of the lever
#[derive(Clone, Default)]
pub enum GrabState {
    /// Nobody holds the lever, value locked at the last discrete position
    #[default]
    Idle,
    /// An interactor holds the lever; the reference does not keep it alive
    Grabbed(Weak<dyn Interactor>),
}

impl std::fmt::Debug for GrabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrabState::Idle => write!(f, "Idle"),
            GrabState::Grabbed(interactor) => match interactor.upgrade() {
                Some(interactor) => write!(f, "Grabbed({})", interactor.name()),
                None => write!(f, "Grabbed(<dropped>)"),
            },
        }
    }
}

/// An interactable lever that snaps into reverse, neutral or forward
#[derive(Debug)]
pub struct Lever {
    config: LeverConfig,
    value: f32,
    frame: LeverFrame,
    handle: Option<Handle>,
    grab: GrabState,
    events: LeverEvents,
}

impl Lever {
    /// Creates a lever in the neutral position with the handle snapped
    pub fn new(config: LeverConfig, frame: LeverFrame, handle: Option<Handle>) -> Self {
        let mut lever = Self {
            config,
            value: NEUTRAL_VALUE,
            frame,
            handle,
            grab: GrabState::Idle,
            events: LeverEvents::new(),
        };
        lever.snap_to_discrete_position();
        info!(
            "Lever created: range [{}, {}], lock_to_value={}",
            config.min_angle, config.max_angle, config.lock_to_value
        );
        lever
    }

    /// Creates a lever seeded with `initial_value`, quantized onto the nearest
    /// position band
    pub fn with_value(
        config: LeverConfig,
        frame: LeverFrame,
        handle: Option<Handle>,
        initial_value: f32,
    ) -> Result<Self, LeverError> {
        if !initial_value.is_finite() {
            return Err(LeverError::NonFinite {
                name: "initial_value",
                value: initial_value,
            });
        }
        if !(0.0..=1.0).contains(&initial_value) {
            return Err(LeverError::ValueOutOfRange {
                name: "initial_value",
                value: initial_value,
            });
        }

        let mut lever = Self::new(config, frame, handle);
        // Seeded directly, no edge event fires.
        lever.value = quantize(initial_value);
        lever.snap_to_discrete_position();
        Ok(lever)
    }

    /// Current lever value, one of {0.0, 0.5, 1.0} while idle
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current value as a typed position
    pub fn position(&self) -> LeverPosition {
        LeverPosition::from_value(self.value)
            .unwrap_or_else(|| LeverPosition::from_normalized(self.value))
    }

    /// Programmatic control outside the grab interaction.
    ///
    /// Clamps into [0, 1], quantizes onto a lever position and always snaps
    /// the handle once idle. Non-finite input is ignored.
    pub fn set_value(&mut self, value: f32) {
        if !value.is_finite() {
            warn!("Ignoring non-finite lever value {}", value);
            return;
        }

        let clamped = value.clamp(0.0, 1.0);
        let discrete = quantize(clamped);
        if !approximately(discrete, value) {
            debug!("Lever value {} quantized to {}", value, discrete);
        }
        self.apply_value(discrete, true);
    }

    pub fn config(&self) -> &LeverConfig {
        &self.config
    }

    /// Replaces the configuration and re-snaps the handle
    pub fn reconfigure(&mut self, config: LeverConfig) -> Result<(), LeverError> {
        config.validate()?;
        self.config = config;
        info!(
            "Lever reconfigured: range [{}, {}], lock_to_value={}",
            config.min_angle, config.max_angle, config.lock_to_value
        );
        self.limits_changed();
        Ok(())
    }

    /// Sets the reverse angle, clamped into [-90, 90], and re-snaps.
    /// Non-finite input is ignored.
    pub fn set_min_angle(&mut self, angle: f32) {
        if !angle.is_finite() {
            warn!("Ignoring non-finite min_angle {}, keeping {}", angle, self.config.min_angle);
            return;
        }
        self.config.min_angle = clamp_limit(angle);
        debug!("Lever min_angle set to {}", self.config.min_angle);
        self.limits_changed();
    }

    /// Sets the forward angle, clamped into [-90, 90], and re-snaps.
    /// Non-finite input is ignored.
    pub fn set_max_angle(&mut self, angle: f32) {
        if !angle.is_finite() {
            warn!("Ignoring non-finite max_angle {}, keeping {}", angle, self.config.max_angle);
            return;
        }
        self.config.max_angle = clamp_limit(angle);
        debug!("Lever max_angle set to {}", self.config.max_angle);
        self.limits_changed();
    }

    pub fn frame(&self) -> &LeverFrame {
        &self.frame
    }

    pub fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut Handle> {
        self.handle.as_mut()
    }

    /// Binds or unbinds the visual handle; a bound handle is snapped at once
    pub fn bind_handle(&mut self, handle: Option<Handle>) {
        self.handle = handle;
        self.snap_to_discrete_position();
    }

    pub fn is_grabbed(&self) -> bool {
        matches!(self.grab, GrabState::Grabbed(_))
    }

    /// The interactor holding the lever, if it is still alive
    pub fn interactor(&self) -> Option<Arc<dyn Interactor>> {
        match &self.grab {
            GrabState::Idle => None,
            GrabState::Grabbed(interactor) => interactor.upgrade(),
        }
    }

    /// Registers a closure run on every activation
    pub fn on_activate<F>(&mut self, listener: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.events.on_activate(listener);
    }

    /// Registers a closure run on every deactivation
    pub fn on_deactivate<F>(&mut self, listener: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.events.on_deactivate(listener);
    }

    /// Receiver for all future edge events
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<LeverEvent> {
        self.events.subscribe()
    }

    /// Starts tracking an interactor. The value does not change until the
    /// next dynamic update.
    pub fn begin_grab(&mut self, interactor: &Arc<dyn Interactor>) {
        if let Some(previous) = self.interactor() {
            debug!(
                "Lever grab handed over from {} to {}",
                previous.name(),
                interactor.name()
            );
        }
        self.grab = GrabState::Grabbed(Arc::downgrade(interactor));
        info!("Lever grabbed by {}", interactor.name());
    }

    /// Releases the lever and snaps the handle to the current position.
    ///
    /// Returns `false` if the lever was not grabbed.
    pub fn end_grab(&mut self) -> bool {
        if !self.is_grabbed() {
            debug!("Lever release ignored, lever is not grabbed");
            return false;
        }

        self.snap_to_discrete_position();
        self.grab = GrabState::Idle;
        info!("Lever released at {} ({})", self.value, self.position());
        true
    }

    /// Per-frame hook. Acts only in the dynamic phase while grabbed.
    pub fn process(&mut self, phase: UpdatePhase) {
        if phase != UpdatePhase::Dynamic || !self.is_grabbed() {
            return;
        }
        self.update_value();
    }

    /// Feeds an already measured swing angle while grabbed
    pub fn track_angle(&mut self, raw_angle: f32) {
        if !self.is_grabbed() {
            debug!("Lever angle {} ignored, lever is not grabbed", raw_angle);
            return;
        }
        if !raw_angle.is_finite() {
            warn!("Lever angle {} is not finite, keeping {}", raw_angle, self.value);
            return;
        }

        let discrete = discretize(raw_angle, &self.config);
        self.apply_value(discrete, true);
    }

    fn update_value(&mut self) {
        let Some(interactor) = self.interactor() else {
            warn!("Lever interactor no longer exists, skipping update");
            return;
        };

        let pivot = self
            .handle
            .as_ref()
            .map(|handle| handle.position)
            .unwrap_or(self.frame.position);

        match look_angle(interactor.attach_position(), pivot, &self.frame) {
            Some(angle) => self.track_angle(angle),
            None => debug!(
                "Attach point of {} coincides with the handle, keeping {}",
                interactor.name(),
                self.value
            ),
        }
    }

    /// Single entry point for value changes.
    ///
    /// Equal values only re-snap when forced and fire nothing. Changes fire
    /// `Activated`/`Deactivated` when crossing the 0.5 midline and snap while
    /// idle if forced or locked.
    fn apply_value(&mut self, new_value: f32, force_snap: bool) {
        let new_value = new_value.clamp(0.0, 1.0);

        if approximately(self.value, new_value) {
            if force_snap {
                self.snap_to_discrete_position();
            }
            return;
        }

        let old_value = self.value;
        self.value = new_value;
        debug!("Lever value {} -> {}", old_value, new_value);

        let was_on = old_value > ON_THRESHOLD;
        let is_on = new_value > ON_THRESHOLD;
        if !was_on && is_on {
            info!("Lever activated");
            self.events.emit(LeverEvent::Activated);
        } else if was_on && !is_on {
            info!("Lever deactivated");
            self.events.emit(LeverEvent::Deactivated);
        }

        if !self.is_grabbed() && (self.config.lock_to_value || force_snap) {
            self.snap_to_discrete_position();
        }
    }

    fn limits_changed(&mut self) {
        if self.config.is_degenerate() {
            warn!(
                "Lever limits coincide at {} degrees, every grab resolves to neutral",
                self.config.min_angle
            );
        }
        self.snap_to_discrete_position();
    }

    fn snap_to_discrete_position(&mut self) {
        snap_handle(self.handle.as_mut(), self.value, &self.config);
    }
}
