//! Lifecycle host for the lever with statum state machine
//!
//! Decouples the lever from any particular engine's component model. Whoever
//! owns the update loop creates a host, activates it, forwards grab events
//! and calls [`LeverHost::process`] once per update phase.
//!
//! # State Machine
//!
//! ```text
//! Disabled ──on_activate──► Enabled ──on_deactivate──► Disabled
//! ```
//!
//! Grab events only exist on `Enabled`; a disabled lever cannot be grabbed
//! by construction.

use crate::interaction::interactor::{GrabEvent, Interactor, UpdatePhase};
use crate::lever::Lever;
use statum::{machine, state};
use std::sync::Arc;
use tracing::{debug, info};

/// States of the lever host
#[state]
#[derive(Debug, Clone)]
pub enum HostState {
    Disabled, // Not receiving grab events
    Enabled,  // Listening for grabs and processing ticks
}

/// Owns a lever and gates its inputs by lifecycle state
#[machine]
pub struct LeverHost<S: HostState> {
    name: String,
    lever: Lever,
}

impl<S: HostState> LeverHost<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read access for consumers polling the value
    pub fn lever(&self) -> &Lever {
        &self.lever
    }

    /// Mutable access for configuration and listener registration
    pub fn lever_mut(&mut self) -> &mut Lever {
        &mut self.lever
    }

    /// Gives the lever back, consuming the host
    pub fn into_lever(self) -> Lever {
        self.lever
    }
}

impl LeverHost<Disabled> {
    pub fn create(name: impl Into<String>, lever: Lever) -> Self {
        let name = name.into();
        info!("Creating lever host: {}", name);
        Self::new(name, lever)
    }

    /// Starts listening for grab events
    pub fn on_activate(self) -> LeverHost<Enabled> {
        info!("Activating lever host: {}", self.name);
        self.transition()
    }
}

impl LeverHost<Enabled> {
    /// Forwards a grab event to the lever
    pub fn handle_grab(&mut self, event: GrabEvent) {
        debug!("Lever host {} received {:?}", self.name, event);
        match event {
            GrabEvent::Begin(interactor) => self.lever.begin_grab(&interactor),
            GrabEvent::End => {
                self.lever.end_grab();
            }
        }
    }

    /// Shorthand for a grab-begin event
    pub fn grab(&mut self, interactor: &Arc<dyn Interactor>) {
        self.handle_grab(GrabEvent::Begin(Arc::clone(interactor)));
    }

    /// Shorthand for a grab-end event
    pub fn release(&mut self) {
        self.handle_grab(GrabEvent::End);
    }

    /// Per-phase update hook
    pub fn process(&mut self, phase: UpdatePhase) {
        self.lever.process(phase);
    }

    /// Stops listening for grab events. An active grab is released first so
    /// the handle ends up snapped and no interactor reference survives.
    pub fn on_deactivate(mut self) -> LeverHost<Disabled> {
        info!("Deactivating lever host: {}", self.name);
        if self.lever.is_grabbed() {
            debug!("Releasing active grab before deactivation");
            self.lever.end_grab();
        }
        self.transition()
    }
}
