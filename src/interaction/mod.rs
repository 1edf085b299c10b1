//! Host side of the grab interaction
//!
//! - [`interactor`] - grabbing agents, grab events and update phases
//! - [`host`] - typestate lifecycle wrapper that gates grabs and ticks

pub mod host;
pub mod interactor;

pub use host::{Disabled, Enabled, HostState, LeverHost};
pub use interactor::{GrabEvent, Interactor, ScriptedHand, UpdatePhase};
