//! Three-position drive lever for hand-tracked vehicle control.
//!
//! - [`lever`] - the lever component: angle mapping, quantization, edge events
//! - [`interaction`] - grabbing agents and the lifecycle host
//! - [`vehicle`] - knob and the motion consumers polling both inputs
//! - [`simulation`] - frame loop tying everything together
//! - [`config`] - TOML configuration

pub mod config;
pub mod interaction;
pub mod lever;
pub mod simulation;
pub mod vehicle;
