//! Three-position lever used as the drive input of a vehicle.
//!
//! A grabbing hand is turned into a swing angle, the angle into one of three
//! lever values, and the value into a snapped handle rotation:
//!
//! ```text
//! attach point ──► angle_mapper ──► discretizer ──► state_machine ──► presenter
//!                  (degrees)        {0, 0.5, 1}     (edge events)     (handle)
//! ```
//!
//! Consumers poll [`Lever::value`] once per frame. Only the activate and
//! deactivate edges are pushed, through [`LeverEvents`].

pub mod angle_mapper;
pub mod discretizer;
pub mod error;
pub mod events;
pub mod lever_types;
pub mod presenter;
pub mod state_machine;

pub use angle_mapper::LeverFrame;
pub use error::LeverError;
pub use events::LeverEvents;
pub use lever_types::{LeverConfig, LeverEvent, LeverPosition};
pub use presenter::Handle;
pub use state_machine::{GrabState, Lever};
