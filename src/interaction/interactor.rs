//! Grabbing agents and the events they produce

use glam::Vec3;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Something that can grab the lever: a tracked hand or a controller.
///
/// The lever only needs to know where the agent holds it.
pub trait Interactor: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// World position of the point the agent holds the lever by
    fn attach_position(&self) -> Vec3;
}

/// Grab lifecycle events delivered to the lever host
#[derive(Clone)]
pub enum GrabEvent {
    /// An interactor started holding the lever
    Begin(Arc<dyn Interactor>),
    /// The current interactor let go
    End,
}

impl fmt::Debug for GrabEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrabEvent::Begin(interactor) => write!(f, "Begin({})", interactor.name()),
            GrabEvent::End => write!(f, "End"),
        }
    }
}

/// Update phases of one frame, in the order the frame loop runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdatePhase {
    /// Physics step
    Fixed,
    /// After transforms and physics moved the interactors
    Dynamic,
    /// After all dynamic updates
    Late,
    /// Right before the frame is drawn
    OnBeforeRender,
}

impl UpdatePhase {
    /// All phases in frame order
    pub const ORDER: [UpdatePhase; 4] = [
        UpdatePhase::Fixed,
        UpdatePhase::Dynamic,
        UpdatePhase::Late,
        UpdatePhase::OnBeforeRender,
    ];
}

/// Interactor whose attach point is moved by code, used by the demo loop
/// and by tests
#[derive(Debug)]
pub struct ScriptedHand {
    name: String,
    attach_position: RwLock<Vec3>,
}

impl ScriptedHand {
    pub fn new(name: impl Into<String>, attach_position: Vec3) -> Self {
        Self {
            name: name.into(),
            attach_position: RwLock::new(attach_position),
        }
    }

    /// Moves the attach point
    pub fn move_to(&self, position: Vec3) {
        *self.attach_position.write() = position;
    }
}

impl Interactor for ScriptedHand {
    fn name(&self) -> &str {
        &self.name
    }

    fn attach_position(&self) -> Vec3 {
        *self.attach_position.read()
    }
}
