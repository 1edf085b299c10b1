//! Fan-out of the lever's activate/deactivate edge events
//!
//! Listeners come in two flavours: closures registered per event, and channel
//! subscribers that receive every [`LeverEvent`]. Sending never blocks, so the
//! frame loop stays free of suspension points.

use crate::lever::lever_types::LeverEvent;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

type Listener = Box<dyn FnMut() + Send + 'static>;

/// Observer list for lever edge events
#[derive(Default)]
pub struct LeverEvents {
    on_activate: Vec<Listener>,
    on_deactivate: Vec<Listener>,
    subscribers: Vec<mpsc::UnboundedSender<LeverEvent>>,
}

impl fmt::Debug for LeverEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeverEvents")
            .field("on_activate", &self.on_activate.len())
            .field("on_deactivate", &self.on_deactivate.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl LeverEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a closure run every time the lever activates
    pub fn on_activate<F>(&mut self, listener: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_activate.push(Box::new(listener));
    }

    /// Registers a closure run every time the lever deactivates
    pub fn on_deactivate<F>(&mut self, listener: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_deactivate.push(Box::new(listener));
    }

    /// Returns a receiver for all future edge events
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<LeverEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.push(sender);
        debug!("New lever event subscriber ({} total)", self.subscribers.len());
        receiver
    }

    /// Number of registered listeners and live subscribers
    pub fn listener_count(&self) -> usize {
        self.on_activate.len() + self.on_deactivate.len() + self.subscribers.len()
    }

    /// Delivers an event to every listener of its kind and to all subscribers
    pub fn emit(&mut self, event: LeverEvent) {
        let listeners = match event {
            LeverEvent::Activated => &mut self.on_activate,
            LeverEvent::Deactivated => &mut self.on_deactivate,
        };
        for listener in listeners.iter_mut() {
            listener();
        }

        // Dropped receivers are pruned on the way.
        self.subscribers.retain(|sender| match sender.send(event) {
            Ok(()) => true,
            Err(_) => {
                debug!("Lever event subscriber went away, removing it");
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn closures_only_see_their_event() {
        let activations = Arc::new(AtomicUsize::new(0));
        let deactivations = Arc::new(AtomicUsize::new(0));
        let mut events = LeverEvents::new();

        let counter = activations.clone();
        events.on_activate(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = deactivations.clone();
        events.on_deactivate(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        events.emit(LeverEvent::Activated);
        events.emit(LeverEvent::Activated);
        events.emit(LeverEvent::Deactivated);

        assert_eq!(activations.load(Ordering::SeqCst), 2);
        assert_eq!(deactivations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let mut events = LeverEvents::new();
        let mut receiver = events.subscribe();

        events.emit(LeverEvent::Activated);
        events.emit(LeverEvent::Deactivated);

        assert_eq!(receiver.try_recv(), Ok(LeverEvent::Activated));
        assert_eq!(receiver.try_recv(), Ok(LeverEvent::Deactivated));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut events = LeverEvents::new();
        let receiver = events.subscribe();
        assert_eq!(events.listener_count(), 1);

        drop(receiver);
        events.emit(LeverEvent::Activated);
        assert_eq!(events.listener_count(), 0);
    }
}
