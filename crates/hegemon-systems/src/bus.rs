//! Publish/subscribe channel between systems and reactive listeners.
//!
//! Systems [`publish`](EventBus::publish) typed events while a tick runs. Each
//! event is recorded in publication order and dispatched immediately to the
//! handlers subscribed to its [`EventKind`], then to wildcard handlers. A
//! failing or panicking handler is logged and skipped: it never interrupts
//! the publishing system or the handlers after it.
//!
//! The engine [`drain`](EventBus::drain)s the recorded events at the end of
//! the tick and appends them to the snapshot's event history.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use hegemon_types::{EventKind, SimulationEvent};

/// A subscriber callback.
pub type EventHandler = Box<dyn FnMut(&SimulationEvent) -> anyhow::Result<()>>;

/// Ordered event buffer with isolated subscriber dispatch.
#[derive(Default)]
pub struct EventBus {
    /// Events published since the last drain, in publication order.
    pending: Vec<SimulationEvent>,
    /// Handlers keyed by the event kind they listen to.
    subscribers: BTreeMap<EventKind, Vec<EventHandler>>,
    /// Handlers that receive every event.
    wildcard: Vec<EventHandler>,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.pending.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus {
    /// Create an empty bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of event.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&SimulationEvent) -> anyhow::Result<()> + 'static,
    {
        self.subscribers
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
    }

    /// Register a handler for every event.
    pub fn subscribe_all<F>(&mut self, handler: F)
    where
        F: FnMut(&SimulationEvent) -> anyhow::Result<()> + 'static,
    {
        self.wildcard.push(Box::new(handler));
    }

    /// Total number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        let keyed: usize = self.subscribers.values().map(Vec::len).sum();
        keyed.saturating_add(self.wildcard.len())
    }

    /// Record an event and dispatch it to its subscribers.
    pub fn publish(&mut self, event: SimulationEvent) {
        let kind = event.kind();
        if let Some(handlers) = self.subscribers.get_mut(&kind) {
            for handler in handlers.iter_mut() {
                dispatch(handler, &event);
            }
        }
        for handler in &mut self.wildcard {
            dispatch(handler, &event);
        }
        self.pending.push(event);
    }

    /// Events published since the last drain.
    pub fn pending(&self) -> &[SimulationEvent] {
        &self.pending
    }

    /// Take every pending event, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Invoke one handler, logging instead of propagating any failure.
fn dispatch(handler: &mut EventHandler, event: &SimulationEvent) {
    match catch_unwind(AssertUnwindSafe(|| handler(event))) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::warn!(
                event_kind = ?event.kind(),
                tick = event.tick(),
                error = %err,
                "event handler failed"
            );
        }
        Err(_) => {
            tracing::warn!(
                event_kind = ?event.kind(),
                tick = event.tick(),
                "event handler panicked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use hegemon_types::NodeId;

    use super::*;

    fn death(tick: u64) -> SimulationEvent {
        SimulationEvent::EntityDeath {
            tick,
            entity_id: NodeId::from("C001"),
            wealth: 0.0,
            consumption_needs: 1.0,
        }
    }

    fn eviction(tick: u64) -> SimulationEvent {
        SimulationEvent::Eviction {
            tick,
            territory_id: NodeId::from("T001"),
            heat: 0.9,
        }
    }

    #[test]
    fn drain_returns_events_in_publication_order() {
        let mut bus = EventBus::new();
        bus.publish(death(1));
        bus.publish(eviction(1));
        let drained = bus.drain();
        let kinds: Vec<EventKind> = drained.iter().map(SimulationEvent::kind).collect();
        assert_eq!(kinds, vec![EventKind::EntityDeath, EventKind::Eviction]);
        assert!(bus.pending().is_empty());
    }

    #[test]
    fn subscribers_only_see_their_kind() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::Eviction, move |event| {
            sink.borrow_mut().push(event.tick());
            Ok(())
        });
        bus.publish(death(1));
        bus.publish(eviction(2));
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn failing_and_panicking_handlers_are_isolated() {
        let count = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&count);
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::EntityDeath, |_| anyhow::bail!("listener offline"));
        #[allow(clippy::panic)]
        bus.subscribe(EventKind::EntityDeath, |_| panic!("listener crashed"));
        bus.subscribe_all(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        bus.publish(death(3));
        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.pending().len(), 1);
        assert_eq!(bus.subscriber_count(), 3);
    }
}
