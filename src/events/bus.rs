//! Publish/subscribe channel for store events
//!
//! The bus lives on the primary execution context and is deliberately not
//! `Send`: worker threads cannot publish on it. Background work reports back
//! through the orchestrator's completion queue, which is drained on the
//! primary context and republished here.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, error, warn};

use super::event::StoreEvent;
use crate::error::PlannerResult;

/// A registered event handler
pub type Subscriber = Box<dyn FnMut(&StoreEvent) -> PlannerResult<()>>;

/// Cheaply clonable handle to a shared event bus
///
/// Delivery is synchronous and in registration order. A subscriber that
/// returns an error or panics is logged and skipped; the remaining
/// subscribers still see the event. Events published from inside a
/// subscriber are queued and delivered once the current event is done.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    subscribers: RefCell<Vec<Subscriber>>,
    incoming: RefCell<Vec<Subscriber>>,
    pending: RefCell<VecDeque<StoreEvent>>,
    delivering: Cell<bool>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every future event
    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: FnMut(&StoreEvent) -> PlannerResult<()> + 'static,
    {
        let boxed: Subscriber = Box::new(subscriber);
        match self.inner.subscribers.try_borrow_mut() {
            Ok(mut subscribers) => subscribers.push(boxed),
            // Registered from inside a delivery; picked up before the next event
            Err(_) => self.inner.incoming.borrow_mut().push(boxed),
        }
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.try_borrow().map(|s| s.len()).unwrap_or(0)
            + self.inner.incoming.borrow().len()
    }

    /// Deliver `event` to every subscriber before returning
    pub fn publish(&self, event: StoreEvent) {
        self.inner.pending.borrow_mut().push_back(event);

        if self.inner.delivering.replace(true) {
            return;
        }

        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            match next {
                Some(event) => self.deliver(&event),
                None => break,
            }
        }

        self.inner.delivering.set(false);
    }

    fn deliver(&self, event: &StoreEvent) {
        {
            let mut incoming = self.inner.incoming.borrow_mut();
            if !incoming.is_empty() {
                self.inner.subscribers.borrow_mut().append(&mut incoming);
            }
        }

        debug!(event = ?event, "Publishing event");

        let mut subscribers = self.inner.subscribers.borrow_mut();
        for (index, subscriber) in subscribers.iter_mut().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| subscriber(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(subscriber = index, error = %e, "Event subscriber failed");
                }
                Err(_) => {
                    error!(subscriber = index, "Event subscriber panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use crate::events::ChangeKind;
    use crate::models::DocumentKind;

    fn changed(kind: DocumentKind) -> StoreEvent {
        StoreEvent::DocumentChanged {
            kind,
            change: ChangeKind::Committed,
        }
    }

    #[test]
    fn test_delivers_in_registration_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |_| {
                log.borrow_mut().push(name);
                Ok(())
            });
        }

        bus.publish(changed(DocumentKind::AddressBook));
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
        assert_eq!(bus.subscriber_count(), 3);
    }

    #[test]
    fn test_failing_and_panicking_subscribers_are_isolated() {
        let bus = EventBus::new();
        let seen = Rc::new(Cell::new(0));

        bus.subscribe(|_| Err(PlannerError::Io("disk full".into())));
        bus.subscribe(|_| -> PlannerResult<()> { panic!("subscriber bug") });
        let counter = Rc::clone(&seen);
        bus.subscribe(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        bus.publish(changed(DocumentKind::AddressBook));
        bus.publish(changed(DocumentKind::ExpenseBook));

        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_nested_publish_is_delivered_after_current_event() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let republisher = bus.clone();
        bus.subscribe(move |event| {
            if event.kind() == Some(DocumentKind::AddressBook) {
                republisher.publish(changed(DocumentKind::ExpenseBook));
            }
            Ok(())
        });
        let sink = Rc::clone(&log);
        bus.subscribe(move |event| {
            sink.borrow_mut().push(event.kind());
            Ok(())
        });

        bus.publish(changed(DocumentKind::AddressBook));

        assert_eq!(
            *log.borrow(),
            vec![Some(DocumentKind::AddressBook), Some(DocumentKind::ExpenseBook)]
        );
    }

    #[test]
    fn test_subscribe_during_delivery_sees_next_event() {
        let bus = EventBus::new();
        let late_count = Rc::new(Cell::new(0));

        let registrar = bus.clone();
        let counter = Rc::clone(&late_count);
        let mut registered = false;
        bus.subscribe(move |_| {
            if !registered {
                registered = true;
                let counter = Rc::clone(&counter);
                registrar.subscribe(move |_| {
                    counter.set(counter.get() + 1);
                    Ok(())
                });
            }
            Ok(())
        });

        bus.publish(changed(DocumentKind::AddressBook));
        assert_eq!(late_count.get(), 0);

        bus.publish(changed(DocumentKind::AddressBook));
        assert_eq!(late_count.get(), 1);
    }
}
