//! Synchronous publish/subscribe dispatcher.
//!
//! The [`EventBus`] is the only channel through which the storefront stores and
//! their rendering collaborators talk to each other. Renderers emit interaction
//! topics (`cart:remove`, `address:edit`, ...), stores handle them, mutate their
//! state and emit derived topics (`cart:changed`, `validation:address`, ...).
//!
//! # Dispatch Model
//!
//! ```text
//! emit("a") ─► handler 1 ─► emit("b") ─► handler b1
//!                                    └─► handler b2
//!           ─► handler 2
//! ```
//!
//! - **Exact match**: topics are free-form strings, no hierarchy, no wildcards
//! - **Registration order**: handlers for one topic run in the order they subscribed
//! - **Synchronous**: `emit` returns after every handler has run
//! - **Re-entrant, depth-first**: a nested `emit` completes before the outer loop resumes
//! - **Isolated faults**: a handler returning an error or panicking is logged and
//!   skipped; its siblings and the emitter are unaffected
//!
//! The handler list is snapshotted when `emit` starts. A handler subscribed during
//! dispatch sees the next emit of that topic, not the current one. A handler
//! unsubscribed during dispatch is skipped if it has not run yet.
//!
//! # Example
//!
//! ```
//! use storefront_core::event_bus::EventBus;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let bus: EventBus<u32> = EventBus::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let sink = Rc::clone(&seen);
//! bus.subscribe("count", move |n: &u32| {
//!     sink.set(sink.get() + n);
//!     Ok(())
//! });
//!
//! let report = bus.emit("count", &5);
//! assert_eq!(report.delivered, 1);
//! assert_eq!(seen.get(), 5);
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use thiserror::Error;

/// Error a handler may return to report that it could not process an event.
///
/// Returning an error never interrupts dispatch; the bus logs it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The payload variant did not match what the handler expects for the topic
    #[error("unexpected payload for topic '{topic}'")]
    UnexpectedPayload {
        /// The topic the payload arrived on
        topic: String,
    },

    /// The handler's target has been dropped
    #[error("handler target is no longer alive")]
    TargetDropped,

    /// Any other handler failure
    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::UnexpectedPayload`]
    #[must_use]
    pub fn unexpected_payload(topic: impl Into<String>) -> Self {
        Self::UnexpectedPayload {
            topic: topic.into(),
        }
    }
}

/// Result type returned by bus handlers
pub type HandlerResult = Result<(), HandlerError>;

type Handler<P> = Rc<dyn Fn(&P) -> HandlerResult>;

/// Registration token returned by [`EventBus::subscribe`].
///
/// Pass it to [`EventBus::unsubscribe`] to stop delivery. Dropping it does
/// nothing; registrations live as long as the bus unless removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    topic: String,
    id: u64,
}

impl Subscription {
    /// The topic this registration listens on
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Summary of a single [`EventBus::emit`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that ran to completion without error
    pub delivered: usize,
    /// Handlers that returned an error or panicked
    pub failed: usize,
}

impl DispatchReport {
    /// Total number of handlers invoked
    #[must_use]
    pub const fn invoked(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Single-threaded publish/subscribe dispatcher.
///
/// Generic over the payload type `P` so each application defines its own
/// closed set of payload shapes. Share it as `Rc<EventBus<P>>` and pass it
/// explicitly to every component that needs it.
pub struct EventBus<P> {
    handlers: RefCell<HashMap<String, Vec<(u64, Handler<P>)>>>,
    next_id: Cell<u64>,
}

impl<P> EventBus<P> {
    /// Create an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register `handler` for exact matches of `topic`.
    pub fn subscribe<F>(&self, topic: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&P) -> HandlerResult + 'static,
    {
        let topic = topic.into();
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.handlers
            .borrow_mut()
            .entry(topic.clone())
            .or_default()
            .push((id, Rc::new(handler)));

        tracing::trace!(topic = %topic, id, "Handler subscribed");
        Subscription { topic, id }
    }

    /// Remove a registration. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(list) = handlers.get_mut(&subscription.topic) else {
            return false;
        };

        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        let removed = list.len() != before;

        if list.is_empty() {
            handlers.remove(&subscription.topic);
        }
        removed
    }

    /// Number of handlers currently registered for `topic`
    #[must_use]
    pub fn handler_count(&self, topic: &str) -> usize {
        self.handlers.borrow().get(topic).map_or(0, Vec::len)
    }

    /// Invoke every handler registered for `topic`, in registration order.
    ///
    /// Never fails: handler errors and panics are caught, logged and counted
    /// in the returned report.
    pub fn emit(&self, topic: &str, payload: &P) -> DispatchReport {
        // Snapshot so handlers may (un)subscribe or emit without holding the borrow.
        let snapshot: Vec<(u64, Handler<P>)> = match self.handlers.borrow().get(topic) {
            Some(list) => list
                .iter()
                .map(|(id, handler)| (*id, Rc::clone(handler)))
                .collect(),
            None => Vec::new(),
        };

        let mut report = DispatchReport::default();
        if snapshot.is_empty() {
            tracing::trace!(topic, "Emit with no subscribers");
            return report;
        }

        for (position, (id, handler)) in snapshot.iter().enumerate() {
            if !self.is_registered(topic, *id) {
                tracing::trace!(topic, id, "Skipping handler removed during dispatch");
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| handler(payload))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(error)) => {
                    report.failed += 1;
                    metrics::counter!("event_bus.handler.faults", "kind" => "error").increment(1);
                    tracing::error!(topic, position, error = %error, "Event handler failed");
                },
                Err(panic) => {
                    report.failed += 1;
                    metrics::counter!("event_bus.handler.faults", "kind" => "panic").increment(1);
                    tracing::error!(
                        topic,
                        position,
                        panic = %panic_message(panic.as_ref()),
                        "Event handler panicked"
                    );
                },
            }
        }

        tracing::trace!(
            topic,
            delivered = report.delivered,
            failed = report.failed,
            "Emit complete"
        );
        report
    }

    fn is_registered(&self, topic: &str, id: u64) -> bool {
        self.handlers
            .borrow()
            .get(topic)
            .is_some_and(|list| list.iter().any(|(registered, _)| *registered == id))
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.borrow();
        let mut topics: Vec<(&String, usize)> =
            handlers.iter().map(|(topic, list)| (topic, list.len())).collect();
        topics.sort();
        f.debug_struct("EventBus").field("topics", &topics).finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
