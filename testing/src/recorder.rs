//! Bus recording for tests
//!
//! [`EventRecorder`] subscribes to a fixed set of topics and keeps every
//! `(topic, payload)` pair it sees, so tests can assert on what a store
//! announced and in which order.

use std::cell::RefCell;
use std::rc::Rc;
use storefront_core::event_bus::{EventBus, Subscription};

/// Records emissions on selected topics of an [`EventBus`].
///
/// # Example
///
/// ```
/// use storefront_core::event_bus::EventBus;
/// use storefront_testing::EventRecorder;
/// use std::rc::Rc;
///
/// let bus: Rc<EventBus<u8>> = Rc::new(EventBus::new());
/// let recorder = EventRecorder::attach(&bus, &["a", "b"]);
///
/// bus.emit("b", &2);
/// bus.emit("c", &3);
/// bus.emit("a", &1);
///
/// assert_eq!(recorder.topics(), vec!["b", "a"]);
/// assert_eq!(recorder.payloads("a"), vec![1]);
/// ```
pub struct EventRecorder<P> {
    bus: Rc<EventBus<P>>,
    events: Rc<RefCell<Vec<(String, P)>>>,
    subscriptions: Vec<Subscription>,
}

impl<P: Clone + 'static> EventRecorder<P> {
    /// Subscribe to `topics` on `bus` and start recording
    #[must_use]
    pub fn attach(bus: &Rc<EventBus<P>>, topics: &[&str]) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let subscriptions = topics
            .iter()
            .map(|topic| {
                let sink = Rc::clone(&events);
                let name = (*topic).to_string();
                bus.subscribe(*topic, move |payload: &P| {
                    sink.borrow_mut().push((name.clone(), payload.clone()));
                    Ok(())
                })
            })
            .collect();

        Self {
            bus: Rc::clone(bus),
            events,
            subscriptions,
        }
    }

    /// Every recorded `(topic, payload)` pair, oldest first
    #[must_use]
    pub fn events(&self) -> Vec<(String, P)> {
        self.events.borrow().clone()
    }

    /// Recorded topics, oldest first
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    /// Payloads recorded for one topic, oldest first
    #[must_use]
    pub fn payloads(&self, topic: &str) -> Vec<P> {
        self.events
            .borrow()
            .iter()
            .filter(|(recorded, _)| recorded == topic)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Most recent payload for a topic
    #[must_use]
    pub fn last(&self, topic: &str) -> Option<P> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|(recorded, _)| recorded == topic)
            .map(|(_, payload)| payload.clone())
    }

    /// How many times a topic was emitted
    #[must_use]
    pub fn count(&self, topic: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|(recorded, _)| recorded == topic)
            .count()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl<P> Drop for EventRecorder<P> {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            self.bus.unsubscribe(subscription);
        }
    }
}
