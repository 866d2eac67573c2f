//! # Storefront Runtime
//!
//! Runtime implementation for the storefront widget's stores.
//!
//! This crate provides the [`Store`] that coordinates reducer execution and
//! effect handling on a single thread.
//!
//! ## Core Components
//!
//! - **Store**: owns state, runs the reducer, executes effects
//! - **Effect execution**: `Emit` effects are published on the bus synchronously,
//!   `Future` effects are handed back in an [`EffectHandle`]
//! - **Feedback loop**: actions produced by futures are sent back through the store
//! - **Bindings**: [`Store::bind`] turns bus topics into actions without keeping
//!   the store alive
//!
//! ## Example
//!
//! ```ignore
//! use storefront_runtime::Store;
//!
//! let store = Rc::new(Store::new(CartState::default(), CartReducer, (), Rc::clone(&bus)));
//!
//! // Send an action; emissions have already happened when this returns
//! store.send(CartAction::Clear);
//!
//! // Read state
//! let count = store.state(|s| s.len());
//! ```

use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use storefront_core::effect::Effect;
use storefront_core::event_bus::{EventBus, HandlerError, HandlerResult, Subscription};
use storefront_core::reducer::Reducer;

pub use store::Store;

type PendingEffect<A> = LocalBoxFuture<'static, Option<A>>;

/// Handle for driving the asynchronous part of an action's effects
///
/// Returned by [`Store::send()`]. Synchronous effects (bus emissions) have
/// already run by the time the handle exists; only `Effect::Future` work is
/// left. Dropping the handle abandons that work.
///
/// # Example
///
/// ```ignore
/// store.send(CheckoutAction::Submit).wait().await;
/// // The submission has resolved and its outcome was reduced
/// ```
pub struct EffectHandle<'a, R: Reducer> {
    store: &'a Store<R>,
    pending: Vec<PendingEffect<R::Action>>,
}

impl<R: Reducer> EffectHandle<'_, R> {
    /// `true` when the action produced no asynchronous work
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of futures waiting to be driven
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drive every pending future to completion, in order.
    ///
    /// Actions produced by the futures are sent back through the store and any
    /// futures they produce are driven too (cascading), so when this returns
    /// the whole effect tree has settled.
    pub async fn wait(self) {
        let store = self.store;
        let mut queue: VecDeque<PendingEffect<R::Action>> = self.pending.into();

        while let Some(future) = queue.pop_front() {
            if let Some(action) = future.await {
                tracing::trace!("Effect::Future produced an action, sending to store");
                let next = store.send(action);
                queue.extend(next.pending);
            } else {
                tracing::trace!("Effect::Future completed with no action");
            }
        }
    }
}

impl<R: Reducer> std::fmt::Debug for EffectHandle<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending.len())
            .finish_non_exhaustive()
    }
}

/// The Store module
pub mod store {
    use super::{
        Effect, EffectHandle, EventBus, HandlerError, HandlerResult, PendingEffect, Rc, Reducer,
        RefCell, Subscription,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RefCell`; single-threaded, no locks)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. The bus its `Emit` effects are published on
    ///
    /// The state borrow is released before any effect runs, so bus handlers
    /// may read this store or send it further actions re-entrantly.
    pub struct Store<R: Reducer> {
        state: RefCell<R::State>,
        reducer: R,
        environment: R::Environment,
        bus: Rc<EventBus<R::Payload>>,
    }

    impl<R: Reducer> Store<R> {
        /// Create a new store with initial state, reducer, environment and bus
        #[must_use]
        pub fn new(
            initial_state: R::State,
            reducer: R,
            environment: R::Environment,
            bus: Rc<EventBus<R::Payload>>,
        ) -> Self {
            Self {
                state: RefCell::new(initial_state),
                reducer,
                environment,
                bus,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Calls the reducer with (state, action, environment)
        /// 2. Releases the state borrow
        /// 3. Executes emissions on the bus, in the order the reducer returned them
        /// 4. Returns the remaining asynchronous work in an [`EffectHandle`]
        ///
        /// # Panics
        ///
        /// Panics if called from inside a [`Store::state`] closure of the same
        /// store, which would alias the state borrow.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub fn send(&self, action: R::Action) -> EffectHandle<'_, R> {
            let effects = {
                let mut state = self.state.borrow_mut();
                self.reducer.reduce(&mut state, action, &self.environment)
            };

            let mut pending = Vec::new();
            for effect in effects {
                self.execute_effect(effect, &mut pending);
            }

            EffectHandle {
                store: self,
                pending,
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.items.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            f(&self.state.borrow())
        }

        fn execute_effect(
            &self,
            effect: Effect<R::Action, R::Payload>,
            pending: &mut Vec<PendingEffect<R::Action>>,
        ) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Emit { topic, payload } => {
                    tracing::trace!(topic = %topic, "Executing Effect::Emit");
                    metrics::counter!("store.effects.executed", "type" => "emit").increment(1);
                    self.bus.emit(&topic, &payload);
                },
                Effect::Sequential(effects) => {
                    tracing::trace!(count = effects.len(), "Executing Effect::Sequential");
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);
                    for effect in effects {
                        self.execute_effect(effect, pending);
                    }
                },
                Effect::Future(future) => {
                    tracing::trace!("Deferring Effect::Future to the effect handle");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    pending.push(future);
                },
            }
        }
    }

    impl<R: Reducer + 'static> Store<R> {
        /// Subscribe `handler` to `topic` on this store's bus.
        ///
        /// The registration holds only a weak reference: once the last `Rc`
        /// to the store is dropped, deliveries fail with
        /// [`HandlerError::TargetDropped`] instead of keeping the store alive.
        ///
        /// Any asynchronous work produced by actions sent from `handler` must
        /// be driven by the handler itself; bindings are meant for synchronous
        /// actions.
        pub fn bind<F>(self: &Rc<Self>, topic: &str, handler: F) -> Subscription
        where
            F: Fn(&Self, &R::Payload) -> HandlerResult + 'static,
        {
            let weak = Rc::downgrade(self);
            self.bus.subscribe(topic, move |payload: &R::Payload| {
                let store = weak.upgrade().ok_or(HandlerError::TargetDropped)?;
                handler(&store, payload)
            })
        }
    }

    impl<R: Reducer> std::fmt::Debug for Store<R>
    where
        R::State: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.state)
                .finish_non_exhaustive()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use storefront_core::{SmallVec, async_effect, emit, smallvec};

    #[derive(Debug, Default)]
    struct TallyState {
        total: u32,
        settled: u32,
    }

    #[derive(Debug)]
    enum TallyAction {
        Add(u32),
        AddLater(u32),
        Settled,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();
        type Payload = u32;

        fn reduce(
            &self,
            state: &mut TallyState,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction, u32>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    smallvec![emit!("tally:changed", state.total)]
                },
                TallyAction::AddLater(n) => smallvec![async_effect!(async move {
                    Some(TallyAction::Add(n))
                })],
                TallyAction::Settled => {
                    state.settled += 1;
                    smallvec![Effect::None]
                },
            }
        }
    }

    fn tally_store() -> (Rc<EventBus<u32>>, Rc<Store<TallyReducer>>) {
        let bus = Rc::new(EventBus::new());
        let store = Rc::new(Store::new(
            TallyState::default(),
            TallyReducer,
            (),
            Rc::clone(&bus),
        ));
        (bus, store)
    }

    #[test]
    fn test_send_applies_state_and_emits() {
        let (bus, store) = tally_store();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        bus.subscribe("tally:changed", move |total: &u32| {
            sink.set(*total);
            Ok(())
        });

        let handle = store.send(TallyAction::Add(3));

        assert!(handle.is_complete());
        assert_eq!(store.state(|s| s.total), 3);
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn test_handler_may_read_store_during_emit() {
        let (bus, store) = tally_store();
        let observed = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&store);
        let sink = Rc::clone(&observed);
        bus.subscribe("tally:changed", move |_: &u32| {
            if let Some(store) = weak.upgrade() {
                sink.set(store.state(|s| s.total));
            }
            Ok(())
        });

        store.send(TallyAction::Add(4));

        assert_eq!(observed.get(), 4);
    }

    #[test]
    fn test_future_effects_wait_for_handle() {
        let (_bus, store) = tally_store();

        let handle = store.send(TallyAction::AddLater(5));
        assert_eq!(handle.pending(), 1);
        assert_eq!(store.state(|s| s.total), 0);

        tokio_test::block_on(handle.wait());

        assert_eq!(store.state(|s| s.total), 5);
    }

    #[test]
    fn test_dropped_handle_abandons_future_work() {
        let (_bus, store) = tally_store();

        drop(store.send(TallyAction::AddLater(5)));

        assert_eq!(store.state(|s| s.total), 0);
    }

    #[test]
    fn test_bind_translates_topic_into_action() {
        let (bus, store) = tally_store();
        store.bind("tally:add", |store, amount| {
            store.send(TallyAction::Add(*amount));
            Ok(())
        });

        bus.emit("tally:add", &7);
        bus.emit("tally:add", &1);

        assert_eq!(store.state(|s| s.total), 8);
    }

    #[test]
    fn test_bind_does_not_keep_store_alive() {
        let (bus, store) = tally_store();
        store.bind("tally:add", |store, amount| {
            store.send(TallyAction::Add(*amount));
            Ok(())
        });

        drop(store);
        let report = bus.emit("tally:add", &7);

        assert_eq!(report.failed, 1);
        assert_eq!(report.delivered, 0);
    }

    #[test]
    fn test_sequential_effects_run_in_order() {
        struct SeqReducer;
        impl Reducer for SeqReducer {
            type State = ();
            type Action = ();
            type Environment = ();
            type Payload = &'static str;

            fn reduce(
                &self,
                _state: &mut (),
                _action: (),
                _env: &(),
            ) -> SmallVec<[Effect<(), &'static str>; 4]> {
                smallvec![Effect::chain(vec![
                    emit!("log", "one"),
                    emit!("log", "two"),
                ])]
            }
        }

        let bus = Rc::new(EventBus::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        bus.subscribe("log", move |entry: &&'static str| {
            sink.borrow_mut().push(*entry);
            Ok(())
        });
        let store = Store::new((), SeqReducer, (), Rc::clone(&bus));

        store.send(());

        assert_eq!(*log.borrow(), vec!["one", "two"]);
    }

    #[test]
    fn test_settled_action_without_effects() {
        let (_bus, store) = tally_store();
        store.send(TallyAction::Settled);
        store.send(TallyAction::Settled);
        assert_eq!(store.state(|s| s.settled), 2);
    }
}
