//! # Storefront Core
//!
//! Core traits and types for the storefront widget's state layer.
//!
//! This crate provides the abstractions every store in the widget is built from:
//!
//! - **Event bus**: synchronous, re-entrant publish/subscribe dispatcher
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect descriptions (bus emissions, async work), not execution
//!
//! ## Architecture Principles
//!
//! - Functional core, imperative shell
//! - Stores communicate only through bus topics
//! - Dependencies (the bus included) are passed explicitly, never global
//! - Single-threaded: state lives behind `RefCell`, no locks
//!
//! ## Example
//!
//! ```
//! use storefront_core::{emit, effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct Counter {
//!     count: u32,
//! }
//!
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = CounterAction;
//!     type Environment = ();
//!     type Payload = u32;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Counter,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction, u32>; 4]> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 smallvec![emit!("counter:changed", state.count)]
//!             },
//!         }
//!     }
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub use smallvec::{SmallVec, smallvec};

/// Synchronous publish/subscribe dispatcher
pub mod event_bus;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable without a bus.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Payload`: The bus payload type carried by `Effect::Emit`
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// The payload type of emitted bus events
        type Payload;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action against current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the store
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action, Self::Payload>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the store runtime.
/// They are values (not execution).
pub mod effect {
    use futures::future::LocalBoxFuture;
    use std::borrow::Cow;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are returned from reducers and
    /// executed by the store runtime after the state borrow is released.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type async effects feed back into the reducer
    /// - `Payload`: The bus payload type
    pub enum Effect<Action, Payload> {
        /// No-op effect
        None,

        /// Publish `payload` on the bus under `topic`
        Emit {
            /// Exact topic name
            topic: Cow<'static, str>,
            /// Payload handed to every subscriber
            payload: Payload,
        },

        /// Run effects in order
        Sequential(Vec<Effect<Action, Payload>>),

        /// Asynchronous computation on the current thread
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(LocalBoxFuture<'static, Option<Action>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action, Payload> std::fmt::Debug for Effect<Action, Payload>
    where
        Payload: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::None => write!(f, "Effect::None"),
                Self::Emit { topic, payload } => f
                    .debug_struct("Effect::Emit")
                    .field("topic", topic)
                    .field("payload", payload)
                    .finish(),
                Self::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Self::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action, Payload> Effect<Action, Payload> {
        /// Build an emission effect
        #[must_use]
        pub fn emit(topic: impl Into<Cow<'static, str>>, payload: Payload) -> Self {
            Self::Emit {
                topic: topic.into(),
                payload,
            }
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Self>) -> Self {
            Self::Sequential(effects)
        }

        /// Topic of an `Emit` effect, if this is one
        #[must_use]
        pub fn topic(&self) -> Option<&str> {
            match self {
                Self::Emit { topic, .. } => Some(topic),
                _ => None,
            }
        }

        /// Every topic this effect emits, flattening `Sequential`, in execution order
        #[must_use]
        pub fn emitted_topics(&self) -> Vec<&str> {
            match self {
                Self::Emit { topic, .. } => vec![topic.as_ref()],
                Self::Sequential(effects) => {
                    effects.iter().flat_map(Self::emitted_topics).collect()
                },
                Self::None | Self::Future(_) => Vec::new(),
            }
        }
    }
}
