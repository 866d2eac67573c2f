//! # Storefront Testing
//!
//! Testing utilities and helpers for the storefront widget.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers, no bus required
//! - [`EventRecorder`]: captures what a bus emitted, in order
//! - [`init_test_tracing`]: opt-in log output for test runs
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::EventRecorder;
//!
//! let bus = Rc::new(EventBus::new());
//! let recorder = EventRecorder::attach(&bus, &["cart:changed"]);
//! let cart = CartStore::new(Rc::clone(&bus));
//!
//! cart.add(product("1", Some(100)));
//! assert_eq!(recorder.topics(), vec!["cart:changed"]);
//! ```

/// Event capture for bus-level assertions
pub mod recorder;


pub use recorder::EventRecorder;
pub use reducer_test::{ReducerTest, assertions};

/// Install a `tracing` subscriber for tests, filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
