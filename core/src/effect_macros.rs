//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when reducers describe bus emissions.

/// Create an `Effect::Emit`
///
/// The topic may be a `&'static str` or an owned `String`.
///
/// # Example
///
/// ```
/// use storefront_core::{emit, effect::Effect};
///
/// let effect: Effect<(), &str> = emit!("cart:changed", "payload");
/// assert_eq!(effect.topic(), Some("cart:changed"));
/// ```
#[macro_export]
macro_rules! emit {
    ($topic:expr, $payload:expr $(,)?) => {
        $crate::effect::Effect::Emit {
            topic: ::std::borrow::Cow::from($topic),
            payload: $payload,
        }
    };
}

/// Create an `Effect::Future` from an async block producing `Option<Action>`
///
/// # Example
///
/// ```
/// use storefront_core::{async_effect, effect::Effect};
///
/// let effect: Effect<u8, ()> = async_effect!(async { Some(7) });
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($future:expr $(,)?) => {
        $crate::effect::Effect::Future(::std::boxed::Box::pin($future))
    };
}
