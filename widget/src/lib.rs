//! # Storefront Widget
//!
//! State layer of an embeddable storefront: a product catalog, a cart, and a
//! two-phase checkout form that submits orders to a backend.
//!
//! Stores never call each other. Renderers emit interaction topics on a shared
//! [`StorefrontBus`], the stores react and announce what changed on the same
//! bus. Everything runs on one thread; the only suspension point is the
//! transport call.
//!
//! ## Modules
//!
//! - [`catalog`], [`cart`], [`checkout`]: the stores
//! - [`storefront`]: wiring between them
//! - [`api`]: transport boundary and its HTTP implementation
//! - [`order`], [`product`], [`validation`]: domain values and rules
//! - [`event`]: topic names and payloads
//! - [`config`]: settings
//! - [`mocks`]: scripted transport for tests
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use storefront_widget::config::WidgetConfig;
//! use storefront_widget::event::{Payload, StorefrontBus, topics};
//! use storefront_widget::mocks::{MockStorefrontApi, product};
//! use storefront_widget::storefront::Storefront;
//!
//! let bus = Rc::new(StorefrontBus::new());
//! let storefront = Storefront::new(
//!     Rc::clone(&bus),
//!     Rc::new(MockStorefrontApi::new()),
//!     WidgetConfig::default(),
//! );
//! storefront.attach();
//!
//! storefront.catalog().set_products(vec![product("1", Some(100))]);
//! bus.emit(topics::CATALOG_SELECT, &Payload::Product(product("1", Some(100))));
//! bus.emit(topics::CART_ADD_ACTIVE, &Payload::None);
//!
//! assert_eq!(storefront.cart().count(), 1);
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod event;
pub mod mocks;
pub mod order;
pub mod product;
pub mod storefront;
pub mod validation;

pub use event::{Payload, StorefrontBus};
pub use storefront::Storefront;
