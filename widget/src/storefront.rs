//! Wiring: one bus, three stores, and the topic bindings between them.

use crate::api::{StorefrontApi, TransportError};
use crate::cart::{Availability, CartStore};
use crate::catalog::CatalogStore;
use crate::checkout::CheckoutForm;
use crate::config::WidgetConfig;
use crate::event::{StorefrontBus, topics};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use storefront_core::event_bus::{HandlerError, HandlerResult, Subscription};

/// The widget's state layer
///
/// # Example
///
/// ```ignore
/// let bus = Rc::new(StorefrontBus::new());
/// let api = Rc::new(HttpStorefrontApi::new(&config));
/// let storefront = Storefront::new(Rc::clone(&bus), api, config);
/// storefront.attach();
///
/// storefront.load_catalog().await?;
/// bus.emit(topics::CATALOG_SELECT, &Payload::Product(product));
/// bus.emit(topics::CART_ADD_ACTIVE, &Payload::None);
/// ```
pub struct Storefront {
    bus: Rc<StorefrontBus>,
    api: Rc<dyn StorefrontApi>,
    catalog: CatalogStore,
    cart: CartStore,
    checkout: CheckoutForm,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl Storefront {
    /// Build the stores on `bus`
    #[must_use]
    pub fn new(
        bus: Rc<StorefrontBus>,
        api: Rc<dyn StorefrontApi>,
        config: WidgetConfig,
    ) -> Rc<Self> {
        Rc::new(Self {
            catalog: CatalogStore::new(Rc::clone(&bus)),
            cart: CartStore::new(Rc::clone(&bus)),
            checkout: CheckoutForm::new(Rc::clone(&bus), Rc::clone(&api), config),
            subscriptions: RefCell::new(Vec::new()),
            bus,
            api,
        })
    }

    /// Subscribe every interaction topic. Calling it again is a no-op.
    pub fn attach(self: &Rc<Self>) {
        if !self.subscriptions.borrow().is_empty() {
            tracing::debug!("Storefront already attached");
            return;
        }

        let mut subscriptions = Vec::new();
        subscriptions.extend(self.catalog.attach());
        subscriptions.extend(self.cart.attach());
        subscriptions.extend(self.checkout.attach());
        subscriptions.push(self.bind(topics::CART_ADD_ACTIVE, |storefront| {
            storefront.add_active();
        }));
        subscriptions.push(self.bind(topics::CHECKOUT_OPEN, Self::open_checkout));

        tracing::debug!(count = subscriptions.len(), "Storefront attached");
        *self.subscriptions.borrow_mut() = subscriptions;
    }

    /// Remove every subscription made by [`attach`](Self::attach)
    pub fn detach(&self) {
        let subscriptions = std::mem::take(&mut *self.subscriptions.borrow_mut());
        for subscription in &subscriptions {
            self.bus.unsubscribe(subscription);
        }
    }

    fn bind<F>(self: &Rc<Self>, topic: &str, handler: F) -> Subscription
    where
        F: Fn(&Self) + 'static,
    {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.bus.subscribe(topic, move |_payload| -> HandlerResult {
            let storefront = weak.upgrade().ok_or(HandlerError::TargetDropped)?;
            handler(&storefront);
            Ok(())
        })
    }

    /// Fetch the catalog and replace the store's list
    ///
    /// # Errors
    ///
    /// Returns the transport error; the current catalog is left unchanged.
    pub async fn load_catalog(&self) -> Result<usize, TransportError> {
        match self.api.fetch_catalog().await {
            Ok(products) => {
                let count = products.len();
                self.catalog.set_products(products);
                tracing::info!(count, "Catalog loaded");
                Ok(count)
            },
            Err(error) => {
                tracing::error!(%error, "Catalog fetch failed");
                Err(error)
            },
        }
    }

    /// Add the previewed product to the cart if it can be bought.
    ///
    /// Returns whether the cart changed.
    pub fn add_active(&self) -> bool {
        let Some(product) = self.catalog.active_product() else {
            tracing::debug!("No active product to add");
            return false;
        };
        match self.cart.availability(&product) {
            Availability::Available => {
                self.cart.add(product);
                true
            },
            availability => {
                tracing::debug!(product_id = %product.id, ?availability, "Active product not added");
                false
            },
        }
    }

    /// Start checkout with the cart's purchasable contents
    pub fn open_checkout(&self) {
        self.checkout.start(self.cart.snapshot());
    }

    /// Submit the checkout and wait for the outcome
    pub async fn submit(&self) {
        self.checkout.submit().await;
    }

    /// Catalog store
    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Cart store
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Checkout form
    #[must_use]
    pub const fn checkout(&self) -> &CheckoutForm {
        &self.checkout
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("catalog", &self.catalog)
            .field("cart", &self.cart)
            .field("checkout", &self.checkout)
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish_non_exhaustive()
    }
}
