//! Shopping cart: a set of products, unique by id, in insertion order.

use crate::event::{Payload, StorefrontBus, topics};
use crate::product::{Money, Product, ProductId};
use std::rc::Rc;
use storefront_core::effect::Effect;
use storefront_core::event_bus::{HandlerError, Subscription};
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, emit, smallvec};
use storefront_runtime::Store;

/// Cart contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<Product>,
}

impl CartState {
    /// Entries in insertion order
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when the cart has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a product with this id is in the cart
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|p| &p.id == id)
    }

    /// Sum of prices; products not for sale add nothing
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(|p| p.price.contribution()).sum()
    }

    /// Ids and total of the purchasable entries
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let eligible = self.items.iter().filter(|p| p.price.is_for_sale());
        CartSnapshot {
            product_ids: eligible.clone().map(|p| p.id.clone()).collect(),
            total: eligible.map(|p| p.price.contribution()).sum(),
        }
    }

    /// What a preview's buy control should offer for `product`
    #[must_use]
    pub fn availability(&self, product: &Product) -> Availability {
        if self.contains(&product.id) {
            Availability::InCart
        } else if product.price.is_for_sale() {
            Availability::Available
        } else {
            Availability::NotForSale
        }
    }
}

/// Purchasable cart contents captured when checkout starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Ids of priced entries, in cart order
    pub product_ids: Vec<ProductId>,
    /// Sum of their prices
    pub total: Money,
}

/// Buy control state for a product preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Can be added
    Available,
    /// Already in the cart
    InCart,
    /// Has no price
    NotForSale,
}

/// Cart actions
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Insert unless an entry with the same id exists
    Add(Product),
    /// Delete the entry with this id
    Remove(ProductId),
    /// Delete everything
    Clear,
}

/// Cart reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct CartReducer;

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = ();
    type Payload = Payload;

    fn reduce(
        &self,
        state: &mut CartState,
        action: CartAction,
        _env: &(),
    ) -> SmallVec<[Effect<CartAction, Payload>; 4]> {
        match action {
            CartAction::Add(product) => {
                if state.contains(&product.id) {
                    tracing::debug!(product_id = %product.id, "Product already in cart");
                    return smallvec![Effect::None];
                }
                state.items.push(product);
            },
            CartAction::Remove(id) => {
                let before = state.items.len();
                state.items.retain(|p| p.id != id);
                if state.items.len() == before {
                    tracing::debug!(product_id = %id, "Product not in cart");
                    return smallvec![Effect::None];
                }
            },
            CartAction::Clear => state.items.clear(),
        }
        smallvec![emit!(topics::CART_CHANGED, Payload::None)]
    }
}

/// Shared handle to the cart store
#[derive(Clone)]
pub struct CartStore {
    store: Rc<Store<CartReducer>>,
}

impl CartStore {
    /// Empty cart publishing on `bus`
    #[must_use]
    pub fn new(bus: Rc<StorefrontBus>) -> Self {
        Self {
            store: Rc::new(Store::new(CartState::default(), CartReducer, (), bus)),
        }
    }

    /// Add a product; no event if it is already present
    pub fn add(&self, product: Product) {
        self.store.send(CartAction::Add(product));
    }

    /// Remove by id; no event if absent
    pub fn remove(&self, id: ProductId) {
        self.store.send(CartAction::Remove(id));
    }

    /// Empty the cart; always announces `cart:changed`
    pub fn clear(&self) {
        self.store.send(CartAction::Clear);
    }

    /// Copy of the entries
    #[must_use]
    pub fn list(&self) -> Vec<Product> {
        self.store.state(|s| s.items.clone())
    }

    /// Number of entries
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.state(CartState::len)
    }

    /// Sum of prices
    #[must_use]
    pub fn total(&self) -> Money {
        self.store.state(CartState::total)
    }

    /// Whether the id is in the cart
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.store.state(|s| s.contains(id))
    }

    /// Purchasable contents for checkout
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.store.state(CartState::snapshot)
    }

    /// Buy control state for `product`
    #[must_use]
    pub fn availability(&self, product: &Product) -> Availability {
        self.store.state(|s| s.availability(product))
    }

    /// Handle `cart:remove` and `order:succeeded`
    pub fn attach(&self) -> Vec<Subscription> {
        vec![
            self.store.bind(topics::CART_REMOVE, |store, payload| match payload {
                Payload::ProductId(id) => {
                    store.send(CartAction::Remove(id.clone()));
                    Ok(())
                },
                _ => Err(HandlerError::unexpected_payload(topics::CART_REMOVE)),
            }),
            self.store.bind(topics::ORDER_SUCCEEDED, |store, _payload| {
                store.send(CartAction::Clear);
                Ok(())
            }),
        ]
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("store", &self.store)
            .finish()
    }
}
