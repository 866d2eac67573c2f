//! Product catalog and the currently previewed product.

use crate::event::{Payload, StorefrontBus, topics};
use crate::product::{Product, ProductId};
use std::rc::Rc;
use storefront_core::effect::Effect;
use storefront_core::event_bus::{HandlerError, Subscription};
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, emit, smallvec};
use storefront_runtime::Store;

/// Catalog contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    /// Products in backend order
    pub products: Vec<Product>,
    /// Previewed product, resolved against `products`
    pub active: Option<ProductId>,
}

impl CatalogState {
    /// Product by id
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// The previewed product, if it is still in the catalog
    #[must_use]
    pub fn active_product(&self) -> Option<&Product> {
        self.active.as_ref().and_then(|id| self.find(id))
    }
}

/// Catalog actions
#[derive(Debug, Clone)]
pub enum CatalogAction {
    /// Replace the whole list
    SetProducts(Vec<Product>),
    /// Preview a product
    Select(Product),
}

/// Catalog reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogReducer;

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = ();
    type Payload = Payload;

    fn reduce(
        &self,
        state: &mut CatalogState,
        action: CatalogAction,
        _env: &(),
    ) -> SmallVec<[Effect<CatalogAction, Payload>; 4]> {
        match action {
            CatalogAction::SetProducts(products) => {
                state.products = products;
                if state.active.is_some() && state.active_product().is_none() {
                    tracing::debug!("Active product left the catalog, clearing selection");
                    state.active = None;
                }
                tracing::debug!(count = state.products.len(), "Catalog replaced");
                smallvec![emit!(topics::CATALOG_LOADED, Payload::None)]
            },
            CatalogAction::Select(product) => {
                state.active = Some(product.id.clone());
                smallvec![emit!(topics::CATALOG_SELECTED, Payload::Product(product))]
            },
        }
    }
}

/// Shared handle to the catalog store
#[derive(Clone)]
pub struct CatalogStore {
    store: Rc<Store<CatalogReducer>>,
}

impl CatalogStore {
    /// Empty catalog publishing on `bus`
    #[must_use]
    pub fn new(bus: Rc<StorefrontBus>) -> Self {
        Self {
            store: Rc::new(Store::new(
                CatalogState::default(),
                CatalogReducer,
                (),
                bus,
            )),
        }
    }

    /// Replace the catalog and announce `catalog:loaded`
    pub fn set_products(&self, products: Vec<Product>) {
        self.store.send(CatalogAction::SetProducts(products));
    }

    /// Preview a product and announce `catalog:selected`
    pub fn select_product(&self, product: Product) {
        self.store.send(CatalogAction::Select(product));
    }

    /// Copy of the product list
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.store.state(|s| s.products.clone())
    }

    /// The previewed product
    #[must_use]
    pub fn active_product(&self) -> Option<Product> {
        self.store.state(|s| s.active_product().cloned())
    }

    /// Product by id
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<Product> {
        self.store.state(|s| s.find(id).cloned())
    }

    /// Handle `catalog:select`
    pub fn attach(&self) -> Vec<Subscription> {
        vec![self.store.bind(topics::CATALOG_SELECT, |store, payload| {
            match payload {
                Payload::Product(product) => {
                    store.send(CatalogAction::Select(product.clone()));
                    Ok(())
                },
                _ => Err(HandlerError::unexpected_payload(topics::CATALOG_SELECT)),
            }
        })]
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::product;
    use storefront_testing::{EventRecorder, ReducerTest, assertions};

    #[test]
    fn test_set_products_announces_load() {
        ReducerTest::new(CatalogReducer)
            .with_env(())
            .given_state(CatalogState::default())
            .when_action(CatalogAction::SetProducts(vec![
                product("1", Some(100)),
                product("2", None),
            ]))
            .then_state(|state| {
                assert_eq!(state.products.len(), 2);
            })
            .then_effects(|effects| {
                assertions::assert_emitted(effects, &[topics::CATALOG_LOADED]);
            })
            .run();
    }

    #[test]
    fn test_reload_clears_missing_selection() {
        ReducerTest::new(CatalogReducer)
            .with_env(())
            .given_state(CatalogState {
                products: vec![product("1", Some(100))],
                active: Some(ProductId::new("1")),
            })
            .when_action(CatalogAction::SetProducts(vec![product("2", None)]))
            .then_state(|state| {
                assert_eq!(state.active, None);
            })
            .run();
    }

    #[test]
    fn test_reload_keeps_present_selection() {
        ReducerTest::new(CatalogReducer)
            .with_env(())
            .given_state(CatalogState {
                products: vec![product("1", Some(100))],
                active: Some(ProductId::new("1")),
            })
            .when_action(CatalogAction::SetProducts(vec![
                product("2", None),
                product("1", Some(120)),
            ]))
            .then_state(|state| {
                assert_eq!(
                    state.active_product().map(|p| p.price),
                    Some(crate::product::Price::Amount(crate::product::Money::new(120)))
                );
            })
            .run();
    }

    #[test]
    fn test_select_product_emits_product() {
        let selected = product("7", Some(5));
        let expected = Payload::Product(selected.clone());

        ReducerTest::new(CatalogReducer)
            .with_env(())
            .given_state(CatalogState::default())
            .when_action(CatalogAction::Select(selected))
            .then_state(|state| {
                assert_eq!(state.active, Some(ProductId::new("7")));
            })
            .then_effects(move |effects| {
                assert_eq!(
                    assertions::emitted_payload(effects, topics::CATALOG_SELECTED),
                    Some(&expected)
                );
            })
            .run();
    }

    #[test]
    fn test_catalog_select_topic_drives_store() {
        let bus = Rc::new(StorefrontBus::new());
        let catalog = CatalogStore::new(Rc::clone(&bus));
        let _subscriptions = catalog.attach();
        let recorder = EventRecorder::attach(&bus, &[topics::CATALOG_SELECTED]);
        catalog.set_products(vec![product("1", Some(100))]);

        bus.emit(topics::CATALOG_SELECT, &Payload::Product(product("1", Some(100))));

        assert_eq!(catalog.active_product(), Some(product("1", Some(100))));
        assert_eq!(recorder.count(topics::CATALOG_SELECTED), 1);
    }

    #[test]
    fn test_wrong_payload_is_reported_not_applied() {
        let bus = Rc::new(StorefrontBus::new());
        let catalog = CatalogStore::new(Rc::clone(&bus));
        let _subscriptions = catalog.attach();

        let report = bus.emit(topics::CATALOG_SELECT, &Payload::None);

        assert_eq!(report.failed, 1);
        assert_eq!(catalog.active_product(), None);
    }
}
