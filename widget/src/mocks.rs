//! Test doubles for the transport boundary.
//!
//! [`MockStorefrontApi`] answers from a script and records every order it
//! receives. A submission can be held open with [`MockStorefrontApi::gate`]
//! so tests can act while it is in flight.

use crate::api::{StorefrontApi, TransportError};
use crate::order::{OrderConfirmation, OrderRecord};
use crate::product::{Category, Money, Product, ProductId};
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

type SubmitResult = Result<OrderConfirmation, TransportError>;

enum Scripted {
    Ready(SubmitResult),
    Gated(oneshot::Receiver<SubmitResult>),
}

/// Scripted in-memory backend
///
/// Unscripted submissions succeed with `order-<n>` and the record's total.
#[derive(Default)]
pub struct MockStorefrontApi {
    catalog: RefCell<Option<Result<Vec<Product>, TransportError>>>,
    script: RefCell<VecDeque<Scripted>>,
    submitted: RefCell<Vec<OrderRecord>>,
    fetches: Cell<usize>,
}

impl MockStorefrontApi {
    /// Backend with an empty catalog that accepts every order
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `products` from `fetch_catalog`
    #[must_use]
    pub fn with_catalog(self, products: Vec<Product>) -> Self {
        *self.catalog.borrow_mut() = Some(Ok(products));
        self
    }

    /// Fail `fetch_catalog` with `error`
    #[must_use]
    pub fn with_catalog_error(self, error: TransportError) -> Self {
        *self.catalog.borrow_mut() = Some(Err(error));
        self
    }

    /// Answer the next unscripted submission with `result`
    pub fn respond(&self, result: SubmitResult) {
        self.script.borrow_mut().push_back(Scripted::Ready(result));
    }

    /// Hold the next unscripted submission open until the returned sender
    /// fires. Dropping the sender fails the submission with a network error.
    #[must_use]
    pub fn gate(&self) -> oneshot::Sender<SubmitResult> {
        let (sender, receiver) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Gated(receiver));
        sender
    }

    /// Every order received so far
    #[must_use]
    pub fn submitted(&self) -> Vec<OrderRecord> {
        self.submitted.borrow().clone()
    }

    /// Number of catalog fetches
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl StorefrontApi for MockStorefrontApi {
    fn fetch_catalog(&self) -> LocalBoxFuture<'_, Result<Vec<Product>, TransportError>> {
        self.fetches.set(self.fetches.get() + 1);
        let result = self
            .catalog
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()));
        futures::future::ready(result).boxed_local()
    }

    fn submit_order(&self, order: OrderRecord) -> LocalBoxFuture<'_, SubmitResult> {
        let total = order.total;
        self.submitted.borrow_mut().push(order);
        let sequence = self.submitted.borrow().len();

        match self.script.borrow_mut().pop_front() {
            Some(Scripted::Ready(result)) => futures::future::ready(result).boxed_local(),
            Some(Scripted::Gated(receiver)) => async move {
                receiver
                    .await
                    .unwrap_or_else(|_| Err(TransportError::Network("request cancelled".into())))
            }
            .boxed_local(),
            None => futures::future::ready(Ok(OrderConfirmation {
                order_id: format!("order-{sequence}"),
                total,
            }))
            .boxed_local(),
        }
    }
}

impl std::fmt::Debug for MockStorefrontApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStorefrontApi")
            .field("submitted", &self.submitted.borrow().len())
            .field("scripted", &self.script.borrow().len())
            .field("fetches", &self.fetches.get())
            .finish()
    }
}

/// A product with a placeholder title and image; `price: None` is not for sale
#[must_use]
pub fn product(id: &str, price: Option<u64>) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        description: String::new(),
        category: Category::Other,
        image: format!("http://localhost/content/{id}.svg"),
        price: price.map(Money::new).into(),
    }
}
