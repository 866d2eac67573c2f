//! Two-phase checkout form.
//!
//! The form owns no cart: checkout starts from a [`CartSnapshot`] and submits
//! exactly that snapshot, whatever happens to the cart meanwhile.

mod reducer;
mod types;

pub use reducer::CheckoutReducer;
pub use types::{AttemptToken, CheckoutAction, CheckoutEnvironment, CheckoutPhase, CheckoutState};

use crate::api::StorefrontApi;
use crate::cart::CartSnapshot;
use crate::config::WidgetConfig;
use crate::event::{ContactField, Payload, StorefrontBus, topics};
use crate::order::OrderDraft;
use crate::validation::ValidationErrors;
use std::rc::Rc;
use storefront_core::event_bus::{HandlerError, Subscription};
use storefront_runtime::Store;

/// Shared handle to the checkout store
#[derive(Clone)]
pub struct CheckoutForm {
    store: Rc<Store<CheckoutReducer>>,
}

impl CheckoutForm {
    /// Idle form submitting through `api`
    #[must_use]
    pub fn new(bus: Rc<StorefrontBus>, api: Rc<dyn StorefrontApi>, config: WidgetConfig) -> Self {
        Self {
            store: Rc::new(Store::new(
                CheckoutState::default(),
                CheckoutReducer,
                CheckoutEnvironment::new(api, config),
                bus,
            )),
        }
    }

    /// Begin a checkout for `snapshot`
    pub fn start(&self, snapshot: CartSnapshot) {
        self.store.send(CheckoutAction::Start { snapshot });
    }

    /// Update the delivery address
    pub fn edit_address(&self, address: impl Into<String>) {
        self.store.send(CheckoutAction::EditAddress(address.into()));
    }

    /// Pick a payment method by identifier (`"card"` or `"cash"`)
    pub fn select_payment(&self, method: impl Into<String>) {
        self.store.send(CheckoutAction::SelectPayment(method.into()));
    }

    /// Move to the contact phase if the address phase is valid
    pub fn advance(&self) {
        self.store.send(CheckoutAction::Advance);
    }

    /// Update a contact field
    pub fn edit_contact(&self, field: ContactField, value: impl Into<String>) {
        self.store.send(CheckoutAction::EditContact {
            field,
            value: value.into(),
        });
    }

    /// Submit the order and wait for the backend's answer.
    ///
    /// Returns once the outcome has been applied (or at once if the form was
    /// not ready). The outcome is announced on the bus, not returned.
    pub async fn submit(&self) {
        self.store.send(CheckoutAction::Submit).wait().await;
    }

    /// Abandon the flow; a pending submission's result will be ignored
    pub fn close(&self) {
        self.store.send(CheckoutAction::Close);
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        self.store.state(|s| s.phase)
    }

    /// Errors of both phases
    #[must_use]
    pub fn errors(&self) -> ValidationErrors {
        self.store.state(CheckoutState::errors)
    }

    /// Current fields as a draft
    #[must_use]
    pub fn draft(&self) -> OrderDraft {
        self.store.state(CheckoutState::draft)
    }

    /// Reason of the last rejected submission
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        self.store.state(|s| s.failure.clone())
    }

    /// Snapshot the checkout was started with
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.store.state(|s| s.snapshot.clone())
    }

    /// Handle the form's interaction topics
    pub fn attach(&self) -> Vec<Subscription> {
        vec![
            self.store.bind(topics::ADDRESS_EDIT, |store, payload| match payload {
                Payload::Text(address) => {
                    store.send(CheckoutAction::EditAddress(address.clone()));
                    Ok(())
                },
                _ => Err(HandlerError::unexpected_payload(topics::ADDRESS_EDIT)),
            }),
            self.store.bind(topics::PAYMENT_SELECT, |store, payload| match payload {
                Payload::Text(method) => {
                    store.send(CheckoutAction::SelectPayment(method.clone()));
                    Ok(())
                },
                _ => Err(HandlerError::unexpected_payload(topics::PAYMENT_SELECT)),
            }),
            self.store.bind(topics::CHECKOUT_ADVANCE, |store, _payload| {
                store.send(CheckoutAction::Advance);
                Ok(())
            }),
            self.store.bind(topics::CONTACT_EDIT, |store, payload| match payload {
                Payload::ContactEdit { field, value } => {
                    store.send(CheckoutAction::EditContact {
                        field: *field,
                        value: value.clone(),
                    });
                    Ok(())
                },
                _ => Err(HandlerError::unexpected_payload(topics::CONTACT_EDIT)),
            }),
            self.store.bind(topics::CHECKOUT_CLOSE, |store, _payload| {
                store.send(CheckoutAction::Close);
                Ok(())
            }),
        ]
    }
}

impl std::fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("store", &self.store)
            .finish()
    }
}
