//! Bus vocabulary: topic names and the payload they carry.

use crate::checkout::CheckoutPhase;
use crate::product::{Money, Product, ProductId};
use crate::validation::ValidationErrors;
use std::fmt;

/// The bus type shared by every store of the widget
pub type StorefrontBus = storefront_core::event_bus::EventBus<Payload>;

/// Topic names.
///
/// Emitted topics are announcements from the stores; consumed topics are
/// interaction requests from renderers.
pub mod topics {
    /// Catalog list replaced. Payload: none
    pub const CATALOG_LOADED: &str = "catalog:loaded";
    /// Active product changed. Payload: product
    pub const CATALOG_SELECTED: &str = "catalog:selected";
    /// Cart contents may have changed. Payload: none
    pub const CART_CHANGED: &str = "cart:changed";
    /// Checkout phase transition. Payload: phase
    pub const CHECKOUT_PHASE_CHANGED: &str = "checkout:phase-changed";
    /// Address phase validation result. Payload: errors
    pub const VALIDATION_ADDRESS: &str = "validation:address";
    /// Contact phase validation result. Payload: errors
    pub const VALIDATION_CONTACT: &str = "validation:contact";
    /// Submission precondition failure. Payload: errors
    pub const VALIDATION_ORDER: &str = "validation:order";
    /// Submission confirmed. Payload: order id and total
    pub const ORDER_SUCCEEDED: &str = "order:succeeded";
    /// Submission rejected. Payload: reason
    pub const ORDER_FAILED: &str = "order:failed";

    /// Show a product. Payload: product
    pub const CATALOG_SELECT: &str = "catalog:select";
    /// Buy the previewed product. Payload: none
    pub const CART_ADD_ACTIVE: &str = "cart:add-active";
    /// Remove a cart line. Payload: product id
    pub const CART_REMOVE: &str = "cart:remove";
    /// Begin checkout. Payload: none
    pub const CHECKOUT_OPEN: &str = "checkout:open";
    /// Address typed. Payload: text
    pub const ADDRESS_EDIT: &str = "address:edit";
    /// Payment control clicked. Payload: text
    pub const PAYMENT_SELECT: &str = "payment:select";
    /// Leave the address step. Payload: none
    pub const CHECKOUT_ADVANCE: &str = "checkout:advance";
    /// Email or phone typed. Payload: contact edit
    pub const CONTACT_EDIT: &str = "contact:edit";
    /// Dismiss checkout. Payload: none
    pub const CHECKOUT_CLOSE: &str = "checkout:close";
}

/// Contact fields editable in the second checkout phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    /// Email address
    Email,
    /// Phone number
    Phone,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "email",
            Self::Phone => "phone",
        })
    }
}

/// Everything that travels on the widget's bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Signal without data
    None,
    /// A product
    Product(Product),
    /// A product identifier
    ProductId(ProductId),
    /// Free text typed by the user
    Text(String),
    /// A contact field edit
    ContactEdit {
        /// Which field
        field: ContactField,
        /// New value
        value: String,
    },
    /// A checkout phase
    Phase(CheckoutPhase),
    /// A validation result
    Errors(ValidationErrors),
    /// Confirmed order
    OrderSucceeded {
        /// Backend order id
        order_id: String,
        /// Amount charged
        total: Money,
    },
    /// Rejected order
    OrderFailed {
        /// Message for the user
        reason: String,
    },
}
