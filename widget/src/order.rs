//! Order types at the transport boundary.
//!
//! [`OrderDraft`] is what the checkout form holds: every field optional.
//! [`OrderRecord`] is what the transport accepts: every field present and
//! well-formed. [`OrderDraft::finalize`] is the only way from one to the other.

use crate::product::{Money, ProductId};
use crate::validation::{Field, FieldError, ValidationErrors, normalize_phone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method offered to the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Pay online by card
    Card,
    /// Pay cash on delivery
    Cash,
}

impl PaymentMethod {
    /// Parse the renderer's identifier (`"card"` / `"cash"`)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "card" => Some(Self::Card),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }

    /// The renderer's identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the customer picked in the payment control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaymentSelection {
    /// Nothing picked yet
    #[default]
    Unset,
    /// A known method
    Chosen(PaymentMethod),
    /// An identifier that maps to no method
    Unrecognized(String),
}

impl PaymentSelection {
    /// Classify a renderer identifier
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.is_empty() {
            return Self::Unset;
        }
        PaymentMethod::parse(value)
            .map_or_else(|| Self::Unrecognized(value.to_string()), Self::Chosen)
    }

    /// The chosen method
    ///
    /// # Errors
    ///
    /// [`FieldError::PaymentRequired`] when unset,
    /// [`FieldError::PaymentUnknown`] when unrecognised.
    pub fn method(&self) -> Result<PaymentMethod, FieldError> {
        match self {
            Self::Chosen(method) => Ok(*method),
            Self::Unset => Err(FieldError::PaymentRequired),
            Self::Unrecognized(value) => Err(FieldError::PaymentUnknown {
                value: value.clone(),
            }),
        }
    }
}

/// Payment method as the backend names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportPayment {
    /// Card payment
    Online,
    /// Cash on delivery
    Cash,
}

impl From<PaymentMethod> for TransportPayment {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Card => Self::Online,
            PaymentMethod::Cash => Self::Cash,
        }
    }
}

/// Order under construction. Blank text fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    /// Payment selection
    pub payment: PaymentSelection,
    /// Delivery address
    pub address: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone as typed
    pub phone: Option<String>,
    /// Snapshot total
    pub total: Option<Money>,
    /// Snapshot product ids
    pub items: Vec<ProductId>,
}

impl OrderDraft {
    /// Convert into a transport-ready record.
    ///
    /// # Errors
    ///
    /// Every missing field, an unset or unknown payment method, and an empty
    /// item list each contribute one entry to the returned map.
    pub fn finalize(self) -> Result<OrderRecord, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let payment = errors.check(Field::Payment, self.payment.method());
        let address = errors.check(
            Field::Address,
            self.address.ok_or(FieldError::AddressRequired),
        );
        let email = errors.check(Field::Email, self.email.ok_or(FieldError::EmailRequired));
        let phone = errors.check(Field::Phone, self.phone.ok_or(FieldError::PhoneRequired));
        let total = errors.check(Field::Total, self.total.ok_or(FieldError::TotalMissing));
        if self.items.is_empty() {
            errors.insert(Field::Items, FieldError::NoItems);
        }

        match (payment, address, email, phone, total) {
            (Some(payment), Some(address), Some(email), Some(phone), Some(total))
                if errors.is_empty() =>
            {
                Ok(OrderRecord {
                    payment: payment.into(),
                    email,
                    phone: normalize_phone(&phone),
                    address,
                    total,
                    items: self.items,
                })
            },
            _ => Err(errors),
        }
    }
}

/// Finalized order, serialized as the backend's order body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    /// Transport payment method
    pub payment: TransportPayment,
    /// Contact email
    pub email: String,
    /// Normalized phone
    pub phone: String,
    /// Delivery address
    pub address: String,
    /// Order total
    pub total: Money,
    /// Ordered product ids
    pub items: Vec<ProductId>,
}

/// Backend acknowledgement of a placed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Backend order id
    pub order_id: String,
    /// Amount charged
    pub total: Money,
}
