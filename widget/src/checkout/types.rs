//! Checkout state, actions and environment.

use crate::api::{StorefrontApi, TransportError};
use crate::cart::CartSnapshot;
use crate::config::WidgetConfig;
use crate::event::ContactField;
use crate::order::{OrderConfirmation, OrderDraft, PaymentSelection};
use crate::validation::{self, ValidationErrors};
use std::fmt;
use std::rc::Rc;

/// Where the checkout flow is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CheckoutPhase {
    /// No checkout in progress
    #[default]
    Empty,
    /// Collecting delivery address and payment method
    AddressEntry,
    /// Collecting email and phone
    ContactEntry,
    /// Both phases valid, can submit
    Ready,
    /// Waiting for the backend
    Submitting,
    /// Last submission was rejected; fields kept for retry
    Failed,
}

impl CheckoutPhase {
    /// Stable name for renderers and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::AddressEntry => "address",
            Self::ContactEntry => "contact",
            Self::Ready => "ready",
            Self::Submitting => "submitting",
            Self::Failed => "failed",
        }
    }

    /// Phases in which contact fields can be edited
    #[must_use]
    pub const fn accepts_contact_edits(self) -> bool {
        matches!(self, Self::ContactEntry | Self::Ready | Self::Failed)
    }

    /// Phases from which a submission may start
    #[must_use]
    pub const fn can_submit(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one submission attempt. Results carrying any other token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptToken(pub(crate) u64);

impl fmt::Display for AttemptToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Checkout form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutState {
    /// Current phase
    pub phase: CheckoutPhase,
    /// Delivery address as typed
    pub address: String,
    /// Payment selection
    pub payment: PaymentSelection,
    /// Email as typed
    pub email: String,
    /// Phone as typed
    pub phone: String,
    /// Cart contents captured when checkout started
    pub snapshot: CartSnapshot,
    /// Last address phase result
    pub address_errors: ValidationErrors,
    /// Last contact phase result
    pub contact_errors: ValidationErrors,
    /// Submission in flight, if any
    pub attempt: Option<AttemptToken>,
    /// Reason of the last rejected submission
    pub failure: Option<String>,
    pub(crate) issued: u64,
}

impl CheckoutState {
    /// Both phase maps combined
    #[must_use]
    pub fn errors(&self) -> ValidationErrors {
        self.address_errors.clone().merged(&self.contact_errors)
    }

    /// Current fields as an order draft
    #[must_use]
    pub fn draft(&self) -> OrderDraft {
        OrderDraft {
            payment: self.payment.clone(),
            address: non_blank(&self.address),
            email: non_blank(&self.email),
            phone: non_blank(&self.phone),
            total: Some(self.snapshot.total),
            items: self.snapshot.product_ids.clone(),
        }
    }

    pub(crate) fn validate_address_phase(&self, min_chars: usize) -> ValidationErrors {
        validation::address_phase(&self.address, &self.payment, min_chars)
    }

    pub(crate) fn validate_contact_phase(&self) -> ValidationErrors {
        validation::contact_phase(&self.email, &self.phone)
    }

    /// Clear everything except the token counter
    pub(crate) fn reset(&mut self) {
        let issued = self.issued;
        *self = Self {
            issued,
            ..Self::default()
        };
    }

    pub(crate) fn issue_token(&mut self) -> AttemptToken {
        self.issued += 1;
        let token = AttemptToken(self.issued);
        self.attempt = Some(token);
        token
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Checkout actions
#[derive(Debug)]
pub enum CheckoutAction {
    /// Open the form for a cart snapshot
    Start {
        /// Purchasable cart contents
        snapshot: CartSnapshot,
    },
    /// Delivery address typed
    EditAddress(String),
    /// Payment control clicked
    SelectPayment(String),
    /// Leave the address phase
    Advance,
    /// Contact field typed
    EditContact {
        /// Which field
        field: ContactField,
        /// New value
        value: String,
    },
    /// Place the order
    Submit,
    /// Backend answered a submission
    SubmissionResolved {
        /// Attempt the answer belongs to
        token: AttemptToken,
        /// What the backend said
        outcome: Result<OrderConfirmation, TransportError>,
    },
    /// Abandon the flow
    Close,
}

/// Checkout dependencies
#[derive(Clone)]
pub struct CheckoutEnvironment {
    /// Order transport
    pub api: Rc<dyn StorefrontApi>,
    /// Widget settings
    pub config: WidgetConfig,
}

impl CheckoutEnvironment {
    /// Bundle a transport and settings
    #[must_use]
    pub fn new(api: Rc<dyn StorefrontApi>, config: WidgetConfig) -> Self {
        Self { api, config }
    }
}

impl fmt::Debug for CheckoutEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
