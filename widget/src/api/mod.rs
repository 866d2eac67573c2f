//! Transport boundary.
//!
//! The stores only see [`StorefrontApi`]. [`HttpStorefrontApi`] is the
//! production implementation; tests use [`crate::mocks::MockStorefrontApi`].

mod http;

pub use http::HttpStorefrontApi;

use crate::order::{OrderConfirmation, OrderRecord};
use crate::product::Product;
use futures::future::LocalBoxFuture;
use thiserror::Error;

/// Transport failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The backend refused the request and said why
    #[error("request rejected: {reason}")]
    Rejected {
        /// Backend-supplied reason
        reason: String,
    },

    /// Non-success status without a structured reason
    #[error("request failed with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept for logs and never shown to the user
        body: String,
    },

    /// The request never got a response
    #[error("network error: {0}")]
    Network(String),

    /// The response could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    /// Message to show the user: the backend's reason, else the error text,
    /// else `fallback` when that text is blank.
    ///
    /// A bare status has no readable text; its body may be a proxy error page.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let text = match self {
            Self::Rejected { reason } => reason.as_str(),
            Self::Status { .. } => "",
            Self::Network(message) | Self::Malformed(message) => message.as_str(),
        };
        let text = text.trim();
        if text.is_empty() {
            fallback.to_string()
        } else {
            text.to_string()
        }
    }
}

/// Backend operations the widget depends on
pub trait StorefrontApi {
    /// Fetch the full product list
    fn fetch_catalog(&self) -> LocalBoxFuture<'_, Result<Vec<Product>, TransportError>>;

    /// Place an order
    fn submit_order(
        &self,
        order: OrderRecord,
    ) -> LocalBoxFuture<'_, Result<OrderConfirmation, TransportError>>;
}
