//! HTTP implementation of [`StorefrontApi`] over `reqwest`.

use super::{StorefrontApi, TransportError};
use crate::config::WidgetConfig;
use crate::order::{OrderConfirmation, OrderRecord};
use crate::product::{Category, Money, Price, Product, ProductId};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// List envelope returned by collection endpoints
#[derive(Debug, Deserialize)]
struct ApiList<T> {
    #[serde(default)]
    total: usize,
    items: Vec<T>,
}

/// Product as the backend sends it; `image` is a CDN-relative path
#[derive(Debug, Deserialize)]
struct ApiProduct {
    id: ProductId,
    title: String,
    description: String,
    image: String,
    category: Category,
    price: Price,
}

impl ApiProduct {
    fn into_product(self, cdn_url: &str) -> Product {
        Product {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            image: join_url(cdn_url, &self.image),
            price: self.price,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiOrderResponse {
    id: String,
    total: Money,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Backend client
///
/// ```no_run
/// use storefront_widget::api::{HttpStorefrontApi, StorefrontApi};
/// use storefront_widget::config::WidgetConfig;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let api = HttpStorefrontApi::new(&WidgetConfig::from_env()?);
/// let products = api.fetch_catalog().await?;
/// println!("{} products", products.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: reqwest::Client,
    api_url: String,
    cdn_url: String,
}

impl HttpStorefrontApi {
    /// Client with a default `reqwest::Client`
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &WidgetConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            cdn_url: config.cdn_url.clone(),
        }
    }

    #[tracing::instrument(skip(self), fields(api_url = %self.api_url))]
    async fn get_products(&self) -> Result<Vec<Product>, TransportError> {
        let request = self.client.get(join_url(&self.api_url, "product"));
        let list: ApiList<ApiProduct> = execute(request).await?;

        tracing::debug!(
            total = list.total,
            received = list.items.len(),
            "Catalog fetched"
        );

        Ok(list
            .items
            .into_iter()
            .map(|item| item.into_product(&self.cdn_url))
            .collect())
    }

    #[tracing::instrument(skip(self, order), fields(api_url = %self.api_url, items = order.items.len()))]
    async fn post_order(&self, order: OrderRecord) -> Result<OrderConfirmation, TransportError> {
        let request = self
            .client
            .post(join_url(&self.api_url, "order"))
            .json(&order);
        let response: ApiOrderResponse = execute(request).await?;

        Ok(OrderConfirmation {
            order_id: response.id,
            total: response.total,
        })
    }
}

impl StorefrontApi for HttpStorefrontApi {
    fn fetch_catalog(&self) -> LocalBoxFuture<'_, Result<Vec<Product>, TransportError>> {
        self.get_products().boxed_local()
    }

    fn submit_order(
        &self,
        order: OrderRecord,
    ) -> LocalBoxFuture<'_, Result<OrderConfirmation, TransportError>> {
        self.post_order(order).boxed_local()
    }
}

async fn execute<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, TransportError> {
    let response = request
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    if !status.is_success() {
        let error = error_from_body(status.as_u16(), body);
        tracing::warn!(status = status.as_u16(), error = ?error, "Backend returned an error");
        return Err(error);
    }

    serde_json::from_str(&body).map_err(|e| TransportError::Malformed(e.to_string()))
}

fn error_from_body(status: u16, body: String) -> TransportError {
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(ApiErrorBody { error }) => TransportError::Rejected { reason: error },
        Err(_) => TransportError::Status { status, body },
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
