//! HTTP transport for the catalog and order endpoints

use std::time::Duration;

use async_trait::async_trait;
use orderdesk_core::{
    CatalogSource, OrderPayload, OrderSubmitter, SubmissionReceipt, TransportError,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

/// Talks JSON to the order backend. Implements both core transport seams.
#[derive(Debug, Clone)]
pub struct HttpOrderService {
    client: Client,
    product_url: String,
    order_url: String,
}

impl HttpOrderService {
    /// Create a new service from the API settings
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            product_url: settings.product_url(),
            order_url: settings.order_url(),
        })
    }

    pub fn product_url(&self) -> &str {
        &self.product_url
    }

    pub fn order_url(&self) -> &str {
        &self.order_url
    }

    /// GET the raw catalog entries
    pub async fn fetch_products(&self) -> ClientResult<Vec<Value>> {
        debug!(url = %self.product_url, "Fetching catalog");
        let response = self.client.get(&self.product_url).send().await?;
        Self::handle_response(response).await
    }

    /// POST an order body and return the decoded response
    pub async fn post_order(&self, payload: &OrderPayload) -> ClientResult<Value> {
        debug!(url = %self.order_url, lines = payload.products.len(), "Posting order");
        let response = self
            .client
            .post(&self.order_url)
            .json(payload)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for HttpOrderService {
    async fn fetch_catalog(&self) -> Result<Vec<Value>, TransportError> {
        let entries = self.fetch_products().await?;
        info!(entries = entries.len(), "Catalog fetched");
        Ok(entries)
    }
}

#[async_trait]
impl OrderSubmitter for HttpOrderService {
    async fn submit(&self, payload: &OrderPayload) -> Result<SubmissionReceipt, TransportError> {
        let response = self.post_order(payload).await?;
        Ok(SubmissionReceipt::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use orderdesk_core::Money;
    use serde_json::json;
    use std::net::SocketAddr;

    async fn spawn(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn service(addr: SocketAddr) -> HttpOrderService {
        HttpOrderService::new(&ApiSettings {
            base_url: format!("http://{addr}"),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    fn payload() -> OrderPayload {
        OrderPayload {
            products: Vec::new(),
            phone: "123456789".into(),
            address: "Main Street 1".into(),
            total_number: 0,
            subtotal_price: Money::zero(),
            total_price: Money::new(20),
            delivery_fee: Money::new(20),
        }
    }

    #[tokio::test]
    async fn test_fetch_catalog() {
        let router = Router::new().route(
            "/product",
            get(|| async { Json(json!([{"id": "cake", "name": "Cake", "price": 9}])) }),
        );
        let addr = spawn(router).await;

        let entries = service(addr).fetch_catalog().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], "cake");
    }

    #[tokio::test]
    async fn test_submit_posts_payload_and_returns_response() {
        let router = Router::new().route(
            "/order",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "id": 7, "phone": body["phone"], "total": body["totalPrice"] }))
            }),
        );
        let addr = spawn(router).await;

        let receipt = service(addr).submit(&payload()).await.unwrap();
        assert_eq!(receipt.response["id"], 7);
        assert_eq!(receipt.response["phone"], "123456789");
        assert_eq!(receipt.response["total"], 20);
    }

    #[tokio::test]
    async fn test_error_status_is_rejected() {
        let router = Router::new().route(
            "/order",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "kitchen closed") }),
        );
        let addr = spawn(router).await;

        let err = service(addr).submit(&payload()).await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Rejected {
                status: 500,
                body: "kitchen closed".into()
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let router = Router::new().route("/product", get(|| async { "<html>menu</html>" }));
        let addr = spawn(router).await;

        let err = service(addr).fetch_catalog().await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_catalog_must_be_an_array() {
        let router = Router::new().route("/product", get(|| async { Json(json!({"id": 1})) }));
        let addr = spawn(router).await;

        let err = service(addr).fetch_catalog().await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = service(addr).fetch_catalog().await.unwrap_err();
        assert!(matches!(err, TransportError::Unreachable(_)));
    }
}
