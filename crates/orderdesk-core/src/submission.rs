//! # Order Submission
//!
//! The seam between the cart and whatever delivers orders to the backend.
//!
//! ```text
//! Cart::submit() ──► PendingSubmission { payload snapshot } ──send().await──► OrderSubmitter
//!      │                                                                        │
//!      └── cart stays mutable while the request is in flight                    ▼
//!                                                         SubmissionReceipt / TransportError
//! ```
//!
//! Nothing here retries and nothing here touches the cart.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{CoreResult, TransportError};
use crate::payload::OrderPayload;

/// Delivers an order payload.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, payload: &OrderPayload) -> Result<SubmissionReceipt, TransportError>;
}

/// What the backend said about a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// The decoded response body.
    pub response: Value,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new(response: Value) -> Self {
        SubmissionReceipt {
            response,
            submitted_at: Utc::now(),
        }
    }
}

/// A validated payload waiting to be sent.
pub struct PendingSubmission {
    payload: OrderPayload,
    submitter: Arc<dyn OrderSubmitter>,
}

impl PendingSubmission {
    pub fn new(payload: OrderPayload, submitter: Arc<dyn OrderSubmitter>) -> Self {
        PendingSubmission { payload, submitter }
    }

    pub fn payload(&self) -> &OrderPayload {
        &self.payload
    }

    /// Sends the payload once.
    pub async fn send(self) -> CoreResult<SubmissionReceipt> {
        match self.submitter.submit(&self.payload).await {
            Ok(receipt) => {
                info!(
                    total_price = %self.payload.total_price,
                    "Order submitted"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "Order submission failed");
                Err(e.into())
            }
        }
    }
}

impl fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSubmission")
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;

    struct FailingSubmitter;

    #[async_trait]
    impl OrderSubmitter for FailingSubmitter {
        async fn submit(&self, _: &OrderPayload) -> Result<SubmissionReceipt, TransportError> {
            Err(TransportError::Rejected {
                status: 500,
                body: "kitchen closed".into(),
            })
        }
    }

    fn payload() -> OrderPayload {
        OrderPayload {
            products: Vec::new(),
            phone: "1".into(),
            address: "a".into(),
            total_number: 0,
            subtotal_price: Money::zero(),
            total_price: Money::new(20),
            delivery_fee: Money::new(20),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_core_error() {
        let pending = PendingSubmission::new(payload(), Arc::new(FailingSubmitter));
        let err = pending.send().await.unwrap_err();

        match err {
            CoreError::Transport(TransportError::Rejected { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "kitchen closed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_receipt_timestamped() {
        let before = Utc::now();
        let receipt = SubmissionReceipt::new(serde_json::json!({"ok": true}));
        assert!(receipt.submitted_at >= before);
    }
}
