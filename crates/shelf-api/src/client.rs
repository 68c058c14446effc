//! # Order API Client
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Flow                                     │
//! │                                                                         │
//! │  OrderSession ──► Submitter ──► dyn OrderApi ──► HttpOrderApi           │
//! │                                                    │                    │
//! │                         POST {base}/orders ◄───────┤                    │
//! │            POST {base}/orders/{id}/payments ◄──────┤                    │
//! │                      POST {base}/suppliers ◄───────┘                    │
//! │                                                                         │
//! │  2xx        → decoded body                                             │
//! │  422        → ClientError::Rejected { message, field_errors }          │
//! │  other 4/5xx→ ClientError::Server { status, message }                  │
//! │  no answer  → ClientError::Timeout / Transport                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried. The operator resubmits by hand.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shelf_core::{NewSupplier, OrderPayload, PaymentRecord, Supplier};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult, ErrorBody, GENERIC_FAILURE};

// =============================================================================
// Responses
// =============================================================================

/// Body of a successful create-order call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub id: String,
    #[serde(default)]
    pub invoice_no: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a successful record-payment call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecorded {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Trait
// =============================================================================

/// The order backend as the desk sees it.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<OrderCreated>;

    async fn record_payment(
        &self,
        order_id: &str,
        record: &PaymentRecord,
    ) -> ClientResult<PaymentRecorded>;

    async fn create_supplier(&self, supplier: &NewSupplier) -> ClientResult<Supplier>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

pub struct HttpOrderApi {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl HttpOrderApi {
    pub fn new(settings: ApiSettings) -> ClientResult<Self> {
        settings.validate()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("shelf-desk/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    async fn post<B, R>(&self, segments: &[&str], body: &B) -> ClientResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.settings.endpoint(segments)?;
        let request_id = Uuid::new_v4();
        debug!(%url, %request_id, "POST");

        let mut request = self
            .client
            .post(url.clone())
            .header("X-Request-Id", request_id.to_string())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = &self.settings.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%url, %request_id, error = %e, "Order API request failed");
            if e.is_timeout() {
                ClientError::Timeout(self.settings.timeout_secs)
            } else {
                ClientError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(ClientError::from);
        }

        let body = ErrorBody::parse(&text);
        warn!(%url, %request_id, status = status.as_u16(), "Order API refused request");

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            Err(ClientError::Rejected {
                message: body.headline().unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                field_errors: body.errors,
            })
        } else {
            Err(ClientError::Server {
                status: status.as_u16(),
                message: body.headline().unwrap_or_default(),
            })
        }
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<OrderCreated> {
        let created: OrderCreated = self.post(&["orders"], payload).await?;
        info!(order_id = %created.id, grand = %payload.grand_amount, "Order created");
        Ok(created)
    }

    async fn record_payment(
        &self,
        order_id: &str,
        record: &PaymentRecord,
    ) -> ClientResult<PaymentRecorded> {
        let recorded: PaymentRecorded =
            self.post(&["orders", order_id, "payments"], record).await?;
        info!(order_id, amount = %record.amount, "Payment recorded");
        Ok(recorded)
    }

    async fn create_supplier(&self, supplier: &NewSupplier) -> ClientResult<Supplier> {
        let created: Supplier = self.post(&["suppliers"], supplier).await?;
        info!(supplier_id = %created.id, "Supplier created");
        Ok(created)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
