//! # Single-Flight Submitter
//!
//! Wraps an [`OrderApi`] so that at most one request is outstanding. A
//! second call while one is in flight fails immediately with
//! [`ClientError::Busy`] instead of queueing, which is what disabling the
//! submit button does on screen.
//!
//! ```text
//!  submit ──try_lock──┬── acquired ──► api call ──► guard dropped
//!                     └── held ──────► Err(Busy)
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use shelf_core::{NewSupplier, OrderPayload, PaymentRecord, Supplier};

use crate::client::{OrderApi, OrderCreated, PaymentRecorded};
use crate::error::{ClientError, ClientResult};

pub struct Submitter {
    api: Arc<dyn OrderApi>,
    in_flight: Mutex<()>,
}

impl Submitter {
    pub fn new(api: Arc<dyn OrderApi>) -> Self {
        Self {
            api,
            in_flight: Mutex::new(()),
        }
    }

    /// True while a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    async fn single_flight<T, F>(&self, label: &'static str, call: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            debug!(call = label, "Rejected while another request is in flight");
            ClientError::Busy
        })?;
        call.await
    }

    pub async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<OrderCreated> {
        self.single_flight("submit_order", self.api.submit_order(payload))
            .await
    }

    pub async fn record_payment(
        &self,
        order_id: &str,
        record: &PaymentRecord,
    ) -> ClientResult<PaymentRecorded> {
        self.single_flight("record_payment", self.api.record_payment(order_id, record))
            .await
    }

    pub async fn create_supplier(&self, supplier: &NewSupplier) -> ClientResult<Supplier> {
        self.single_flight("create_supplier", self.api.create_supplier(supplier))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_payload;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Blocks inside `submit_order` until released.
    struct GatedApi {
        started: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OrderApi for GatedApi {
        async fn submit_order(&self, _payload: &OrderPayload) -> ClientResult<OrderCreated> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            Ok(OrderCreated {
                id: "ord-1".to_string(),
                invoice_no: None,
                message: None,
            })
        }

        async fn record_payment(
            &self,
            _order_id: &str,
            _record: &PaymentRecord,
        ) -> ClientResult<PaymentRecorded> {
            Err(ClientError::Transport("unused".to_string()))
        }

        async fn create_supplier(&self, _supplier: &NewSupplier) -> ClientResult<Supplier> {
            Err(ClientError::Transport("unused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_busy() {
        let api = Arc::new(GatedApi {
            started: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let submitter = Submitter::new(api.clone());
        let payload = sample_payload();

        let first = submitter.submit_order(&payload);
        let second = async {
            api.started.notified().await;
            assert!(submitter.is_busy());
            let result = submitter.submit_order(&payload).await;
            api.release.notify_one();
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap().id, "ord-1");
        assert!(matches!(second, Err(ClientError::Busy)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert!(!submitter.is_busy());
    }

    #[tokio::test]
    async fn test_guard_released_after_failure() {
        let api = Arc::new(GatedApi {
            started: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let submitter = Submitter::new(api);
        let record = PaymentRecord {
            amount: shelf_core::Money::from_major(1),
            payment_date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            payment_method: shelf_core::PaymentMethod::Cash,
            notes: None,
            account_id: "acc".to_string(),
        };

        assert!(submitter.record_payment("o", &record).await.is_err());
        assert!(!submitter.is_busy());
    }
}
