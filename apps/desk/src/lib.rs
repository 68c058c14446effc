//! # Shelf Desk Library
//!
//! Order entry for the two sales screens (inventory and POS) on top of
//! `shelf-core`, talking to the order backend through `shelf-api`.
//!
//! ## Module Organization
//! ```text
//! shelf_desk/
//! ├── lib.rs          ◄─── You are here (wiring, logging)
//! ├── session.rs      ◄─── OrderSession: one entry screen
//! ├── receipt.rs      ◄─── Invoice data + text rendering
//! ├── commands/
//! │   ├── mod.rs      ◄─── SessionAction (operator actions as data)
//! │   └── script.rs   ◄─── Replay files
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── config.rs   ◄─── DeskConfig (TOML + SHELF_* env)
//! └── error.rs        ◄─── ApiError shown to the operator
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Desk Startup                                    │
//! │                                                                         │
//! │  1. Initialize Logging ─────► tracing-subscriber with env filter       │
//! │  2. Load DeskConfig ────────► defaults → desk.toml → SHELF_* env       │
//! │  3. Build HttpOrderApi ─────► wrapped in one shared Submitter          │
//! │  4. Open OrderSession ──────► catalog snapshot + entry mode            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod receipt;
pub mod session;
pub mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shelf_api::{HttpOrderApi, Submitter};

use commands::SessionScript;
use error::ApiError;
use session::OrderSession;
use state::DeskConfig;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shelf_desk=trace` - Show trace for the desk only
/// - Default: WARN, with desk and API client at INFO
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,shelf_desk=info,shelf_api=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the one submitter every session of this desk shares.
pub fn build_submitter(config: &DeskConfig) -> Result<Arc<Submitter>, ApiError> {
    let api = HttpOrderApi::new(config.api.clone())?;
    info!(base_url = %config.api.base_url, "Order API client ready");
    Ok(Arc::new(Submitter::new(Arc::new(api))))
}

/// Opens a session for a script and replays its actions.
///
/// A failing action is reported with its 1-based step number.
pub async fn replay(
    script: SessionScript,
    config: &DeskConfig,
    submitter: Arc<Submitter>,
) -> Result<OrderSession, (usize, ApiError)> {
    let mut session = OrderSession::new(script.mode, script.catalog, config.pricing, submitter);
    commands::apply_all(&mut session, script.actions).await?;
    Ok(session)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use shelf_api::{ClientError, ClientResult, OrderApi, OrderCreated, PaymentRecorded};
    use shelf_core::{
        Account, CatalogSnapshot, Customer, Money, NewSupplier, OrderPayload, PaymentRecord,
        StockLot, Supplier,
    };

    /// Records payloads; optionally fails the next call.
    #[derive(Default)]
    pub struct FakeApi {
        orders: Mutex<Vec<OrderPayload>>,
        next_failure: Mutex<Option<ClientError>>,
    }

    impl FakeApi {
        pub fn ok() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn failing(err: ClientError) -> Arc<Self> {
            let api = Self::default();
            *api.next_failure.lock().unwrap() = Some(err);
            Arc::new(api)
        }

        pub fn orders(&self) -> Vec<OrderPayload> {
            self.orders.lock().unwrap().clone()
        }

        fn fail(&self) -> ClientResult<()> {
            match self.next_failure.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl OrderApi for FakeApi {
        async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<OrderCreated> {
            self.fail()?;
            let mut orders = self.orders.lock().unwrap();
            orders.push(payload.clone());
            Ok(OrderCreated {
                id: format!("ord-{}", orders.len()),
                invoice_no: Some(format!("INV-{:04}", orders.len())),
                message: None,
            })
        }

        async fn record_payment(
            &self,
            _order_id: &str,
            _record: &PaymentRecord,
        ) -> ClientResult<PaymentRecorded> {
            self.fail()?;
            Ok(PaymentRecorded {
                id: "pay-1".to_string(),
                message: None,
            })
        }

        async fn create_supplier(&self, supplier: &NewSupplier) -> ClientResult<Supplier> {
            self.fail()?;
            Ok(Supplier {
                id: "sup-new".to_string(),
                name: supplier.name.clone(),
                company: supplier.company.clone(),
            })
        }
    }

    /// Rice at 100 (10 on hand); Karim has 300 usable advance, Rafiq owes.
    pub fn catalog() -> CatalogSnapshot {
        CatalogSnapshot {
            stocks: vec![StockLot {
                stock_id: "s-rice".to_string(),
                product_id: "p-rice".to_string(),
                product_name: "Rice".to_string(),
                brand: Some("Chashi".to_string()),
                variant_id: "v-5kg".to_string(),
                variant_name: None,
                batch_no: "B1".to_string(),
                quantity: 10,
                sale_price: Money::from_major(100),
                shadow_price: None,
            }],
            customers: vec![
                Customer {
                    id: "c-karim".to_string(),
                    name: "Karim".to_string(),
                    phone: None,
                    advance_amount: Money::from_major(500),
                    due_amount: Money::from_major(200),
                },
                Customer {
                    id: "c-owes".to_string(),
                    name: "Rafiq".to_string(),
                    phone: None,
                    advance_amount: Money::zero(),
                    due_amount: Money::from_major(50),
                },
            ],
            suppliers: vec![Supplier {
                id: "sup-1".to_string(),
                name: "Fish Ghat".to_string(),
                company: None,
            }],
            accounts: vec![Account {
                id: "acc-cash".to_string(),
                name: "Main Cash".to_string(),
                account_type: "cash".to_string(),
                balance: Money::zero(),
            }],
        }
    }
}
