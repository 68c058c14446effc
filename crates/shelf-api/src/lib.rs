//! # shelf-api: Order API Client
//!
//! The network side of order entry: submitting orders, recording follow-up
//! payments and creating suppliers against the external order backend.
//!
//! ## Module Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         shelf-api Modules                               │
//! │                                                                         │
//! │  lib.rs ─────────────────► Public API exports                          │
//! │    │                                                                    │
//! │    ├── client.rs ────────► OrderApi trait + reqwest implementation     │
//! │    ├── submitter.rs ─────► One request in flight at a time             │
//! │    ├── config.rs ────────► ApiSettings (base URL, timeout, token)      │
//! │    └── error.rs ─────────► ClientError + server error body             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let api = Arc::new(HttpOrderApi::new(settings)?);
//! let submitter = Submitter::new(api);
//! let created = submitter.submit_order(&draft.to_payload()?).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod submitter;

pub use client::{HttpOrderApi, OrderApi, OrderCreated, PaymentRecorded};
pub use config::ApiSettings;
pub use error::{ClientError, ClientResult, GENERIC_FAILURE};
pub use submitter::Submitter;
