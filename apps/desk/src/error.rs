//! # Desk Error Type
//!
//! Unified error type for session operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Error Flow in the Desk                            │
//! │                                                                         │
//! │  OrderSession operation                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rule violation?  ─── CoreError / ValidationError ──┐                  │
//! │         │                                           │                  │
//! │         ▼                                           ▼                  │
//! │  Backend refusal? ─── ClientError::Rejected ───── ApiError ───► banner │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error leaves the session as it was, so the operator can fix the
//! input and try again.

use std::collections::BTreeMap;

use serde::Serialize;
use shelf_api::{ClientError, GENERIC_FAILURE};
use shelf_core::{CoreError, ValidationError};

use crate::state::ConfigError;

/// What the operator sees when an operation fails.
///
/// ```json
/// {
///   "code": "REJECTED",
///   "message": "The given data was invalid.",
///   "fieldErrors": { "paid_amount": ["..."] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages from the order backend
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced line or catalog entry does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Operation not allowed in the current entry mode or state
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// Payment input error
    PaymentError,

    /// Backend refused the payload (field errors attached)
    Rejected,

    /// Backend failed or could not be reached
    Network,

    /// A request is already in flight
    Busy,

    /// Bad configuration
    Config,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn business(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessLogic, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            ValidationError::ExceedsDue { .. } => ErrorCode::PaymentError,
            _ => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::NotInCatalog { kind, ref id } => ApiError::not_found(kind, id),
            CoreError::PriceLocked => ApiError::business(err.to_string()),
            CoreError::ManualPaymentDisabled => {
                ApiError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::CartTooLarge { .. } => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected {
                message,
                field_errors,
            } => ApiError {
                code: ErrorCode::Rejected,
                message,
                field_errors,
            },
            ClientError::Busy => ApiError::new(ErrorCode::Busy, err.to_string()),
            ClientError::InvalidConfig(_) | ClientError::InvalidUrl(_) => {
                ApiError::new(ErrorCode::Config, err.to_string())
            }
            ClientError::Decode(ref e) => {
                tracing::error!("Order API response could not be decoded: {}", e);
                ApiError::new(ErrorCode::Internal, GENERIC_FAILURE)
            }
            other => {
                tracing::error!("Order API call failed: {}", other);
                ApiError::new(ErrorCode::Network, other.user_message())
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::Config, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        for (field, messages) in &self.field_errors {
            write!(f, "\n  {}: {}", field, messages.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_keeps_field_errors() {
        let mut fields = BTreeMap::new();
        fields.insert("account_id".to_string(), vec!["Account is closed".to_string()]);
        let err: ApiError = ClientError::Rejected {
            message: "The given data was invalid.".to_string(),
            field_errors: fields,
        }
        .into();

        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "The given data was invalid.");
        assert_eq!(err.field_errors["account_id"], vec!["Account is closed".to_string()]);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "REJECTED");
        assert_eq!(json["fieldErrors"]["account_id"][0], "Account is closed");
    }

    #[test]
    fn test_network_failure_uses_generic_message() {
        let err: ApiError = ClientError::Timeout(30).into();
        assert_eq!(err.code, ErrorCode::Network);
        assert_eq!(err.message, GENERIC_FAILURE);
    }

    #[test]
    fn test_core_error_codes() {
        assert_eq!(ApiError::from(CoreError::PriceLocked).code, ErrorCode::BusinessLogic);
        assert_eq!(
            ApiError::from(CoreError::Validation(ValidationError::EmptyCart)).code,
            ErrorCode::ValidationError
        );
        let missing = ApiError::from(CoreError::NotInCatalog {
            kind: "Customer",
            id: "c9".to_string(),
        });
        assert_eq!(missing.code, ErrorCode::NotFound);
        assert_eq!(missing.message, "Customer not found: c9");
        assert!(serde_json::to_value(&missing).unwrap().get("fieldErrors").is_none());
    }
}
