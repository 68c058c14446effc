//! # Client Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order API Error Categories                         │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Rejected (422 + map)   │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Server (other status)  │ │
//! │  │                 │  │                 │  │  Decode                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  Local          │  Busy: a submission is already in flight          │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for order API calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Shown when the backend gives nothing more specific.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid API configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// The backend refused the payload; messages are shown as received.
    #[error("{message}")]
    Rejected {
        message: String,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    #[error("A submission is already in progress")]
    Busy,
}

impl ClientError {
    /// Message for the operator banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } => message.clone(),
            ClientError::Server { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Busy => self.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// Field-level messages, empty unless the server rejected the payload.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            ClientError::Rejected { field_errors, .. } => field_errors.clone(),
            _ => BTreeMap::new(),
        }
    }
}

// =============================================================================
// Error Body
// =============================================================================

/// `{"message": "...", "errors": {"field": ["msg", ...]}}`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    /// Parses a failure body; anything that is not the expected shape
    /// yields an empty body.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// Top-level message, falling back to the first field message.
    pub fn headline(&self) -> Option<String> {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.errors.values().flatten().next().cloned())
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_headline() {
        let body = ErrorBody::parse(r#"{"message":"The given data was invalid.","errors":{"paid_amount":["Too much"]}}"#);
        assert_eq!(body.headline().as_deref(), Some("The given data was invalid."));
        assert_eq!(body.errors["paid_amount"], vec!["Too much".to_string()]);

        let body = ErrorBody::parse(r#"{"errors":{"account_id":["Select an account"]}}"#);
        assert_eq!(body.headline().as_deref(), Some("Select an account"));

        let body = ErrorBody::parse("<html>oops</html>");
        assert!(body.headline().is_none());
    }

    #[test]
    fn test_user_message_fallback() {
        assert_eq!(ClientError::Timeout(30).user_message(), GENERIC_FAILURE);
        assert_eq!(
            ClientError::Server { status: 500, message: String::new() }.user_message(),
            GENERIC_FAILURE
        );
        let rejected = ClientError::Rejected {
            message: "Stock changed".to_string(),
            field_errors: BTreeMap::new(),
        };
        assert_eq!(rejected.user_message(), "Stock changed");
    }
}
