//! # API Settings
//!
//! Where the order backend lives and how long to wait for it. Embedded as
//! the `[api]` section of the desk config file:
//!
//! ```toml
//! [api]
//! base_url = "https://orders.example.com/api"
//! timeout_secs = 30
//! token = "..."
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, ClientResult};

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Order API client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

impl ApiSettings {
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    ///
    /// ```rust
    /// use shelf_api::ApiSettings;
    ///
    /// let settings = ApiSettings { base_url: "https://x.test/api/".into(), ..Default::default() };
    /// let url = settings.endpoint(&["orders", "INV 7", "payments"]).unwrap();
    /// assert_eq!(url.as_str(), "https://x.test/api/orders/INV%207/payments");
    /// ```
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
