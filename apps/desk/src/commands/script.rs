//! Script files for replaying an order-entry session.
//!
//! ```json
//! {
//!   "mode": "pos",
//!   "catalog": { "stocks": [...], "customers": [...], "accounts": [...] },
//!   "actions": [ { "action": "add_stock", "stockId": "s-rice" } ]
//! }
//! ```
//!
//! Catalog amounts are integer cents, as the backend snapshot sends them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelf_core::{CatalogSnapshot, EntryMode};

use super::SessionAction;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScript {
    pub mode: EntryMode,
    #[serde(default)]
    pub catalog: CatalogSnapshot,
    #[serde(default)]
    pub actions: Vec<SessionAction>,
}

impl SessionScript {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }
}
