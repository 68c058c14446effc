//! # State Module
//!
//! Read-only settings the desk is started with. Per-screen mutable state
//! lives in [`crate::session::OrderSession`].

mod config;

pub use config::{ConfigError, DeskConfig, PricingDefaults, StoreSettings};
