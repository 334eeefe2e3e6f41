//! Configuration Module
//!
//! Handles application configuration loading, validation, and management.

mod types;

pub use types::{coursewise_home, BackendConfig, Config, LoggingConfig, UiConfig};
