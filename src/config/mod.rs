//! Configuration management.
//!
//! # Responsibilities
//! - Define the client configuration schema (serde)
//! - Load and parse TOML config files
//! - Validate semantic correctness after parse

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ApiConfig, ClientConfig, MonitoringConfig, SecurityConfig, StorageConfig, TimeoutConfig,
    TranslationConfig,
};
pub use validation::{validate_config, ValidationError};
