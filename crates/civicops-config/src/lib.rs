//! CivicOps Configuration Management
//!
//! Loads the API server configuration from built-in defaults, an optional
//! TOML file and `CIVICOPS_*` environment variables, then validates it.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    AppConfig, Environment, JwtConfig, LoggingConfig, ServerConfig, MAX_TOKEN_TTL_MINUTES,
    MIN_SIGNING_KEY_LEN,
};
