//! Core configuration types and data structures

use std::net::SocketAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Minimum HS256 signing key length in bytes
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Longest accepted token lifetime: one year
pub const MAX_TOKEN_TTL_MINUTES: u64 = 525_600;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Token issuance and validation
    pub jwt: JwtConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: String,
    /// Deployment environment; development enables the dev token endpoints
    pub environment: Environment,
}

impl ServerConfig {
    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr.parse().map_err(|e| {
            ConfigError::Validation(format!("Invalid bind address '{}': {}", self.bind_addr, e))
        })
    }
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JwtConfig {
    /// Expected and issued `iss` claim
    pub issuer: String,
    /// Expected and issued `aud` claim
    pub audience: String,
    /// Symmetric HS256 signing key
    pub signing_key: String,
    /// Lifetime of issued tokens
    pub token_ttl_minutes: u64,
    /// Tolerated clock skew when checking expiry
    pub clock_skew_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,
}

impl LoggingConfig {
    /// Parsed tracing level
    pub fn tracing_level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(&self.level)
            .map_err(|_| ConfigError::Validation(format!("Unknown log level '{}'", self.level)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            environment: Environment::Development,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: "CivicOps".to_string(),
            audience: "CivicOps".to_string(),
            signing_key: String::new(),
            token_ttl_minutes: 60,
            clock_skew_seconds: 120,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Check the configuration for values the server cannot start with
    pub fn validate(&self) -> Result<()> {
        self.server.socket_addr()?;

        if self.jwt.signing_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Missing jwt.signing_key".to_string(),
            ));
        }
        if self.jwt.signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ConfigError::Validation(format!(
                "jwt.signing_key must be at least {} bytes",
                MIN_SIGNING_KEY_LEN
            )));
        }
        if self.jwt.issuer.trim().is_empty() || self.jwt.audience.trim().is_empty() {
            return Err(ConfigError::Validation(
                "jwt.issuer and jwt.audience must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.jwt.token_ttl_minutes) {
            return Err(ConfigError::Validation(format!(
                "jwt.token_ttl_minutes must be between 1 and {}",
                MAX_TOKEN_TTL_MINUTES
            )));
        }

        self.logging.tracing_level()?;
        Ok(())
    }
}
