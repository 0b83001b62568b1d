//! Configuration manager implementation

use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, Environment, File};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    types::AppConfig,
};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "civicops.toml";

/// Environment variable prefix, e.g. `CIVICOPS_JWT__SIGNING_KEY`
pub const ENV_PREFIX: &str = "CIVICOPS";

/// Configuration manager
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Whether a missing file is an error
    required: bool,
    /// Environment prefix
    env_prefix: String,
    /// Replaces the process environment when set
    env_overrides: Option<HashMap<String, String>>,
}

impl ConfigManager {
    /// Create a new configuration manager using `civicops.toml` if present
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            required: false,
            env_prefix: ENV_PREFIX.to_string(),
            env_overrides: None,
        }
    }

    /// Create with custom config path; the file must exist
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            required: true,
            ..Self::new()
        }
    }

    /// Read environment values from `vars` instead of the process environment
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    /// Load and validate configuration.
    ///
    /// Sources, lowest precedence first: defaults, the TOML file, then
    /// environment variables.
    pub fn load_config(&self) -> Result<AppConfig> {
        if self.required && !self.config_path.exists() {
            return Err(ConfigError::NotFound(
                self.config_path.display().to_string(),
            ));
        }

        let environment = Environment::with_prefix(&self.env_prefix)
            .prefix_separator("_")
            .separator("__")
            .source(self.env_overrides.clone());

        let builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(environment);

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        self.validate_config(&app_config)?;

        debug!(
            path = %self.config_path.display(),
            environment = ?app_config.server.environment,
            "configuration loaded"
        );
        Ok(app_config)
    }

    /// Validate configuration
    pub fn validate_config(&self, config: &AppConfig) -> Result<()> {
        config.validate()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
