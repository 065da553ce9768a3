use std::sync::Arc;

use crate::error::{AppError, ConfigError};
use crate::Config;

/// Application bootstrap: validated config plus the directories it names.
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from `config.toml`
    pub fn new() -> Result<Self, AppError> {
        let config =
            Config::load().map_err(|e| ConfigError::ParseError(format!("{:#}", e)))?;
        Self::with_config(config)
    }

    /// Create an application instance from an already-loaded config
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        config.storage.ensure_dirs()?;

        tracing::info!(
            "Application initialized (data: {}, settings: {})",
            config.storage.data_dir.display(),
            config.storage.settings_dir.display()
        );

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle for components that outlive the borrow
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }
}
