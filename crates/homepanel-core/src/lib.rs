pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod settings;

pub use app::App;
pub use config::{Config, ProviderConfig, RefreshConfig, ServerConfig, StorageConfig};
pub use document::{JsonDocument, Loaded};
pub use error::{AppError, ConfigError, DocumentError, NetworkError, ReqwestErrorExt};
pub use settings::{Settings, SettingsError, SettingsStore, TemperatureUnit, DEFAULT_TIMEZONE};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Homepanel core initialized");
    Ok(())
}
