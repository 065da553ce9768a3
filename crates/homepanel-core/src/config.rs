use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Application configuration (`config.toml`).
///
/// This is the operator-facing config: where to listen, where the documents
/// live and which provider endpoints to call. User preferences live in the
/// separate settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local HTTP server
    pub server: ServerConfig,

    /// Document locations
    pub storage: StorageConfig,

    /// Page refresh behaviour
    pub refresh: RefreshConfig,

    /// External provider endpoints
    pub providers: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `reminders.json` and `favorites.json`
    pub data_dir: PathBuf,

    /// Directory holding `settings.json`
    pub settings_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("homepanel")
            .join("data");
        Self {
            data_dir,
            settings_dir: default_config_dir(),
        }
    }
}

impl StorageConfig {
    pub fn settings_path(&self) -> PathBuf {
        self.settings_dir.join("settings.json")
    }

    pub fn reminders_path(&self) -> PathBuf {
        self.data_dir.join("reminders.json")
    }

    pub fn favorites_path(&self) -> PathBuf {
        self.data_dir.join("favorites.json")
    }

    /// Create both directories if they don't exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;
        std::fs::create_dir_all(&self.settings_dir)
            .context("Failed to create settings directory")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between panel refreshes in the browser (0 disables)
    pub interval_seconds: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Primary geocoder (Open-Meteo)
    pub geocoding_url: String,

    /// Fallback geocoder (Nominatim)
    pub nominatim_url: String,

    /// Forecast API (Open-Meteo)
    pub forecast_url: String,

    /// Intraday quotes (Yahoo Finance chart API)
    pub quotes_url: String,

    /// Client identifier sent to the fallback geocoder
    pub user_agent: String,

    pub geocoding_timeout_secs: u64,
    pub fallback_timeout_secs: u64,
    pub forecast_timeout_secs: u64,
    pub quotes_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            forecast_url: "https://api.open-meteo.com".to_string(),
            quotes_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: format!("Homepanel/{} (local)", env!("CARGO_PKG_VERSION")),
            geocoding_timeout_secs: 10,
            fallback_timeout_secs: 12,
            forecast_timeout_secs: 12,
            quotes_timeout_secs: 12,
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("homepanel")
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, with `HOMEPANEL__SECTION__KEY`
    /// environment variables taking precedence over file values.
    pub fn load_from(path: &Path) -> Result<Self> {
        let layered = ::config::Config::builder()
            .add_source(
                ::config::File::from(path.to_path_buf())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix("HOMEPANEL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read config file")?;

        let config: Config = layered
            .try_deserialize()
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.server.port == 0 {
            result.add_error("server.port", "Port cannot be 0");
        }
        if self.server.host.trim().is_empty() {
            result.add_error("server.host", "Host must not be empty");
        } else if self.server.host != "127.0.0.1" && self.server.host != "localhost" {
            result.add_warning(
                "server.host",
                "Dashboard is reachable beyond this machine; it has no authentication",
            );
        }

        if self.refresh.interval_seconds == 0 {
            result.add_warning("refresh.interval_seconds", "Auto refresh disabled (0 seconds)");
        } else if self.refresh.interval_seconds < 10 {
            result.add_warning(
                "refresh.interval_seconds",
                "Refreshing more often than every 10 seconds may hit provider rate limits",
            );
        }

        self.validate_url(&self.providers.geocoding_url, "providers.geocoding_url", &mut result);
        self.validate_url(&self.providers.nominatim_url, "providers.nominatim_url", &mut result);
        self.validate_url(&self.providers.forecast_url, "providers.forecast_url", &mut result);
        self.validate_url(&self.providers.quotes_url, "providers.quotes_url", &mut result);

        if self.providers.user_agent.trim().is_empty() {
            result.add_error(
                "providers.user_agent",
                "The fallback geocoder requires a descriptive client identifier",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }
}
