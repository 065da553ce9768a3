//! User preferences document (`settings.json`).

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::JsonDocument;
use crate::error::DocumentError;

pub const DEFAULT_CITY: &str = "Rocklin, CA";
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";
pub const DEFAULT_TICKERS: [&str; 3] = ["AAPL", "MSFT", "NVDA"];

/// Temperature unit preference. Also selects the wind speed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "C")]
    Celsius,
}

impl TemperatureUnit {
    /// Single-letter form used in the document and in labels (`°F`).
    pub fn letter(self) -> &'static str {
        match self {
            Self::Fahrenheit => "F",
            Self::Celsius => "C",
        }
    }

    /// Parse the single-letter form, case-insensitively.
    pub fn from_letter(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "F" => Some(Self::Fahrenheit),
            "C" => Some(Self::Celsius),
            _ => None,
        }
    }

    /// Display label for wind speeds in this unit system.
    pub fn wind_label(self) -> &'static str {
        match self {
            Self::Fahrenheit => "mph",
            Self::Celsius => "km/h",
        }
    }
}

/// The settings singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub city: String,
    pub units: TemperatureUnit,
    pub tickers: [String; 3],
    pub timezone: String,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            units: TemperatureUnit::Fahrenheit,
            tickers: DEFAULT_TICKERS.map(str::to_string),
            timezone: DEFAULT_TIMEZONE.to_string(),
            dark_mode: false,
        }
    }
}

impl Settings {
    /// Resolve the configured IANA timezone.
    ///
    /// Unknown names fall back to the default zone, with a warning.
    pub fn resolve_timezone(&self) -> (Tz, Option<String>) {
        match self.timezone.trim().parse::<Tz>() {
            Ok(tz) => (tz, None),
            Err(_) => {
                tracing::warn!("Unknown timezone '{}', using {}", self.timezone, DEFAULT_TIMEZONE);
                (
                    chrono_tz::America::Los_Angeles,
                    Some(format!(
                        "Unknown timezone '{}'. Showing {} instead.",
                        self.timezone, DEFAULT_TIMEZONE
                    )),
                )
            }
        }
    }
}

/// Trim and upper-case a ticker symbol as typed by the user.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Timezone must not be empty")]
    EmptyTimezone,

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Owns the in-memory settings and persists them on every explicit save.
#[derive(Debug)]
pub struct SettingsStore {
    document: JsonDocument<Settings>,
    settings: Settings,
}

impl SettingsStore {
    /// Open the store, returning any load warning alongside it.
    pub fn open(path: impl Into<PathBuf>) -> (Self, Option<String>) {
        let document = JsonDocument::new(path);
        let loaded = document.load_or(Settings::default);
        (
            Self {
                document,
                settings: loaded.value,
            },
            loaded.warning,
        )
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Sidebar save: dark mode, units and timezone.
    pub fn save_preferences(
        &mut self,
        dark_mode: bool,
        units: TemperatureUnit,
        timezone: &str,
    ) -> Result<(), SettingsError> {
        let timezone = timezone.trim();
        if timezone.is_empty() {
            return Err(SettingsError::EmptyTimezone);
        }

        self.settings.dark_mode = dark_mode;
        self.settings.units = units;
        self.settings.timezone = timezone.to_string();
        self.persist()
    }

    /// Store the city exactly as typed; sanitizing happens at geocoding time.
    pub fn update_city(&mut self, city: &str) -> Result<(), SettingsError> {
        self.settings.city = city.to_string();
        self.persist()
    }

    pub fn save_tickers(&mut self, tickers: [&str; 3]) -> Result<(), SettingsError> {
        self.settings.tickers = tickers.map(normalize_ticker);
        self.persist()
    }

    pub fn persist(&self) -> Result<(), SettingsError> {
        self.document.save(&self.settings)?;
        tracing::info!("Settings saved to {}", self.document.path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "city": "Rocklin, CA",
                "units": "F",
                "tickers": ["AAPL", "MSFT", "NVDA"],
                "timezone": "America/Los_Angeles",
                "dark_mode": false
            })
        );
    }

    #[test]
    fn test_missing_keys_fall_back_per_field() {
        let settings: Settings = serde_json::from_str(r#"{"units": "C"}"#).unwrap();
        assert_eq!(settings.units, TemperatureUnit::Celsius);
        assert_eq!(settings.city, DEFAULT_CITY);
    }

    #[test]
    fn test_wrong_ticker_count_is_rejected() {
        let result = serde_json::from_str::<Settings>(r#"{"tickers": ["AAPL"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unit_letters() {
        assert_eq!(TemperatureUnit::from_letter(" c "), Some(TemperatureUnit::Celsius));
        assert_eq!(TemperatureUnit::from_letter("K"), None);
        assert_eq!(TemperatureUnit::Fahrenheit.wind_label(), "mph");
        assert_eq!(TemperatureUnit::Celsius.wind_label(), "km/h");
    }

    #[test]
    fn test_unknown_timezone_falls_back_with_warning() {
        let settings = Settings {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..Settings::default()
        };
        let (tz, warning) = settings.resolve_timezone();
        assert_eq!(tz, chrono_tz::America::Los_Angeles);
        assert!(warning.unwrap().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_known_timezone_resolves() {
        let settings = Settings {
            timezone: "Europe/London".to_string(),
            ..Settings::default()
        };
        let (tz, warning) = settings.resolve_timezone();
        assert_eq!(tz, chrono_tz::Europe::London);
        assert!(warning.is_none());
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let (mut store, warning) = SettingsStore::open(&path);
        assert!(warning.is_none());
        store.update_city("Paris/France").unwrap();
        store.save_tickers([" tsla ", "", "amd"]).unwrap();
        store
            .save_preferences(true, TemperatureUnit::Celsius, "Europe/Paris")
            .unwrap();

        let (reopened, warning) = SettingsStore::open(&path);
        assert!(warning.is_none());
        assert_eq!(reopened.get(), store.get());
        assert_eq!(reopened.get().city, "Paris/France");
        assert_eq!(reopened.get().tickers, ["TSLA".to_string(), String::new(), "AMD".to_string()]);
        assert!(reopened.get().dark_mode);
    }

    #[test]
    fn test_corrupt_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json at all").unwrap();

        let (store, warning) = SettingsStore::open(&path);

        assert_eq!(store.get(), &Settings::default());
        assert!(warning.unwrap().contains("settings.json"));
    }

    #[test]
    fn test_empty_timezone_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, _) = SettingsStore::open(dir.path().join("settings.json"));

        let result = store.save_preferences(false, TemperatureUnit::Fahrenheit, "   ");

        assert!(matches!(result, Err(SettingsError::EmptyTimezone)));
        assert!(!dir.path().join("settings.json").exists());
    }
}
