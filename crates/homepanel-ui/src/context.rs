//! Shared state handed to every request handler.
//!
//! Stores sit behind `parking_lot` mutexes. Handlers copy out what they need
//! and release the lock before any network call.

use std::sync::Arc;

use parking_lot::Mutex;

use homepanel_core::{Config, Settings, SettingsStore};
use homepanel_services::{FavoriteStore, ReminderStore, StockClient};
use homepanel_weather::{CityResolver, WeatherProvider};

use crate::error::UiError;

/// Cheap to clone; all clones share the same stores and clients.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<Inner>,
}

struct Inner {
    config: Arc<Config>,
    settings: Mutex<SettingsStore>,
    reminders: Mutex<ReminderStore>,
    favorites: Mutex<FavoriteStore>,
    resolver: CityResolver,
    weather: WeatherProvider,
    stocks: StockClient,
    /// Load warnings not yet shown on a page
    pending_warnings: Mutex<Vec<String>>,
}

impl AppContext {
    /// Open the three documents and build the provider clients.
    pub fn from_config(config: Arc<Config>) -> Result<Self, UiError> {
        let (settings, settings_warning) = SettingsStore::open(config.storage.settings_path());
        let (reminders, reminders_warning) =
            ReminderStore::open(config.storage.reminders_path());
        let (favorites, favorites_warning) =
            FavoriteStore::open(config.storage.favorites_path());

        let resolver = CityResolver::from_config(&config.providers)?;
        let weather = WeatherProvider::from_config(&config.providers)?;
        let stocks = StockClient::from_config(&config.providers)?;

        let pending_warnings: Vec<String> = [settings_warning, reminders_warning, favorites_warning]
            .into_iter()
            .flatten()
            .collect();

        if !pending_warnings.is_empty() {
            tracing::warn!("{} document(s) fell back to defaults", pending_warnings.len());
        }

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                settings: Mutex::new(settings),
                reminders: Mutex::new(reminders),
                favorites: Mutex::new(favorites),
                resolver,
                weather,
                stocks,
                pending_warnings: Mutex::new(pending_warnings),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Snapshot of the current settings
    pub fn settings(&self) -> Settings {
        self.inner.settings.lock().get().clone()
    }

    pub fn settings_store(&self) -> &Mutex<SettingsStore> {
        &self.inner.settings
    }

    pub fn reminders(&self) -> &Mutex<ReminderStore> {
        &self.inner.reminders
    }

    pub fn favorites(&self) -> &Mutex<FavoriteStore> {
        &self.inner.favorites
    }

    pub fn resolver(&self) -> &CityResolver {
        &self.inner.resolver
    }

    pub fn weather(&self) -> &WeatherProvider {
        &self.inner.weather
    }

    pub fn stocks(&self) -> &StockClient {
        &self.inner.stocks
    }

    /// Load warnings, handed out once.
    pub fn take_warnings(&self) -> Vec<String> {
        std::mem::take(&mut *self.inner.pending_warnings.lock())
    }
}
