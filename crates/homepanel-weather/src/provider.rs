use std::time::Duration;

use homepanel_core::{ProviderConfig, TemperatureUnit};
use reqwest::Client;
use tracing::instrument;

use crate::types::{Forecast, GeoPoint, WeatherError};

const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";
const FORECAST_DAYS: u32 = 10;

/// Open-Meteo forecast client. There is no fallback provider, so failures
/// are returned to the caller for display.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(providers: &ProviderConfig) -> Result<Self, WeatherError> {
        Self::new(
            &providers.forecast_url,
            Duration::from_secs(providers.forecast_timeout_secs),
        )
    }

    /// Current conditions plus a 10-day daily forecast in the given unit system.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(
        &self,
        point: GeoPoint,
        unit: TemperatureUnit,
    ) -> Result<Forecast, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", point.latitude.to_string()),
                ("longitude", point.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
                ("temperature_unit", temperature_param(unit).to_string()),
                ("windspeed_unit", windspeed_param(unit).to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let forecast: Forecast = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        tracing::debug!(
            "Forecast fetched: current={}, days={}",
            forecast.current.is_some(),
            forecast.days().len()
        );
        Ok(forecast)
    }
}

fn temperature_param(unit: TemperatureUnit) -> &'static str {
    match unit {
        TemperatureUnit::Fahrenheit => "fahrenheit",
        TemperatureUnit::Celsius => "celsius",
    }
}

fn windspeed_param(unit: TemperatureUnit) -> &'static str {
    match unit {
        TemperatureUnit::Fahrenheit => "mph",
        TemperatureUnit::Celsius => "kmh",
    }
}
