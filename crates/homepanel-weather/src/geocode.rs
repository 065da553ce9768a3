//! Forward geocoding: free-text city -> coordinates.
//!
//! Open-Meteo is asked first (fast, no key). Nominatim (OpenStreetMap) is
//! consulted only when Open-Meteo fails outright or has no hit; it is never
//! used to second-guess a non-empty primary answer.

use std::time::Duration;

use homepanel_core::ProviderConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::types::{GeoPoint, GeocodeSource, Resolution, WeatherError};

/// Clean up a user-entered place so geocoders tokenize it properly:
/// slashes become `", "`, whitespace runs collapse, ends are trimmed.
pub fn sanitize_city_input(input: &str) -> String {
    input
        .trim()
        .replace('/', ", ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Deserialize)]
struct OpenMeteoSearchResponse {
    #[serde(default)]
    results: Option<Vec<OpenMeteoPlace>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoPlace {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: Coordinate,
    lon: Coordinate,
}

/// Nominatim returns coordinates as strings; accept numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Result<f64, WeatherError> {
        match self {
            Coordinate::Number(n) => Ok(*n),
            Coordinate::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| WeatherError::Parse(format!("invalid coordinate '{}'", s))),
        }
    }
}

async fn get_json(request: reqwest::RequestBuilder) -> Result<Value, WeatherError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WeatherError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| WeatherError::Parse(e.to_string()))
}

/// Open-Meteo geocoding API client
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    client: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Raw search response
    pub async fn search_raw(&self, query: &str, count: u32) -> Result<Value, WeatherError> {
        let url = format!("{}/v1/search", self.base_url);
        let request = self.client.get(&url).query(&[
            ("name", query.to_string()),
            ("count", count.to_string()),
            ("language", "en".to_string()),
        ]);
        get_json(request).await
    }

    /// Top hit, if any
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Result<Option<GeoPoint>, WeatherError> {
        let raw = self.search_raw(query, 1).await?;
        let body: OpenMeteoSearchResponse =
            serde_json::from_value(raw).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(body
            .results
            .and_then(|places| places.into_iter().next())
            .map(|p| GeoPoint::new(p.latitude, p.longitude)))
    }
}

/// Nominatim (OpenStreetMap) search API client
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// `user_agent` is required by the Nominatim usage policy.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Raw search response
    pub async fn search_raw(&self, query: &str, limit: u32) -> Result<Value, WeatherError> {
        let url = format!("{}/search", self.base_url);
        let request = self.client.get(&url).query(&[
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", limit.to_string()),
            ("addressdetails", "1".to_string()),
        ]);
        get_json(request).await
    }

    /// Top hit, if any
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Result<Option<GeoPoint>, WeatherError> {
        let raw = self.search_raw(query, 1).await?;
        let places: Vec<NominatimPlace> =
            serde_json::from_value(raw).map_err(|e| WeatherError::Parse(e.to_string()))?;

        match places.first() {
            Some(place) => Ok(Some(GeoPoint::new(place.lat.value()?, place.lon.value()?))),
            None => Ok(None),
        }
    }
}

/// Raw answers from both geocoders, for the "test this location" view
#[derive(Debug, Clone)]
pub struct GeocodeProbe {
    pub sanitized: String,
    pub open_meteo: Value,
    pub nominatim: Value,
}

/// Number of candidates shown by the probe
const PROBE_LIMIT: u32 = 3;

/// City resolver with provider fallback
#[derive(Debug, Clone)]
pub struct CityResolver {
    primary: OpenMeteoGeocoder,
    fallback: NominatimGeocoder,
}

impl CityResolver {
    pub fn new(primary: OpenMeteoGeocoder, fallback: NominatimGeocoder) -> Self {
        Self { primary, fallback }
    }

    pub fn from_config(providers: &ProviderConfig) -> Result<Self, WeatherError> {
        let primary = OpenMeteoGeocoder::new(
            &providers.geocoding_url,
            Duration::from_secs(providers.geocoding_timeout_secs),
        )?;
        let fallback = NominatimGeocoder::new(
            &providers.nominatim_url,
            &providers.user_agent,
            Duration::from_secs(providers.fallback_timeout_secs),
        )?;
        Ok(Self::new(primary, fallback))
    }

    /// Resolve free-text city input to coordinates.
    ///
    /// Provider failures are logged and absorbed; both failing is `NotFound`.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, city: &str) -> Resolution {
        let cleaned = sanitize_city_input(city);
        if cleaned.is_empty() {
            return Resolution::NotFound;
        }

        match self.primary.search(&cleaned).await {
            Ok(Some(point)) => {
                tracing::debug!("Open-Meteo resolved '{}'", cleaned);
                return Resolution::Found {
                    point,
                    source: GeocodeSource::OpenMeteo,
                };
            }
            Ok(None) => tracing::debug!("Open-Meteo had no match for '{}'", cleaned),
            Err(e) => tracing::debug!("Open-Meteo geocoding failed: {}", e),
        }

        match self.fallback.search(&cleaned).await {
            Ok(Some(point)) => {
                tracing::info!("Resolved '{}' via Nominatim fallback", cleaned);
                Resolution::Found {
                    point,
                    source: GeocodeSource::Nominatim,
                }
            }
            Ok(None) => {
                tracing::info!("No geocoder could resolve '{}'", cleaned);
                Resolution::NotFound
            }
            Err(e) => {
                tracing::warn!("Nominatim geocoding failed: {}", e);
                Resolution::NotFound
            }
        }
    }

    /// Query both providers directly and return their raw answers.
    pub async fn probe(&self, city: &str) -> GeocodeProbe {
        let sanitized = sanitize_city_input(city);

        let open_meteo = self
            .primary
            .search_raw(&sanitized, PROBE_LIMIT)
            .await
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }));
        let nominatim = self
            .fallback
            .search_raw(&sanitized, PROBE_LIMIT)
            .await
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }));

        GeocodeProbe {
            sanitized,
            open_meteo,
            nominatim,
        }
    }
}
