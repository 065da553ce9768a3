//! Weather service for Homepanel
//!
//! Resolves the configured city to coordinates (Open-Meteo with a Nominatim
//! fallback) and fetches current conditions plus a 10-day forecast.

pub mod geocode;
pub mod provider;
pub mod types;

pub use geocode::{
    sanitize_city_input, CityResolver, GeocodeProbe, NominatimGeocoder, OpenMeteoGeocoder,
};
pub use provider::WeatherProvider;
pub use types::*;
