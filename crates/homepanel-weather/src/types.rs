use serde::{Deserialize, Serialize};

/// Geographic point. Never persisted; recomputed from the settings city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Which geocoder produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeSource {
    OpenMeteo,
    Nominatim,
}

impl GeocodeSource {
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenMeteo => "Open-Meteo",
            Self::Nominatim => "Nominatim",
        }
    }
}

/// Outcome of resolving a city. `NotFound` is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Found {
        point: GeoPoint,
        source: GeocodeSource,
    },
    NotFound,
}

impl Resolution {
    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            Self::Found { point, .. } => Some(*point),
            Self::NotFound => None,
        }
    }
}

/// Weather condition labels mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    ClearSky,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    RimeFog,
    LightDrizzle,
    Drizzle,
    HeavyDrizzle,
    LightRain,
    Rain,
    HeavyRain,
    LightSnow,
    Snow,
    HeavySnow,
    RainShowers,
    HeavyShowers,
    ViolentShowers,
    Thunderstorm,
    ThunderstormHail,
    SevereThunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::ClearSky,
            Some(1) => Self::MainlyClear,
            Some(2) => Self::PartlyCloudy,
            Some(3) => Self::Overcast,
            Some(45) => Self::Fog,
            Some(48) => Self::RimeFog,
            Some(51) => Self::LightDrizzle,
            Some(53) => Self::Drizzle,
            Some(55) => Self::HeavyDrizzle,
            Some(61) => Self::LightRain,
            Some(63) => Self::Rain,
            Some(65) => Self::HeavyRain,
            Some(71) => Self::LightSnow,
            Some(73) => Self::Snow,
            Some(75) => Self::HeavySnow,
            Some(80) => Self::RainShowers,
            Some(81) => Self::HeavyShowers,
            Some(82) => Self::ViolentShowers,
            Some(95) => Self::Thunderstorm,
            Some(96) => Self::ThunderstormHail,
            Some(99) => Self::SevereThunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::ClearSky => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::RimeFog => "Rime fog",
            Self::LightDrizzle => "Light drizzle",
            Self::Drizzle => "Drizzle",
            Self::HeavyDrizzle => "Heavy drizzle",
            Self::LightRain => "Light rain",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy rain",
            Self::LightSnow => "Light snow",
            Self::Snow => "Snow",
            Self::HeavySnow => "Heavy snow",
            Self::RainShowers => "Rain showers",
            Self::HeavyShowers => "Heavy showers",
            Self::ViolentShowers => "Violent showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormHail => "Thunderstorm w/ hail",
            Self::SevereThunderstorm => "Severe thunderstorm/hail",
            Self::Unknown => "Conditions",
        }
    }

    /// Pictographic glyph for quick scanning
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::ClearSky => "☀️",
            Self::MainlyClear => "🌤️",
            Self::PartlyCloudy => "⛅",
            Self::Overcast => "☁️",
            Self::Fog | Self::RimeFog => "🌫️",
            Self::LightDrizzle | Self::Drizzle => "🌦️",
            Self::HeavyDrizzle => "🌧️",
            Self::LightRain | Self::Rain | Self::HeavyRain => "🌧️",
            Self::LightSnow | Self::Snow => "🌨️",
            Self::HeavySnow => "❄️",
            Self::RainShowers | Self::HeavyShowers => "🌧️",
            Self::ViolentShowers => "⛈️",
            Self::Thunderstorm | Self::ThunderstormHail | Self::SevereThunderstorm => "⛈️",
            Self::Unknown => "🌡️",
        }
    }
}

/// Forecast response. Either half may be absent for a location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub daily: Option<DailyForecast>,
}

impl Forecast {
    /// True when the provider answered but had nothing to show
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.daily.is_none()
    }

    /// Daily rows, or an empty list when no forecast came back
    pub fn days(&self) -> Vec<DayForecast> {
        self.daily.as_ref().map(DailyForecast::days).unwrap_or_default()
    }
}

/// Current conditions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(rename = "temperature_2m", default)]
    pub temperature: Option<f64>,
    #[serde(rename = "wind_speed_10m", default)]
    pub wind_speed: Option<f64>,
    #[serde(rename = "weather_code", default)]
    pub weather_code: Option<i32>,
}

impl CurrentConditions {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }
}

/// Column-oriented daily forecast as returned by the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<Option<i32>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

impl DailyForecast {
    /// Zip the columns into rows keyed by `time`; short columns yield `None`.
    pub fn days(&self) -> Vec<DayForecast> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, date)| DayForecast {
                date: date.clone(),
                condition: WeatherCondition::from_wmo_code(
                    self.weather_code.get(i).copied().flatten(),
                ),
                high: self.temperature_2m_max.get(i).copied().flatten(),
                low: self.temperature_2m_min.get(i).copied().flatten(),
                precipitation_chance: self
                    .precipitation_probability_max
                    .get(i)
                    .copied()
                    .flatten(),
            })
            .collect()
    }
}

/// Daily forecast entry
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub date: String,
    pub condition: WeatherCondition,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub precipitation_chance: Option<f64>,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}
