//! Weather panel: resolved location, current conditions, 10-day table.

use std::fmt::Write;

use homepanel_core::TemperatureUnit;
use homepanel_weather::{Forecast, GeoPoint, GeocodeProbe, GeocodeSource};

use super::chart::{LineChart, LineSeries};
use super::html::{escape, format_measure, metric, notice};

pub const DEFAULT_MANUAL_LAT: &str = "37.7749";
pub const DEFAULT_MANUAL_LON: &str = "-122.4194";

/// Where the coordinates came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointOrigin {
    Geocoded(GeocodeSource),
    Manual,
}

/// Forecast fetch failure, split into banner text and raw detail
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub message: String,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub enum WeatherView {
    NotFound,
    InvalidCoordinates(String),
    Located {
        city: String,
        point: GeoPoint,
        origin: PointOrigin,
        unit: TemperatureUnit,
        forecast: Result<Forecast, FetchFailure>,
    },
}

/// State of the "enter coordinates manually" form, echoed back as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualCoordsForm {
    pub enabled: bool,
    pub lat: String,
    pub lon: String,
}

impl Default for ManualCoordsForm {
    fn default() -> Self {
        Self {
            enabled: false,
            lat: DEFAULT_MANUAL_LAT.to_string(),
            lon: DEFAULT_MANUAL_LON.to_string(),
        }
    }
}

impl ManualCoordsForm {
    /// Query string that reproduces this form on the panel endpoint.
    pub fn query(&self) -> String {
        if !self.enabled {
            return String::new();
        }
        format!(
            "?manual=1&lat={}&lon={}",
            urlencoding::encode(&self.lat),
            urlencoding::encode(&self.lon)
        )
    }
}

const NOT_FOUND_TIPS: [&str; 3] = [
    "Use 'City, State/Country' (no slashes like '/').",
    "Try the manual coordinate option above if your town is very small.",
    "Examples: 'Rocklin, CA', 'Paris, France', 'Toronto, Canada'.",
];

pub fn render_weather(view: &WeatherView) -> String {
    match view {
        WeatherView::NotFound => {
            let mut out = notice(
                "error",
                "City not found. Try 'San Francisco, CA' or 'San Francisco, United States'.",
            );
            out.push_str("<details><summary>Why might this fail?</summary><ul>");
            for tip in NOT_FOUND_TIPS {
                let _ = write!(out, "<li>{}</li>", escape(tip));
            }
            out.push_str("</ul></details>");
            out
        }
        WeatherView::InvalidCoordinates(msg) => notice("error", msg),
        WeatherView::Located {
            city,
            point,
            origin,
            unit,
            forecast,
        } => {
            let via = match origin {
                PointOrigin::Geocoded(source) => format!(" (via {})", source.name()),
                PointOrigin::Manual => " (manual)".to_string(),
            };
            let mut out = format!(
                r#"<p class="caption">Resolved location ➜ <b>lat:</b> {:.4}, <b>lon:</b> {:.4}{}</p>"#,
                point.latitude, point.longitude, via
            );

            match forecast {
                Err(failure) => {
                    out.push_str(&notice(
                        "error",
                        &format!("Weather fetch failed: {}", failure.message),
                    ));
                    let _ = write!(
                        out,
                        "<details><summary>Show technical details</summary><pre>{}</pre></details>",
                        escape(&failure.detail)
                    );
                }
                Ok(forecast) if forecast.is_empty() => out.push_str(&notice(
                    "warning",
                    "Weather service responded, but no 'current' or 'daily' data for this location.",
                )),
                Ok(forecast) => {
                    out.push_str(&render_current(forecast, *unit));
                    out.push_str(&render_daily(forecast, city));
                }
            }
            out
        }
    }
}

fn render_current(forecast: &Forecast, unit: TemperatureUnit) -> String {
    let Some(current) = &forecast.current else {
        return notice(
            "info",
            "No current conditions available. See forecast below (if present).",
        );
    };

    let condition = current.condition();
    format!(
        r#"<div class="metrics">{}{}{}</div>"#,
        metric(
            "Temp",
            &format_measure(current.temperature, &format!("°{}", unit.letter()))
        ),
        metric(
            "Wind",
            &format_measure(current.wind_speed, &format!(" {}", unit.wind_label()))
        ),
        metric(
            "Conditions",
            &format!("{} {}", condition.glyph(), condition.description())
        )
    )
}

fn render_daily(forecast: &Forecast, city: &str) -> String {
    let days = forecast.days();
    if days.is_empty() {
        return notice("info", "No 10-day forecast data returned for this location.");
    }

    let mut out = format!(
        "<h4>10-Day Forecast for {}</h4><table><thead><tr><th>date</th><th>icon</th><th>high</th><th>low</th><th>precip_prob(%)</th></tr></thead><tbody>",
        escape(city)
    );
    for day in &days {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&day.date),
            day.condition.glyph(),
            format_measure(day.high, ""),
            format_measure(day.low, ""),
            format_measure(day.precipitation_chance, "")
        );
    }
    out.push_str("</tbody></table>");

    let chart = LineChart {
        x_labels: days.iter().map(|d| d.date.clone()).collect(),
        series: vec![
            LineSeries::new("high", days.iter().map(|d| d.high).collect()),
            LineSeries::new("low", days.iter().map(|d| d.low).collect()),
        ],
    };
    if let Some(svg) = chart.to_svg() {
        out.push_str(&svg);
    }
    out
}

/// City form plus the manual-coordinates toggle. Kept outside the
/// refreshed region so polling never clobbers what is being typed.
pub fn render_weather_controls(city: &str, manual: &ManualCoordsForm) -> String {
    let checked = if manual.enabled { " checked" } else { "" };
    format!(
        r#"<form method="post" action="/settings/city" class="row">
  <label>City (tip: 'City, State/Country' is most reliable)
    <input type="text" name="city" value="{city}"></label>
  <button type="submit">Update City</button>
  <button type="submit" formmethod="get" formaction="/geocode/test">Test this location</button>
</form>
<form method="get" action="/" class="row">
  <input type="hidden" name="tab" value="weather">
  <label><input type="checkbox" name="manual" value="1"{checked}> Advanced: enter coordinates manually</label>
  <label>Latitude <input type="text" name="lat" value="{lat}"></label>
  <label>Longitude <input type="text" name="lon" value="{lon}"></label>
  <button type="submit">Apply</button>
</form>"#,
        city = escape(city),
        checked = checked,
        lat = escape(&manual.lat),
        lon = escape(&manual.lon),
    )
}

/// Raw answers from both geocoders for the "Test this location" button.
pub fn render_probe(probe: &GeocodeProbe) -> String {
    let pretty = |value: &serde_json::Value| {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    };

    let mut out = String::from(r#"<div class="notice notice-info">Testing geocoding for: <b>"#);
    out.push_str(&escape(&probe.sanitized));
    out.push_str("</b></div>");
    let _ = write!(
        out,
        "<details><summary>🔍 Raw Open-Meteo results</summary><pre>{}</pre></details>\
         <details><summary>🔍 Raw Nominatim results</summary><pre>{}</pre></details>",
        escape(&pretty(&probe.open_meteo)),
        escape(&pretty(&probe.nominatim))
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use homepanel_weather::{CurrentConditions, DailyForecast};

    fn located(forecast: Result<Forecast, FetchFailure>) -> WeatherView {
        WeatherView::Located {
            city: "Rocklin, CA".to_string(),
            point: GeoPoint::new(38.790734, -121.235783),
            origin: PointOrigin::Geocoded(GeocodeSource::OpenMeteo),
            unit: TemperatureUnit::Fahrenheit,
            forecast,
        }
    }

    #[test]
    fn test_not_found_has_guidance() {
        let html = render_weather(&WeatherView::NotFound);
        assert!(html.contains("City not found. Try &#39;San Francisco, CA&#39;"));
        assert!(html.contains("Why might this fail?"));
    }

    #[test]
    fn test_caption_uses_four_decimals() {
        let html = render_weather(&located(Ok(Forecast::default())));
        assert!(html.contains("<b>lat:</b> 38.7907, <b>lon:</b> -121.2358"));
        assert!(html.contains("no &#39;current&#39; or &#39;daily&#39; data"));
    }

    #[test]
    fn test_current_and_daily() {
        let forecast = Forecast {
            current: Some(CurrentConditions {
                temperature: Some(71.3),
                wind_speed: None,
                weather_code: Some(0),
            }),
            daily: Some(DailyForecast {
                time: vec!["2024-07-04".into(), "2024-07-05".into()],
                weather_code: vec![Some(0), Some(95)],
                temperature_2m_max: vec![Some(95.0), Some(90.0)],
                temperature_2m_min: vec![Some(60.0), None],
                precipitation_probability_max: vec![Some(0.0), Some(40.0)],
            }),
        };

        let html = render_weather(&located(Ok(forecast)));

        assert!(html.contains("71.3°F"));
        assert!(html.contains("☀️ Clear sky"));
        assert!(html.contains("10-Day Forecast for Rocklin, CA"));
        assert!(html.contains("<td>2024-07-05</td><td>⛈️</td><td>90</td><td>—</td><td>40</td>"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_fetch_failure_shows_details() {
        let html = render_weather(&located(Err(FetchFailure {
            message: "The request timed out. Please try again.".into(),
            detail: "operation timed out <after 12s>".into(),
        })));

        assert!(html.contains("Weather fetch failed: The request timed out."));
        assert!(html.contains("operation timed out &lt;after 12s&gt;"));
    }

    #[test]
    fn test_manual_query() {
        let form = ManualCoordsForm {
            enabled: true,
            lat: "51.5".into(),
            lon: "-0.12".into(),
        };
        assert_eq!(form.query(), "?manual=1&lat=51.5&lon=-0.12");
        assert_eq!(ManualCoordsForm::default().query(), "");
    }

    #[test]
    fn test_probe_escapes_json() {
        let probe = GeocodeProbe {
            sanitized: "Rocklin, CA".into(),
            open_meteo: serde_json::json!({"results": [{"name": "<Rocklin>"}]}),
            nominatim: serde_json::json!({"error": "HTTP 502"}),
        };

        let html = render_probe(&probe);

        assert!(html.contains("Testing geocoding for: <b>Rocklin, CA</b>"));
        assert!(html.contains("&lt;Rocklin&gt;"));
        assert!(html.contains("HTTP 502"));
    }
}
