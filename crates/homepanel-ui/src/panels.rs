//! Panel builders: gather data for one panel and render its fragment.
//!
//! Each builder is used both for the full page and for the polling
//! endpoints. External calls run one after another.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use homepanel_core::Settings;
use homepanel_weather::{GeoPoint, Resolution};

use crate::context::AppContext;
use crate::error::UiError;
use crate::render::{
    html::notice, render_favorites, render_reminders, render_stocks, render_weather, ClockView,
    FetchFailure, ManualCoordsForm, PointOrigin, ReminderView, TickerQuote, WeatherView,
};

/// The configured zone, plus a warning when it had to fall back.
pub fn zone(settings: &Settings) -> (Tz, Option<String>) {
    settings.resolve_timezone()
}

/// Today's date in the configured zone
pub fn today(settings: &Settings) -> NaiveDate {
    Utc::now().with_timezone(&zone(settings).0).date_naive()
}

pub fn clock_panel(ctx: &AppContext) -> String {
    let settings = ctx.settings();
    let (tz, warning) = zone(&settings);
    let mut out = ClockView::at(&Utc::now().with_timezone(&tz)).render();
    if let Some(warning) = warning {
        out.push_str(&notice("warning", &warning));
    }
    out
}

/// Parse the manual coordinate form.
pub fn parse_manual(form: &ManualCoordsForm) -> Result<GeoPoint, String> {
    let (Ok(lat), Ok(lon)) = (form.lat.trim().parse::<f64>(), form.lon.trim().parse::<f64>())
    else {
        return Err("Please enter numeric latitude and longitude.".to_string());
    };

    if !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90.".to_string());
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err("Longitude must be between -180 and 180.".to_string());
    }
    Ok(GeoPoint::new(lat, lon))
}

pub async fn weather_view(ctx: &AppContext, manual: &ManualCoordsForm) -> WeatherView {
    let settings = ctx.settings();

    let (point, origin) = if manual.enabled {
        match parse_manual(manual) {
            Ok(point) => (point, PointOrigin::Manual),
            Err(msg) => return WeatherView::InvalidCoordinates(msg),
        }
    } else {
        match ctx.resolver().resolve(&settings.city).await {
            Resolution::Found { point, source } => (point, PointOrigin::Geocoded(source)),
            Resolution::NotFound => return WeatherView::NotFound,
        }
    };

    let forecast = ctx
        .weather()
        .fetch(point, settings.units)
        .await
        .map_err(|e| {
            tracing::warn!("Weather fetch failed: {}", e);
            let detail = e.to_string();
            FetchFailure {
                message: UiError::from(e).user_message(),
                detail,
            }
        });

    WeatherView::Located {
        city: settings.city,
        point,
        origin,
        unit: settings.units,
        forecast,
    }
}

pub async fn weather_panel(ctx: &AppContext, manual: &ManualCoordsForm) -> String {
    render_weather(&weather_view(ctx, manual).await)
}

pub async fn stock_quotes(ctx: &AppContext) -> Vec<TickerQuote> {
    let settings = ctx.settings();
    let mut quotes = Vec::with_capacity(settings.tickers.len());
    for symbol in settings.tickers {
        let outcome = if symbol.is_empty() {
            None
        } else {
            Some(ctx.stocks().fetch(&symbol).await)
        };
        quotes.push(TickerQuote { symbol, outcome });
    }
    quotes
}

pub async fn stocks_panel(ctx: &AppContext) -> String {
    let quotes = stock_quotes(ctx).await;
    let (tz, _) = zone(&ctx.settings());
    render_stocks(&quotes, tz)
}

pub fn reminder_view(ctx: &AppContext) -> ReminderView {
    let today = today(&ctx.settings());
    let store = ctx.reminders().lock();
    ReminderView::from_store(&store, today)
}

pub fn reminders_panel(ctx: &AppContext) -> String {
    render_reminders(&reminder_view(ctx))
}

pub fn favorites_panel(ctx: &AppContext) -> String {
    let favorites = ctx.favorites().lock().all().to_vec();
    render_favorites(&favorites)
}
