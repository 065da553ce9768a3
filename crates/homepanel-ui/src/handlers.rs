//! Request handlers. Mutations follow POST/redirect/GET and report their
//! outcome through the `notice` / `alert` query parameters.

use std::convert::Infallible;

use chrono::NaiveDate;
use serde::Deserialize;
use warp::http::{header, StatusCode};
use warp::reply::Response;
use warp::Reply;

use homepanel_core::TemperatureUnit;
use homepanel_services::{reminders_to_csv, REMINDERS_CSV_FILENAME};
use homepanel_weather::GeocodeProbe;

use crate::context::AppContext;
use crate::error::UiError;
use crate::panels;
use crate::render::{
    refreshing, render_page, render_probe, render_reminder_form, render_ticker_controls,
    render_weather_controls, BannerKind, ManualCoordsForm, Page, Tab,
};

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub tab: Option<String>,
    pub notice: Option<String>,
    pub alert: Option<String>,
    #[serde(flatten)]
    pub manual: ManualQuery,
}

#[derive(Debug, Default, Deserialize)]
pub struct ManualQuery {
    pub manual: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl ManualQuery {
    fn form(&self) -> ManualCoordsForm {
        let defaults = ManualCoordsForm::default();
        ManualCoordsForm {
            enabled: self.manual.as_deref().is_some_and(|m| !m.is_empty() && m != "0"),
            lat: self.lat.clone().unwrap_or(defaults.lat),
            lon: self.lon.clone().unwrap_or(defaults.lon),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeTestQuery {
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    pub dark_mode: Option<String>,
    pub units: Option<String>,
    #[serde(default)]
    pub timezone: String,
    pub tab: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CityForm {
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TickersForm {
    #[serde(default)]
    pub t1: String,
    #[serde(default)]
    pub t2: String,
    #[serde(default)]
    pub t3: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReminderForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub due: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FavoriteForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Outcome of a mutation, carried to the next page view.
enum Flash {
    Notice(String),
    Alert(String),
    Nothing,
}

impl From<Result<String, UiError>> for Flash {
    fn from(result: Result<String, UiError>) -> Self {
        match result {
            Ok(msg) => Flash::Notice(msg),
            Err(e) => Flash::Alert(e.user_message()),
        }
    }
}

fn redirect(tab: Tab, flash: Flash) -> Response {
    let mut location = format!("/?tab={}", tab.slug());
    match flash {
        Flash::Notice(msg) => {
            location.push_str("&notice=");
            location.push_str(&urlencoding::encode(&msg));
        }
        Flash::Alert(msg) => {
            location.push_str("&alert=");
            location.push_str(&urlencoding::encode(&msg));
        }
        Flash::Nothing => {}
    }

    warp::reply::with_header(
        warp::reply::with_status(warp::reply(), StatusCode::SEE_OTHER),
        header::LOCATION,
        location,
    )
    .into_response()
}

async fn tab_body(
    ctx: &AppContext,
    tab: Tab,
    manual: &ManualCoordsForm,
    probe: Option<GeocodeProbe>,
) -> String {
    let settings = ctx.settings();
    match tab {
        Tab::Weather => {
            let mut body = String::from("<h2>⏰ Date &amp; Time</h2>");
            body.push_str(&refreshing("/panels/clock", &panels::clock_panel(ctx)));
            body.push_str("<hr><h2>🌤️ Weather</h2>");
            body.push_str(&render_weather_controls(&settings.city, manual));
            if let Some(probe) = probe {
                body.push_str(&render_probe(&probe));
            }
            let endpoint = format!("/panels/weather{}", manual.query());
            body.push_str(&refreshing(&endpoint, &panels::weather_panel(ctx, manual).await));
            body
        }
        Tab::Stocks => {
            let mut body = String::from("<h2>📈 Stocks</h2>");
            body.push_str(&render_ticker_controls(&settings.tickers));
            body.push_str(&refreshing("/panels/stocks", &panels::stocks_panel(ctx).await));
            body
        }
        Tab::Reminders => {
            let mut body = String::from("<h2>🗒️ Reminders</h2>");
            body.push_str(&refreshing("/panels/reminders", &panels::reminders_panel(ctx)));
            body.push_str("<hr>");
            body.push_str(&render_reminder_form(panels::today(&settings)));
            body
        }
        Tab::Favorites => {
            let mut body = String::from("<h2>🔗 Favorites</h2>");
            body.push_str(&panels::favorites_panel(ctx));
            body
        }
    }
}

async fn page(
    ctx: &AppContext,
    tab: Tab,
    manual: &ManualCoordsForm,
    probe: Option<GeocodeProbe>,
    mut banners: Vec<(BannerKind, String)>,
) -> Response {
    let body = tab_body(ctx, tab, manual, probe).await;

    let mut all_banners: Vec<(BannerKind, String)> = ctx
        .take_warnings()
        .into_iter()
        .map(|w| (BannerKind::Warning, w))
        .collect();
    all_banners.append(&mut banners);

    let settings = ctx.settings();
    let html = render_page(&Page {
        settings: &settings,
        tab,
        refresh_seconds: ctx.config().refresh.interval_seconds,
        banners: all_banners,
        body,
    });
    warp::reply::html(html).into_response()
}

pub async fn index(query: IndexQuery, ctx: AppContext) -> Result<Response, Infallible> {
    let tab = Tab::from_slug(query.tab.as_deref());
    let mut banners = Vec::new();
    if let Some(msg) = query.notice.filter(|m| !m.is_empty()) {
        banners.push((BannerKind::Success, msg));
    }
    if let Some(msg) = query.alert.filter(|m| !m.is_empty()) {
        banners.push((BannerKind::Error, msg));
    }

    Ok(page(&ctx, tab, &query.manual.form(), None, banners).await)
}

pub async fn geocode_test(
    query: GeocodeTestQuery,
    ctx: AppContext,
) -> Result<Response, Infallible> {
    let city = query.city.unwrap_or_else(|| ctx.settings().city);
    let probe = ctx.resolver().probe(&city).await;
    Ok(page(
        &ctx,
        Tab::Weather,
        &ManualCoordsForm::default(),
        Some(probe),
        Vec::new(),
    )
    .await)
}

pub async fn clock_fragment(ctx: AppContext) -> Result<Response, Infallible> {
    Ok(warp::reply::html(panels::clock_panel(&ctx)).into_response())
}

pub async fn weather_fragment(
    query: ManualQuery,
    ctx: AppContext,
) -> Result<Response, Infallible> {
    let html = panels::weather_panel(&ctx, &query.form()).await;
    Ok(warp::reply::html(html).into_response())
}

pub async fn stocks_fragment(ctx: AppContext) -> Result<Response, Infallible> {
    Ok(warp::reply::html(panels::stocks_panel(&ctx).await).into_response())
}

pub async fn reminders_fragment(ctx: AppContext) -> Result<Response, Infallible> {
    Ok(warp::reply::html(panels::reminders_panel(&ctx)).into_response())
}

pub async fn save_settings(form: SettingsForm, ctx: AppContext) -> Result<Response, Infallible> {
    let tab = Tab::from_slug(form.tab.as_deref());
    let result = {
        let mut store = ctx.settings_store().lock();
        let units = form
            .units
            .as_deref()
            .and_then(TemperatureUnit::from_letter)
            .unwrap_or(store.get().units);
        store
            .save_preferences(form.dark_mode.is_some(), units, &form.timezone)
            .map(|()| "Settings saved.".to_string())
            .map_err(UiError::from)
    };
    Ok(redirect(tab, result.into()))
}

pub async fn update_city(form: CityForm, ctx: AppContext) -> Result<Response, Infallible> {
    let result = ctx
        .settings_store()
        .lock()
        .update_city(&form.city)
        .map(|()| format!("City updated to {}", form.city))
        .map_err(UiError::from);
    Ok(redirect(Tab::Weather, result.into()))
}

pub async fn save_tickers(form: TickersForm, ctx: AppContext) -> Result<Response, Infallible> {
    let result = ctx
        .settings_store()
        .lock()
        .save_tickers([form.t1.as_str(), form.t2.as_str(), form.t3.as_str()])
        .map(|()| "Tickers saved.".to_string())
        .map_err(UiError::from);
    Ok(redirect(Tab::Stocks, result.into()))
}

pub async fn add_reminder(form: ReminderForm, ctx: AppContext) -> Result<Response, Infallible> {
    let due = match form.due.trim() {
        "" => panels::today(&ctx.settings()),
        raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                return Ok(redirect(
                    Tab::Reminders,
                    Flash::Alert("Please choose a valid due date.".to_string()),
                ))
            }
        },
    };

    let result = ctx
        .reminders()
        .lock()
        .add(&form.text, due)
        .map(|()| "Reminder added.".to_string())
        .map_err(UiError::from);
    Ok(redirect(Tab::Reminders, result.into()))
}

pub async fn delete_reminder(index: usize, ctx: AppContext) -> Result<Response, Infallible> {
    let flash = match ctx.reminders().lock().delete(index) {
        Ok(Some(_)) => Flash::Notice("Reminder deleted.".to_string()),
        Ok(None) => Flash::Nothing,
        Err(e) => Flash::Alert(UiError::from(e).user_message()),
    };
    Ok(redirect(Tab::Reminders, flash))
}

pub async fn export_reminders(ctx: AppContext) -> Result<Response, Infallible> {
    let csv = {
        let store = ctx.reminders().lock();
        reminders_to_csv(store.all())
    };

    let response = match csv {
        Ok(bytes) => warp::reply::with_header(
            warp::reply::with_header(bytes, header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", REMINDERS_CSV_FILENAME),
        )
        .into_response(),
        Err(e) => {
            tracing::error!("Reminder export failed: {}", e);
            redirect(
                Tab::Reminders,
                Flash::Alert(UiError::from(e).user_message()),
            )
        }
    };
    Ok(response)
}

pub async fn add_favorite(form: FavoriteForm, ctx: AppContext) -> Result<Response, Infallible> {
    let result = ctx
        .favorites()
        .lock()
        .add(&form.name, &form.url)
        .map(|()| "Favorite added.".to_string())
        .map_err(UiError::from);
    Ok(redirect(Tab::Favorites, result.into()))
}

pub async fn delete_favorite(index: usize, ctx: AppContext) -> Result<Response, Infallible> {
    let flash = match ctx.favorites().lock().remove(index) {
        Ok(Some(fav)) => Flash::Notice(format!("Removed {}.", fav.name)),
        Ok(None) => Flash::Nothing,
        Err(e) => Flash::Alert(UiError::from(e).user_message()),
    };
    Ok(redirect(Tab::Favorites, flash))
}
