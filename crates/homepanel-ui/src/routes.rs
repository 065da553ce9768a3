use std::convert::Infallible;

use serde::de::DeserializeOwned;
use warp::Filter;

use crate::context::AppContext;
use crate::handlers;

const FORM_LIMIT: u64 = 16 * 1024;

fn with_ctx(ctx: AppContext) -> impl Filter<Extract = (AppContext,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn form<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(FORM_LIMIT).and(warp::body::form())
}

/// Every route the dashboard serves.
pub fn routes(
    ctx: AppContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let index = warp::get()
        .and(warp::path::end())
        .and(warp::query::<handlers::IndexQuery>())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::index);

    let geocode_test = warp::get()
        .and(warp::path!("geocode" / "test"))
        .and(warp::query::<handlers::GeocodeTestQuery>())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::geocode_test);

    let panels = panel_routes(ctx.clone());

    let settings = warp::post()
        .and(warp::path!("settings"))
        .and(form::<handlers::SettingsForm>())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::save_settings);

    let city = warp::post()
        .and(warp::path!("settings" / "city"))
        .and(form::<handlers::CityForm>())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::update_city);

    let tickers = warp::post()
        .and(warp::path!("settings" / "tickers"))
        .and(form::<handlers::TickersForm>())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::save_tickers);

    let reminders = reminder_routes(ctx.clone());
    let favorites = favorite_routes(ctx);

    index
        .or(geocode_test)
        .unify()
        .or(panels)
        .unify()
        .or(settings)
        .unify()
        .or(city)
        .unify()
        .or(tickers)
        .unify()
        .or(reminders)
        .unify()
        .or(favorites)
        .unify()
        .with(warp::trace::request())
}

fn panel_routes(
    ctx: AppContext,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    let clock = warp::path!("panels" / "clock")
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::clock_fragment);

    let weather = warp::path!("panels" / "weather")
        .and(warp::query::<handlers::ManualQuery>())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::weather_fragment);

    let stocks = warp::path!("panels" / "stocks")
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::stocks_fragment);

    let reminders = warp::path!("panels" / "reminders")
        .and(with_ctx(ctx))
        .and_then(handlers::reminders_fragment);

    warp::get().and(
        clock
            .or(weather)
            .unify()
            .or(stocks)
            .unify()
            .or(reminders)
            .unify(),
    )
}

fn reminder_routes(
    ctx: AppContext,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    let add = warp::post()
        .and(warp::path!("reminders"))
        .and(form::<handlers::ReminderForm>())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::add_reminder);

    let delete = warp::post()
        .and(warp::path!("reminders" / usize / "delete"))
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::delete_reminder);

    let export = warp::get()
        .and(warp::path!("reminders" / "export.csv"))
        .and(with_ctx(ctx))
        .and_then(handlers::export_reminders);

    add.or(delete).unify().or(export).unify()
}

fn favorite_routes(
    ctx: AppContext,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    let add = warp::post()
        .and(warp::path!("favorites"))
        .and(form::<handlers::FavoriteForm>())
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::add_favorite);

    let delete = warp::post()
        .and(warp::path!("favorites" / usize / "delete"))
        .and(with_ctx(ctx))
        .and_then(handlers::delete_favorite);

    add.or(delete).unify()
}
