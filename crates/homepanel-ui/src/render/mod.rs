//! HTML rendering. Everything here is synchronous and works on owned
//! snapshots, so no store lock is held while a page is built.

pub mod chart;
pub mod clock;
pub mod favorites;
pub mod html;
pub mod page;
pub mod reminders;
pub mod stocks;
pub mod weather;

pub use chart::{LineChart, LineSeries};
pub use clock::ClockView;
pub use favorites::render_favorites;
pub use page::{refreshing, render_page, BannerKind, Page, Tab};
pub use reminders::{render_reminder_form, render_reminders, ReminderView};
pub use stocks::{render_stocks, render_ticker_controls, TickerQuote};
pub use weather::{
    render_probe, render_weather, render_weather_controls, FetchFailure, ManualCoordsForm,
    PointOrigin, WeatherView,
};
