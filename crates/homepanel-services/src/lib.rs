//! Reminders, favorites and stock quotes for Homepanel.

pub mod export;
pub mod favorite;
mod list_store;
pub mod reminder;
pub mod stock;

pub use export::{reminders_to_csv, ExportError, REMINDERS_CSV_FILENAME};
pub use favorite::{Favorite, FavoriteStore};
pub use reminder::{Reminder, ReminderStore, StoreError};
pub use stock::{combine_series, CombinedSeries, IntradaySeries, QuoteOutcome, StockClient, StockError};
