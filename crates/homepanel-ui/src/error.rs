//! UI-layer errors and their mapping onto `homepanel_core::AppError`.

use homepanel_core::{AppError, NetworkError, ReqwestErrorExt, SettingsError};
use homepanel_services::{ExportError, StockError, StoreError};
use homepanel_weather::WeatherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Quote service error: {0}")]
    Stock(#[from] StockError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Could not resolve listen address {0}")]
    Address(String),

    #[error("Server error: {0}")]
    Server(#[from] warp::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UiError {
    /// Text for the page banner.
    pub fn user_message(self) -> String {
        AppError::from(self).user_message()
    }
}

impl From<UiError> for AppError {
    fn from(e: UiError) -> Self {
        match e {
            UiError::Weather(WeatherError::Network(err))
            | UiError::Stock(StockError::Network(err)) => {
                AppError::Network(err.into_network_error())
            }
            UiError::Weather(WeatherError::Status { status, body }) => {
                AppError::Network(NetworkError::ServerError {
                    status,
                    message: body,
                })
            }
            UiError::Stock(StockError::Status(status)) => {
                AppError::Network(NetworkError::ServerError {
                    status,
                    message: String::new(),
                })
            }
            UiError::Weather(WeatherError::Parse(msg)) | UiError::Stock(StockError::Parse(msg)) => {
                AppError::Network(NetworkError::InvalidResponse(msg))
            }
            UiError::Settings(SettingsError::Document(err))
            | UiError::Store(StoreError::Document(err)) => AppError::Document(err),
            UiError::Settings(SettingsError::EmptyTimezone) => {
                AppError::validation("Please enter a timezone name.")
            }
            UiError::Store(StoreError::Validation(msg)) => AppError::Validation(msg),
            UiError::Io(err) => AppError::Io(err),
            other => AppError::Other(anyhow::anyhow!(other.to_string())),
        }
    }
}
