//! Intraday stock quotes from the Yahoo Finance chart endpoint.
//!
//! One trading day at a 1-minute interval, unadjusted closes. Any failure
//! degrades to "no data" for that symbol; it never fails the page.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use homepanel_core::ProviderConfig;

#[derive(Debug, Error)]
pub enum StockError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Quote service returned HTTP {0}")]
    Status(u16),

    #[error("Failed to parse quote response: {0}")]
    Parse(String),

    #[error("Quote service error for {symbol}: {description}")]
    Provider { symbol: String, description: String },
}

// Chart endpoint wire format

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorBody {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Close prices for one symbol, ascending by time, nulls removed.
#[derive(Debug, Clone, PartialEq)]
pub struct IntradaySeries {
    pub symbol: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl IntradaySeries {
    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|(_, price)| *price)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Result of one quote lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    Data(IntradaySeries),
    /// The provider answered but had nothing to chart (market closed, unknown symbol)
    NoData,
    /// Transport or parse failure, message kept for logs and tooltips
    Failed(String),
}

impl QuoteOutcome {
    pub fn last_price(&self) -> Option<f64> {
        self.series().and_then(IntradaySeries::last_price)
    }

    pub fn series(&self) -> Option<&IntradaySeries> {
        match self {
            QuoteOutcome::Data(series) => Some(series),
            QuoteOutcome::NoData | QuoteOutcome::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StockClient {
    client: Client,
    base_url: String,
}

impl StockClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, StockError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(providers: &ProviderConfig) -> Result<Self, StockError> {
        Self::new(
            &providers.quotes_url,
            &providers.user_agent,
            Duration::from_secs(providers.quotes_timeout_secs),
        )
    }

    /// Fetch today's 1-minute closes for `symbol`.
    pub async fn fetch(&self, symbol: &str) -> QuoteOutcome {
        match self.fetch_series(symbol).await {
            Ok(Some(series)) => QuoteOutcome::Data(series),
            Ok(None) => {
                tracing::info!("No intraday data for {}", symbol);
                QuoteOutcome::NoData
            }
            Err(e) => {
                tracing::warn!("Quote fetch for {} failed: {}", symbol, e);
                QuoteOutcome::Failed(e.to_string())
            }
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_series(&self, symbol: &str) -> Result<Option<IntradaySeries>, StockError> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(symbol)
        );

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[("range", "1d"), ("interval", "1m")])
            .send()
            .await?;

        let status = response.status();
        // Unknown symbols come back as 404 with a chart.error body
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StockError::Status(status.as_u16()));
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| StockError::Parse(e.to_string()))?;

        parse_chart(symbol, body)
    }
}

fn parse_chart(symbol: &str, body: ChartResponse) -> Result<Option<IntradaySeries>, StockError> {
    if let Some(err) = body.chart.error {
        return Err(StockError::Provider {
            symbol: symbol.to_string(),
            description: err.description,
        });
    }

    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(None);
    };
    let Some(closes) = result.indicators.quote.into_iter().next() else {
        return Ok(None);
    };

    let points: Vec<(DateTime<Utc>, f64)> = result
        .timestamp
        .iter()
        .zip(closes.close)
        .filter_map(|(ts, close)| {
            let at = DateTime::from_timestamp(*ts, 0)?;
            close.filter(|c| c.is_finite()).map(|c| (at, c))
        })
        .collect();

    if points.is_empty() {
        return Ok(None);
    }

    Ok(Some(IntradaySeries {
        symbol: symbol.to_string(),
        points,
    }))
}

/// Several series aligned on the timestamps they all share.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CombinedSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    /// One column per input series, same length as `timestamps`
    pub columns: Vec<(String, Vec<f64>)>,
}

impl CombinedSeries {
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty() || self.columns.is_empty()
    }
}

/// Align series on their common timestamps, dropping any point that is not
/// present in every series.
pub fn combine_series(series: &[&IntradaySeries]) -> CombinedSeries {
    let Some((first, rest)) = series.split_first() else {
        return CombinedSeries::default();
    };

    let mut shared: BTreeSet<DateTime<Utc>> = first.points.iter().map(|(t, _)| *t).collect();
    for s in rest {
        let own: BTreeSet<DateTime<Utc>> = s.points.iter().map(|(t, _)| *t).collect();
        shared = shared.intersection(&own).copied().collect();
    }

    let columns = series
        .iter()
        .map(|s| {
            let by_time: BTreeMap<DateTime<Utc>, f64> = s.points.iter().copied().collect();
            let values = shared
                .iter()
                .filter_map(|t| by_time.get(t).copied())
                .collect();
            (s.symbol.clone(), values)
        })
        .collect();

    CombinedSeries {
        timestamps: shared.into_iter().collect(),
        columns,
    }
}
