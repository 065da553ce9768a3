use std::fmt::Write;

use chrono_tz::Tz;
use homepanel_services::{combine_series, QuoteOutcome};

use super::chart::{LineChart, LineSeries};
use super::html::{escape, format_price, metric};

/// One ticker slot. `outcome` is `None` for an empty slot, which is never fetched.
#[derive(Debug, Clone)]
pub struct TickerQuote {
    pub symbol: String,
    pub outcome: Option<QuoteOutcome>,
}

pub fn render_stocks(quotes: &[TickerQuote], tz: Tz) -> String {
    let mut out = String::from(r#"<div class="metrics">"#);
    for quote in quotes {
        if quote.symbol.is_empty() {
            out.push_str(&metric("\u{2014}", "N/A"));
            continue;
        }
        let price = quote
            .outcome
            .as_ref()
            .and_then(QuoteOutcome::last_price)
            .map(format_price)
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&metric(&quote.symbol, &price));
    }
    out.push_str("</div>");

    let series: Vec<_> = quotes
        .iter()
        .filter_map(|q| q.outcome.as_ref().and_then(QuoteOutcome::series))
        .filter(|s| !s.is_empty())
        .collect();

    if series.is_empty() {
        out.push_str(r#"<p class="caption">No intraday data available yet.</p>"#);
        return out;
    }

    let combined = combine_series(&series);
    if combined.is_empty() {
        out.push_str(r#"<p class="caption">No overlapping intraday data to chart right now.</p>"#);
        return out;
    }

    let chart = LineChart {
        x_labels: combined
            .timestamps
            .iter()
            .map(|t| t.with_timezone(&tz).format("%H:%M").to_string())
            .collect(),
        series: combined
            .columns
            .iter()
            .map(|(symbol, values)| {
                LineSeries::new(symbol.clone(), values.iter().copied().map(Some).collect())
            })
            .collect(),
    };

    if let Some(svg) = chart.to_svg() {
        let _ = write!(out, "<h4>Intraday (1m) Close</h4>{}", svg);
    }
    out
}

pub fn render_ticker_controls(tickers: &[String; 3]) -> String {
    let mut out = String::from(r#"<form method="post" action="/settings/tickers" class="row">"#);
    for (i, ticker) in tickers.iter().enumerate() {
        let _ = write!(
            out,
            r#"<label>Ticker {n} <input type="text" name="t{n}" value="{v}"></label>"#,
            n = i + 1,
            v = escape(ticker)
        );
    }
    out.push_str(r#"<button type="submit">Save Tickers</button></form>"#);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use homepanel_services::IntradaySeries;

    fn data(symbol: &str, points: &[(i64, f64)]) -> TickerQuote {
        TickerQuote {
            symbol: symbol.to_string(),
            outcome: Some(QuoteOutcome::Data(IntradaySeries {
                symbol: symbol.to_string(),
                points: points
                    .iter()
                    .map(|(t, p)| (DateTime::from_timestamp(*t, 0).unwrap(), *p))
                    .collect(),
            })),
        }
    }

    #[test]
    fn test_metrics_and_chart() {
        let quotes = vec![
            data("AAPL", &[(1_700_000_000, 1234.5), (1_700_000_060, 1235.25)]),
            data("MSFT", &[(1_700_000_000, 370.0), (1_700_000_060, 371.0)]),
            TickerQuote {
                symbol: "NVDA".into(),
                outcome: Some(QuoteOutcome::NoData),
            },
        ];

        let html = render_stocks(&quotes, chrono_tz::UTC);

        assert!(html.contains("$1,235.25"));
        assert!(html.contains("$371.00"));
        assert!(html.contains(r#"<div class="metric-label">NVDA</div><div class="metric-value">N/A</div>"#));
        assert!(html.contains("Intraday (1m) Close"));
        assert!(html.contains("22:13"));
    }

    #[test]
    fn test_empty_slot_and_no_data() {
        let quotes = vec![
            TickerQuote {
                symbol: String::new(),
                outcome: None,
            },
            TickerQuote {
                symbol: "MSFT".into(),
                outcome: Some(QuoteOutcome::Failed("timeout".into())),
            },
        ];

        let html = render_stocks(&quotes, chrono_tz::UTC);

        assert!(html.contains(r#"<div class="metric-label">—</div><div class="metric-value">N/A</div>"#));
        assert!(html.contains("No intraday data available yet."));
    }

    #[test]
    fn test_disjoint_series_caption() {
        let quotes = vec![data("AAPL", &[(60, 1.0)]), data("MSFT", &[(120, 2.0)])];

        let html = render_stocks(&quotes, chrono_tz::UTC);

        assert!(html.contains("No overlapping intraday data to chart right now."));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_ticker_form_echoes_values() {
        let html = render_ticker_controls(&["AAPL".into(), String::new(), "BRK.B".into()]);
        assert!(html.contains(r#"name="t3" value="BRK.B""#));
        assert!(html.contains(r#"name="t2" value="""#));
    }
}
