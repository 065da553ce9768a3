use chrono::{DateTime, TimeZone};

use super::html::metric;

/// Date, time and UTC offset for the configured timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockView {
    pub date: String,
    pub time: String,
    pub offset: String,
}

impl ClockView {
    pub fn at<Tz>(now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            date: now.format("%A, %b %d, %Y").to_string(),
            time: now.format("%I:%M %p").to_string(),
            offset: now.format("UTC%z").to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            r#"<div class="metrics">{}{}{}</div>"#,
            metric("Date", &self.date),
            metric("Time", &self.time),
            metric("UTC Offset", &self.offset)
        )
    }
}
