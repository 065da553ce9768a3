//! Small HTML and number-formatting helpers shared by the panels.

/// Escape text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `$1,234.56`
pub fn format_price(price: f64) -> String {
    let rounded = format!("{:.2}", price.abs());
    let (whole, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// Value with a unit suffix, or an em dash placeholder when missing.
pub fn format_measure(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, suffix),
        None => "\u{2014}".to_string(),
    }
}

/// A labelled metric tile.
pub fn metric(label: &str, value: &str) -> String {
    format!(
        r#"<div class="metric"><div class="metric-label">{}</div><div class="metric-value">{}</div></div>"#,
        escape(label),
        escape(value)
    )
}

pub fn notice(kind: &str, text: &str) -> String {
    format!(
        r#"<div class="notice notice-{}">{}</div>"#,
        kind,
        escape(text)
    )
}
