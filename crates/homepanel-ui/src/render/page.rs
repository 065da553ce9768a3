//! Page shell: head, theme, sidebar settings, tab strip and the polling script.

use std::fmt::Write;

use homepanel_core::{Settings, TemperatureUnit};

use super::html::{escape, notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Weather,
    Stocks,
    Reminders,
    Favorites,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Weather, Tab::Stocks, Tab::Reminders, Tab::Favorites];

    pub fn slug(self) -> &'static str {
        match self {
            Tab::Weather => "weather",
            Tab::Stocks => "stocks",
            Tab::Reminders => "reminders",
            Tab::Favorites => "favorites",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Weather => "⏰ Weather & Time",
            Tab::Stocks => "📈 Stocks",
            Tab::Reminders => "🗒️ Reminders",
            Tab::Favorites => "🔗 Favorites",
        }
    }

    /// Unknown or missing slugs land on the first tab.
    pub fn from_slug(slug: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| Some(t.slug()) == slug)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Warning,
    Error,
}

impl BannerKind {
    fn class(self) -> &'static str {
        match self {
            BannerKind::Success => "success",
            BannerKind::Warning => "warning",
            BannerKind::Error => "error",
        }
    }
}

pub struct Page<'a> {
    pub settings: &'a Settings,
    pub tab: Tab,
    pub refresh_seconds: u32,
    pub banners: Vec<(BannerKind, String)>,
    pub body: String,
}

/// Wrap a fragment so the page script re-fetches it from `endpoint`.
pub fn refreshing(endpoint: &str, inner: &str) -> String {
    format!(
        r#"<div class="panel" data-refresh="{}">{}</div>"#,
        escape(endpoint),
        inner
    )
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; background: #fff; color: #262730; }
aside { width: 260px; padding: 1.5rem; background: #f0f2f6; min-height: 100vh; box-sizing: border-box; }
main { flex: 1; padding: 1.5rem 2rem; max-width: 1100px; }
.caption { color: #808495; font-size: 0.9rem; }
.tabs { display: flex; gap: 1rem; border-bottom: 1px solid #ddd; margin-bottom: 1rem; }
.tabs a { padding: 0.5rem 0; text-decoration: none; color: #555; }
.tabs a.active { color: #ff4b4b; border-bottom: 2px solid #ff4b4b; }
.metrics, .columns { display: flex; gap: 1rem; flex-wrap: wrap; }
.columns > div { flex: 1; }
.metric { flex: 1; min-width: 160px; padding: 0.6rem; border-radius: 12px; }
.metric-label { font-size: 0.85rem; color: #808495; }
.metric-value { font-size: 1.6rem; }
.notice { padding: 0.7rem 1rem; border-radius: 8px; margin: 0.5rem 0; }
.notice-success { background: #dff5e3; } .notice-info { background: #e1ecfb; }
.notice-warning { background: #fff6d6; } .notice-error { background: #fde2e2; }
.row { display: flex; gap: 0.75rem; align-items: flex-end; flex-wrap: wrap; margin: 0.5rem 0; }
label { display: flex; flex-direction: column; font-size: 0.85rem; gap: 0.2rem; }
input[type=text], input[type=date] { padding: 0.4rem; border: 1px solid #ccc; border-radius: 6px; }
button, .button { padding: 0.4rem 0.9rem; border: 1px solid #ccc; border-radius: 6px; background: #fff; cursor: pointer; text-decoration: none; color: inherit; }
table { border-collapse: collapse; width: 100%; } td, th { padding: 0.3rem 0.6rem; border-bottom: 1px solid #eee; text-align: left; }
ul.manage { list-style: none; padding: 0; } ul.manage li { display: flex; justify-content: space-between; padding: 0.3rem 0; }
.chart-box { margin: 0.5rem 0; } svg.chart { width: 100%; height: 240px; }
svg .axis { stroke: #999; } svg .tick { font-size: 11px; fill: #808495; }
.legend span { margin-right: 1rem; font-size: 0.85rem; } .legend i { display: inline-block; width: 10px; height: 10px; margin-right: 4px; }
pre { overflow-x: auto; }
"#;

const DARK_STYLE: &str = r#"
body.dark { background-color: #0f1115; color: #e8e8e8; }
body.dark aside { background: #161a22; }
body.dark .metric { background: #161a22; }
body.dark input[type=text], body.dark input[type=date] { background: #161a22; color: #e8e8e8; border: 1px solid #2a2f3a; }
body.dark button, body.dark .button { background: #1f2430; color: #e8e8e8; border: 1px solid #2a2f3a; }
body.dark .tabs a { color: #cfd3dc; } body.dark .tabs a.active { color: #fff; }
body.dark table, body.dark td, body.dark th { color: #e8e8e8; border-color: #2a2f3a; }
body.dark .notice { color: #111; }
"#;

fn refresh_script(seconds: u32) -> String {
    if seconds == 0 {
        return String::new();
    }
    format!(
        r#"<script>
setInterval(function () {{
  document.querySelectorAll('[data-refresh]').forEach(function (el) {{
    fetch(el.getAttribute('data-refresh'))
      .then(function (r) {{ return r.ok ? r.text() : null; }})
      .then(function (html) {{ if (html !== null) {{ el.innerHTML = html; }} }})
      .catch(function () {{}});
  }});
}}, {});
</script>"#,
        u64::from(seconds) * 1000
    )
}

fn render_sidebar(settings: &Settings, tab: Tab) -> String {
    let dark = if settings.dark_mode { " checked" } else { "" };
    let mut units = String::new();
    for unit in [TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius] {
        let checked = if unit == settings.units { " checked" } else { "" };
        let _ = write!(
            units,
            r#"<label class="inline"><input type="radio" name="units" value="{l}"{c}> {l}</label>"#,
            l = unit.letter(),
            c = checked
        );
    }

    format!(
        r#"<aside><h2>⚙️ Settings</h2>
<form method="post" action="/settings">
  <input type="hidden" name="tab" value="{tab}">
  <label class="inline"><input type="checkbox" name="dark_mode" value="on"{dark}> 🌙 Dark mode</label>
  <p>Temperature Units</p><div class="row">{units}</div>
  <label>Timezone (IANA name)
    <input type="text" name="timezone" value="{tz}" title="Examples: America/Los_Angeles, America/New_York, Europe/London"></label>
  <p><button type="submit">Save Settings</button></p>
</form></aside>"#,
        tab = tab.slug(),
        dark = dark,
        units = units,
        tz = escape(&settings.timezone),
    )
}

pub fn render_page(page: &Page<'_>) -> String {
    let mut tabs = String::from(r#"<nav class="tabs">"#);
    for tab in Tab::ALL {
        let class = if tab == page.tab { " class=\"active\"" } else { "" };
        let _ = write!(
            tabs,
            r#"<a href="/?tab={}"{}>{}</a>"#,
            tab.slug(),
            class,
            tab.label()
        );
    }
    tabs.push_str("</nav>");

    let banners: String = page
        .banners
        .iter()
        .map(|(kind, text)| notice(kind.class(), text))
        .collect();

    let caption = if page.refresh_seconds > 0 {
        format!(
            "Refreshes every {} seconds so your time, weather, and stocks feel fresh.",
            page.refresh_seconds
        )
    } else {
        "Automatic refresh is off.".to_string()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Personal Dashboard</title>
<style>{style}{dark_style}</style></head>
<body class="{body_class}">
{sidebar}
<main>
<h1>🧭 Personal Dashboard</h1>
<p class="caption">{caption}</p>
{banners}
{tabs}
<section id="tab-{slug}">
{body}
</section>
<hr><p class="caption">Local dashboard. Tweak settings anytime in the sidebar.</p>
</main>
{script}
</body></html>"#,
        style = STYLE,
        dark_style = DARK_STYLE,
        body_class = if page.settings.dark_mode { "dark" } else { "light" },
        sidebar = render_sidebar(page.settings, page.tab),
        caption = caption,
        banners = banners,
        tabs = tabs,
        slug = page.tab.slug(),
        body = page.body,
        script = refresh_script(page.refresh_seconds),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_from_slug() {
        assert_eq!(Tab::from_slug(Some("stocks")), Tab::Stocks);
        assert_eq!(Tab::from_slug(Some("nope")), Tab::Weather);
        assert_eq!(Tab::from_slug(None), Tab::Weather);
    }

    #[test]
    fn test_page_shell() {
        let settings = Settings {
            dark_mode: true,
            units: TemperatureUnit::Celsius,
            ..Settings::default()
        };
        let page = Page {
            settings: &settings,
            tab: Tab::Reminders,
            refresh_seconds: 60,
            banners: vec![(BannerKind::Success, "Reminder added.".to_string())],
            body: refreshing("/panels/reminders", "<p>hi</p>"),
        };

        let html = render_page(&page);

        assert!(html.contains(r#"<body class="dark">"#));
        assert!(html.contains(r#"value="C" checked"#));
        assert!(html.contains(r#"<a href="/?tab=reminders" class="active">"#));
        assert!(html.contains("notice-success"));
        assert!(html.contains(r#"data-refresh="/panels/reminders""#));
        assert!(html.contains("}, 60000);"));
        assert!(html.contains("America/Los_Angeles"));
    }

    #[test]
    fn test_zero_interval_disables_polling() {
        let settings = Settings::default();
        let page = Page {
            settings: &settings,
            tab: Tab::Weather,
            refresh_seconds: 0,
            banners: vec![],
            body: String::new(),
        };

        let html = render_page(&page);

        assert!(!html.contains("setInterval"));
        assert!(html.contains("Automatic refresh is off."));
    }

    #[test]
    fn test_banner_kinds_render_in_order() {
        let settings = Settings::default();
        let page = Page {
            settings: &settings,
            tab: Tab::Weather,
            refresh_seconds: 60,
            banners: vec![
                (BannerKind::Warning, "Could not load favorites.json.".to_string()),
                (BannerKind::Error, "Error saving to reminders.json: denied".to_string()),
            ],
            body: String::new(),
        };

        let html = render_page(&page);

        let warning = html.find("notice-warning").unwrap();
        let error = html.find("notice-error").unwrap();
        assert!(warning < error);
    }
}
