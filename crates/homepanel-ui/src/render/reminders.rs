use std::fmt::Write;

use chrono::{Duration, NaiveDate};
use homepanel_services::{Reminder, ReminderStore};

use super::html::{escape, notice};

/// Owned snapshot of the reminder views, taken while the store is locked.
#[derive(Debug, Clone, Default)]
pub struct ReminderView {
    pub today: Vec<Reminder>,
    pub week: Vec<Reminder>,
    /// Every reminder with its list position, in display order
    pub all: Vec<(usize, Reminder)>,
}

impl ReminderView {
    /// "Today" is `today..=today`, "This Week" is `today..=today+6`.
    pub fn from_store(store: &ReminderStore, today: NaiveDate) -> Self {
        let week_end = today + Duration::days(6);
        Self {
            today: store.query_range(today, today).into_iter().cloned().collect(),
            week: store
                .query_range(today, week_end)
                .into_iter()
                .cloned()
                .collect(),
            all: store
                .sorted_with_index()
                .into_iter()
                .map(|(i, r)| (i, r.clone()))
                .collect(),
        }
    }
}

fn render_list(reminders: &[Reminder], empty: &str) -> String {
    if reminders.is_empty() {
        return notice("info", empty);
    }
    let mut out = String::from("<ul>");
    for r in reminders {
        let _ = write!(
            out,
            "<li>{} <em>(due {})</em></li>",
            escape(&r.text),
            escape(&r.due)
        );
    }
    out.push_str("</ul>");
    out
}

pub fn render_reminders(view: &ReminderView) -> String {
    let mut out = String::new();

    if view.all.is_empty() {
        out.push_str(
            r#"<p class="caption">No reminders yet. Add one below and you can export to CSV.</p>"#,
        );
    } else {
        out.push_str(
            r#"<p><a class="button" href="/reminders/export.csv" download="reminders.csv">⬇️ Export Reminders</a></p>"#,
        );
    }

    let _ = write!(
        out,
        r#"<div class="columns"><div><h3>Today</h3>{}</div><div><h3>This Week</h3>{}</div></div>"#,
        render_list(&view.today, "No reminders today."),
        render_list(&view.week, "No reminders this week.")
    );

    out.push_str("<h3>Manage All Reminders</h3>");
    if !view.all.is_empty() {
        out.push_str(r#"<ul class="manage">"#);
        for (index, r) in &view.all {
            let _ = write!(
                out,
                r#"<li><span><b>{text}</b> (due {due})</span><form method="post" action="/reminders/{index}/delete"><button type="submit">Delete</button></form></li>"#,
                text = escape(&r.text),
                due = escape(&r.due),
                index = index
            );
        }
        out.push_str("</ul>");
    }
    out
}

pub fn render_reminder_form(today: NaiveDate) -> String {
    format!(
        r#"<h3>Add a Reminder</h3>
<form method="post" action="/reminders" class="row">
  <label>Reminder text <input type="text" name="text"></label>
  <label>Due date <input type="date" name="due" value="{}"></label>
  <button type="submit">Add</button>
</form>"#,
        today.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(text: &str, due: &str) -> Reminder {
        Reminder {
            text: text.to_string(),
            due: due.to_string(),
            created: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_view_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(
            &path,
            serde_json::to_string(&vec![
                reminder("next month", "2024-02-01"),
                reminder("today", "2024-01-01"),
                reminder("sunday", "2024-01-07"),
                reminder("broken", "soon"),
            ])
            .unwrap(),
        )
        .unwrap();
        let (store, _) = ReminderStore::open(&path);
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let view = ReminderView::from_store(&store, today);

        assert_eq!(view.today.len(), 1);
        assert_eq!(view.week.iter().map(|r| r.text.as_str()).collect::<Vec<_>>(), vec!["today", "sunday"]);
        assert_eq!(view.all.len(), 4);
        assert_eq!(view.all[0].0, 1);
    }

    #[test]
    fn test_rows_delete_their_own_position() {
        let view = ReminderView {
            today: vec![],
            week: vec![],
            all: vec![(2, reminder("a", "2024-01-01")), (0, reminder("b", "2024-03-01"))],
        };

        let html = render_reminders(&view);

        assert!(html.contains("/reminders/export.csv"));
        let first = html.find("/reminders/2/delete").unwrap();
        let second = html.find("/reminders/0/delete").unwrap();
        assert!(first < second);
        assert!(html.contains("No reminders today."));
    }

    #[test]
    fn test_empty_has_no_export() {
        let html = render_reminders(&ReminderView::default());
        assert!(!html.contains("export.csv"));
        assert!(html.contains("No reminders yet."));
    }

    #[test]
    fn test_text_is_escaped() {
        let view = ReminderView {
            today: vec![reminder("<script>", "2024-01-01")],
            week: vec![],
            all: vec![],
        };
        assert!(render_reminders(&view).contains("&lt;script&gt;"));
    }
}
