//! Reminders: dated to-do entries kept in `reminders.json`.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use homepanel_core::DocumentError;

use crate::list_store::{lenient_string, ListStore};

/// A single reminder.
///
/// Fields are kept as the text found on disk, whatever its JSON type, so
/// that a hand-edited bad date hides that one entry from date views instead
/// of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    /// `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient_string")]
    pub due: String,
    /// RFC 3339 timestamp with UTC offset
    #[serde(default, deserialize_with = "lenient_string")]
    pub created: String,
}

impl Reminder {
    pub fn due_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.due.trim(), "%Y-%m-%d").ok()
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.created.trim()).ok()
    }
}

/// Errors from reminder and favorite mutations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Rejected before anything was persisted
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl StoreError {
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Validation(msg) => msg.clone(),
            StoreError::Document(e) => e.user_message(),
        }
    }
}

/// In-memory reminder list backed by a JSON document
#[derive(Debug)]
pub struct ReminderStore {
    list: ListStore<Reminder>,
}

impl ReminderStore {
    /// Open the store, returning any load warning alongside it.
    pub fn open(path: impl Into<PathBuf>) -> (Self, Option<String>) {
        let (list, warning) = ListStore::open(path);
        (Self { list }, warning)
    }

    /// All reminders in stored order
    pub fn all(&self) -> &[Reminder] {
        self.list.items()
    }

    pub fn is_empty(&self) -> bool {
        self.list.items().is_empty()
    }

    /// Add a reminder created now.
    pub fn add(&mut self, text: &str, due: NaiveDate) -> Result<(), StoreError> {
        self.add_at(text, due, Utc::now())
    }

    /// Add a reminder with an explicit creation instant.
    pub fn add_at(
        &mut self,
        text: &str,
        due: NaiveDate,
        created: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::Validation(
                "Please enter some reminder text.".to_string(),
            ));
        }

        self.list.push(Reminder {
            text: text.to_string(),
            due: due.format("%Y-%m-%d").to_string(),
            created: created.to_rfc3339(),
        })?;

        tracing::info!("Reminder added (due {})", due);
        Ok(())
    }

    /// Delete by list position. Out-of-bounds indices leave the list untouched.
    pub fn delete(&mut self, index: usize) -> Result<Option<Reminder>, StoreError> {
        Ok(self.list.remove(index)?)
    }

    /// Reminders due within `start..=end`, ascending by due date.
    ///
    /// Entries whose due date doesn't parse are skipped, not removed.
    pub fn query_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Reminder> {
        let mut matches: Vec<(NaiveDate, &Reminder)> = self
            .all()
            .iter()
            .filter_map(|r| r.due_date().map(|due| (due, r)))
            .filter(|(due, _)| *due >= start && *due <= end)
            .collect();

        matches.sort_by_key(|(due, _)| *due);
        matches.into_iter().map(|(_, r)| r).collect()
    }

    /// Every reminder paired with its list position, ordered by the raw due
    /// string. Deleting uses the paired position, not the display row.
    pub fn sorted_with_index(&self) -> Vec<(usize, &Reminder)> {
        let mut rows: Vec<(usize, &Reminder)> = self.all().iter().enumerate().collect();
        rows.sort_by(|a, b| a.1.due.cmp(&b.1.due));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn open_temp() -> (tempfile::TempDir, ReminderStore) {
        let dir = tempfile::tempdir().unwrap();
        let (store, warning) = ReminderStore::open(dir.path().join("reminders.json"));
        assert!(warning.is_none());
        (dir, store)
    }

    #[test]
    fn test_add_trims_and_stamps_utc_offset() {
        let (_dir, mut store) = open_temp();

        store
            .add_at("  Pay rent ", date("2024-01-01"), instant("2024-01-01T00:00:00Z"))
            .unwrap();

        let reminder = &store.all()[0];
        assert_eq!(reminder.text, "Pay rent");
        assert_eq!(reminder.due, "2024-01-01");
        assert_eq!(reminder.created, "2024-01-01T00:00:00+00:00");
        assert_eq!(reminder.created_at().unwrap().offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_single_day_range_returns_exact_entry() {
        let (_dir, mut store) = open_temp();
        store
            .add_at("Pay rent", date("2024-01-01"), instant("2024-01-01T00:00:00+00:00"))
            .unwrap();

        let hits = store.query_range(date("2024-01-01"), date("2024-01-01"));

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Pay rent");
        assert_eq!(hits[0].created, "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_range_is_inclusive_and_sorted() {
        let (_dir, mut store) = open_temp();
        let now = instant("2024-03-01T12:00:00Z");
        store.add_at("late", date("2024-03-07"), now).unwrap();
        store.add_at("outside", date("2024-03-08"), now).unwrap();
        store.add_at("early", date("2024-03-01"), now).unwrap();
        store.add_at("before", date("2024-02-29"), now).unwrap();
        store.add_at("middle", date("2024-03-04"), now).unwrap();

        let hits: Vec<&str> = store
            .query_range(date("2024-03-01"), date("2024-03-07"))
            .iter()
            .map(|r| r.text.as_str())
            .collect();

        assert_eq!(hits, vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_unparsable_due_is_excluded_but_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(
            &path,
            r#"[
                {"text": "good", "due": "2024-05-02", "created": "2024-05-01T08:00:00+00:00"},
                {"text": "bad", "due": "next tuesday", "created": "2024-05-01T08:00:00+00:00"},
                {"text": "missing due"}
            ]"#,
        )
        .unwrap();

        let (store, warning) = ReminderStore::open(&path);

        assert!(warning.is_none());
        assert_eq!(store.all().len(), 3);
        let hits = store.query_range(date("2000-01-01"), date("2100-01-01"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "good");
    }

    #[test]
    fn test_empty_text_is_rejected_without_persisting() {
        let (dir, mut store) = open_temp();

        let result = store.add("   ", date("2024-01-01"));

        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(store.is_empty());
        assert!(!dir.path().join("reminders.json").exists());
    }

    #[test]
    fn test_delete_out_of_bounds_is_noop() {
        let (_dir, mut store) = open_temp();
        store.add("Water plants", date("2024-06-01")).unwrap();

        let removed = store.delete(5).unwrap();

        assert!(removed.is_none());
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_delete_persists() {
        let (dir, mut store) = open_temp();
        store.add("first", date("2024-06-01")).unwrap();
        store.add("second", date("2024-06-02")).unwrap();

        let removed = store.delete(0).unwrap().unwrap();
        assert_eq!(removed.text, "first");

        let (reopened, _) = ReminderStore::open(dir.path().join("reminders.json"));
        assert_eq!(reopened.all(), store.all());
        assert_eq!(reopened.all()[0].text, "second");
    }

    #[test]
    fn test_sorted_with_index_keeps_positions() {
        let (_dir, mut store) = open_temp();
        store.add("b", date("2024-06-09")).unwrap();
        store.add("a", date("2024-06-01")).unwrap();

        let rows = store.sorted_with_index();

        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[0].1.text, "a");
        assert_eq!(rows[1].0, 0);
    }

    #[test]
    fn test_corrupt_document_yields_empty_list_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        std::fs::write(&path, "{\"text\": \"not a list\"}").unwrap();

        let (store, warning) = ReminderStore::open(&path);

        assert!(store.is_empty());
        assert!(warning.unwrap().contains("reminders.json"));
    }

    #[test]
    fn test_mistyped_due_keeps_the_entry_out_of_ranges() {
        let records: Vec<Reminder> = serde_json::from_str(
            r#"[
                {"text": "good", "due": "2024-05-02", "created": "2024-05-01T08:00:00+00:00"},
                {"text": "null due", "due": null, "created": "2024-05-01T08:00:00+00:00"},
                {"text": "numeric due", "due": 20240502, "created": 17}
            ]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].due, "");
        assert_eq!(records[2].due, "20240502");
        assert_eq!(records[2].created, "17");
        assert!(records[1].due_date().is_none());
        assert!(records[2].due_date().is_none());
    }
}
