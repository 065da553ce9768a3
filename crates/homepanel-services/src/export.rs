//! CSV export of the reminder list.

use thiserror::Error;

use crate::reminder::Reminder;

pub const REMINDERS_CSV_FILENAME: &str = "reminders.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to finish CSV: {0}")]
    Flush(String),
}

/// Render reminders as `text,due,created` rows with a header line, in
/// stored order. Quoting follows RFC 4180.
pub fn reminders_to_csv(reminders: &[Reminder]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(["text", "due", "created"])?;
    for reminder in reminders {
        writer.write_record([&reminder.text, &reminder.due, &reminder.created])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(text: &str, due: &str, created: &str) -> Reminder {
        Reminder {
            text: text.to_string(),
            due: due.to_string(),
            created: created.to_string(),
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        let bytes = reminders_to_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "text,due,created\n");
    }

    #[test]
    fn test_rows_in_stored_order_with_quoting() {
        let bytes = reminders_to_csv(&[
            reminder("Pay rent", "2024-01-01", "2024-01-01T00:00:00+00:00"),
            reminder("Buy milk, eggs", "2023-12-30", "2023-12-29T10:00:00+00:00"),
        ])
        .unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "text,due,created\n\
             Pay rent,2024-01-01,2024-01-01T00:00:00+00:00\n\
             \"Buy milk, eggs\",2023-12-30,2023-12-29T10:00:00+00:00\n"
        );
    }
}
