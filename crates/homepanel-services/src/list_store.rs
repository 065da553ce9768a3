//! Shared list-document plumbing for reminders and favorites.
//!
//! The whole list is rewritten after every mutation. Items have no identity
//! beyond their position.

use std::path::PathBuf;

use homepanel_core::{DocumentError, JsonDocument};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Accept any JSON value for a text field. A hand-edited `null` or number
/// must not fail the whole list, so it is kept as text instead.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ListStore<T> {
    document: JsonDocument<Vec<T>>,
    items: Vec<T>,
}

impl<T> ListStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn open(path: impl Into<PathBuf>) -> (Self, Option<String>) {
        let document = JsonDocument::new(path);
        let loaded = document.load_or(Vec::new);
        (
            Self {
                document,
                items: loaded.value,
            },
            loaded.warning,
        )
    }

    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    /// Append and persist. The item stays in memory even if the write fails.
    pub(crate) fn push(&mut self, item: T) -> Result<(), DocumentError> {
        self.items.push(item);
        self.persist()
    }

    /// Remove by position and persist; out-of-range indices are a no-op.
    pub(crate) fn remove(&mut self, index: usize) -> Result<Option<T>, DocumentError> {
        if index >= self.items.len() {
            tracing::debug!(
                "Ignoring removal of index {} from {} ({} items)",
                index,
                self.document.path().display(),
                self.items.len()
            );
            return Ok(None);
        }

        let removed = self.items.remove(index);
        self.persist()?;
        Ok(Some(removed))
    }

    pub(crate) fn persist(&self) -> Result<(), DocumentError> {
        self.document.save(&self.items).map_err(|e| {
            tracing::error!("{}", e);
            e
        })
    }
}
