use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::list_store::{lenient_string, ListStore};
use crate::reminder::StoreError;

/// A bookmarked link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

#[derive(Debug)]
pub struct FavoriteStore {
    list: ListStore<Favorite>,
}

impl FavoriteStore {
    pub fn open(path: impl Into<PathBuf>) -> (Self, Option<String>) {
        let (list, warning) = ListStore::open(path);
        (Self { list }, warning)
    }

    pub fn all(&self) -> &[Favorite] {
        self.list.items()
    }

    /// Both fields are trimmed and must be non-empty. The URL is otherwise
    /// stored as given.
    pub fn add(&mut self, name: &str, url: &str) -> Result<(), StoreError> {
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() {
            return Err(StoreError::Validation(
                "Please provide both a name and a URL.".to_string(),
            ));
        }

        self.list.push(Favorite {
            name: name.to_string(),
            url: url.to_string(),
        })?;

        tracing::info!("Favorite added: {}", name);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Option<Favorite>, StoreError> {
        Ok(self.list.remove(index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        let (mut store, _) = FavoriteStore::open(&path);

        store.add(" Docs ", " https://docs.rs ").unwrap();

        let (reopened, warning) = FavoriteStore::open(&path);
        assert!(warning.is_none());
        assert_eq!(
            reopened.all(),
            &[Favorite {
                name: "Docs".to_string(),
                url: "https://docs.rs".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, _) = FavoriteStore::open(dir.path().join("favorites.json"));

        let err = store.add("News", "   ").unwrap_err();

        assert_eq!(err.user_message(), "Please provide both a name and a URL.");
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_remove_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let (mut store, _) = FavoriteStore::open(dir.path().join("favorites.json"));
        store.add("a", "https://a.example").unwrap();
        store.add("b", "https://b.example").unwrap();

        assert!(store.remove(7).unwrap().is_none());
        let removed = store.remove(0).unwrap().unwrap();

        assert_eq!(removed.name, "a");
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].name, "b");
    }

    #[test]
    fn test_non_string_fields_load_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(
            &path,
            r#"[{"name": "Docs", "url": "https://docs.rs"}, {"name": 42, "url": null}]"#,
        )
        .unwrap();

        let (store, warning) = FavoriteStore::open(&path);

        assert!(warning.is_none());
        assert_eq!(store.all().len(), 2);
        assert_eq!(store.all()[1].name, "42");
        assert_eq!(store.all()[1].url, "");
    }
}
