//! Flat-file JSON documents (settings, reminders, favorites).
//!
//! Loading never fails: a missing file yields the default silently, an
//! unreadable or corrupt one yields the default plus a warning for the page.
//! Saving rewrites the whole document.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DocumentError;

/// A loaded value together with the warning to surface when the default
/// had to be substituted for an existing file.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub warning: Option<String>,
}

/// Handle on one JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read(&self) -> Result<Option<T>, DocumentError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|source| DocumentError::Read {
            path: self.path.clone(),
            source,
        })?;

        let value = serde_json::from_str(&contents).map_err(|source| DocumentError::Parse {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(value))
    }

    /// Load the document, substituting `default` when missing or corrupt.
    pub fn load_or(&self, default: impl FnOnce() -> T) -> Loaded<T> {
        match self.read() {
            Ok(Some(value)) => {
                tracing::debug!("Loaded {}", self.path.display());
                Loaded {
                    value,
                    warning: None,
                }
            }
            Ok(None) => {
                tracing::info!("{} not found, using defaults", self.path.display());
                Loaded {
                    value: default(),
                    warning: None,
                }
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Loaded {
                    value: default(),
                    warning: Some(e.user_message()),
                }
            }
        }
    }

    /// Write the whole document as 2-space indented UTF-8 JSON.
    pub fn save(&self, value: &T) -> Result<(), DocumentError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| DocumentError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(value).map_err(|source| {
            DocumentError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        std::fs::write(&self.path, json).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("Saved {}", self.path.display());
        Ok(())
    }
}
