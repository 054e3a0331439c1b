//! Single-file JSON store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, StoreError};

/// Store backed by one JSON object file.
///
/// The file is read once on open and rewritten in full after every `set`
/// or `remove`. A change reaches the in-memory map only after it is on
/// disk, so a failed write leaves both untouched.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be read, and
    /// `StoreError::Serialization` if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = entries.len(), "Opened store file");

        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&self, staged: BTreeMap<String, String>) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&staged)?;
        fs::write(&self.path, contents)?;
        *self.entries.borrow_mut() = staged;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut staged = self.entries.borrow().clone();
        staged.insert(key.to_owned(), value.to_owned());
        self.commit(staged)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if !self.entries.borrow().contains_key(key) {
            return Ok(());
        }
        let mut staged = self.entries.borrow().clone();
        staged.remove(key);
        self.commit(staged)
    }
}
