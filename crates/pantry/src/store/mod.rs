//! Key-value persistence port.
//!
//! The pantry persists whole objects as JSON strings under a handful of
//! keys, the way a browser's local storage would. Two implementations are
//! provided:
//!
//! - [`MemoryStore`] - in-process map, for tests and one-shot runs
//! - [`JsonFileStore`] - a single JSON object file, rewritten on every write
//!
//! Both use interior mutability and are meant to be driven from one thread.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("store file is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String-keyed, string-valued storage.
pub trait KeyValueStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
