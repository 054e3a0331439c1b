//! Repositories over the key-value store.
//!
//! # Keys
//!
//! Each key holds one whole JSON document, rewritten on every change:
//!
//! - `cart` - the current cart, as an array of lines
//! - `mockUsers` - the user directory, eligibility state included
//! - `pickups` - every scheduled pickup

pub mod pickups;
pub mod users;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::store::{KeyValueStore, StoreError};

/// Storage keys.
pub mod keys {
    /// The current cart.
    pub const CART: &str = "cart";
    /// The user directory.
    pub const USERS: &str = "mockUsers";
    /// Scheduled pickups.
    pub const PICKUPS: &str = "pickups";
}

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A stored document could not be decoded.
    #[error("data corruption under {key}: {source}")]
    DataCorruption {
        /// The key whose value is bad.
        key: &'static str,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Constraint violation (e.g., duplicate email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Read and decode the document under `key`.
pub(crate) fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &'static str,
) -> Result<Option<T>, RepositoryError> {
    store
        .get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|source| RepositoryError::DataCorruption { key, source })
}

/// Encode `value` and write it under `key`.
pub(crate) fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &'static str,
    value: &T,
) -> Result<(), RepositoryError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)?;
    Ok(())
}
