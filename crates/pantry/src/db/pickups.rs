//! Scheduled pickup repository.

use tracing::debug;

use comet_cupboard_core::RequestId;

use super::{RepositoryError, keys, load_json, save_json};
use crate::pickup::ScheduledPickup;
use crate::store::KeyValueStore;

/// Repository for scheduled pickups, stored under [`keys::PICKUPS`].
pub struct PickupRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> PickupRepository<'a> {
    /// Create a new pickup repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Every pickup, oldest first. An absent key reads as none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the list is corrupt.
    pub fn all(&self) -> Result<Vec<ScheduledPickup>, RepositoryError> {
        Ok(load_json(self.store, keys::PICKUPS)?.unwrap_or_default())
    }

    /// Get a pickup by request id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the list is corrupt.
    pub fn get(&self, id: &RequestId) -> Result<Option<ScheduledPickup>, RepositoryError> {
        Ok(self.all()?.into_iter().find(|pickup| &pickup.id == id))
    }

    /// Replace the whole list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    pub fn save_all(&self, pickups: &[ScheduledPickup]) -> Result<(), RepositoryError> {
        save_json(self.store, keys::PICKUPS, pickups)
    }

    /// Add a pickup to the end of the list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the request id is taken.
    pub fn append(&self, pickup: ScheduledPickup) -> Result<(), RepositoryError> {
        let mut pickups = self.all()?;
        if pickups.iter().any(|existing| existing.id == pickup.id) {
            return Err(RepositoryError::Conflict(format!(
                "pickup {} already exists",
                pickup.id
            )));
        }
        debug!(request_id = %pickup.id, order_number = %pickup.order_number, "Storing pickup");
        pickups.push(pickup);
        self.save_all(&pickups)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use comet_cupboard_core::{OrderNumber, PickupTime};

    use super::*;
    use crate::store::MemoryStore;

    fn pickup(id: &str) -> ScheduledPickup {
        ScheduledPickup::new(
            RequestId::new(id),
            OrderNumber::new(482_913).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 14).unwrap(),
            PickupTime::parse("3:00 PM").unwrap(),
            Vec::new(),
        )
    }

    #[test]
    fn test_empty_store_has_no_pickups() {
        let store = MemoryStore::new();
        let repo = PickupRepository::new(&store);
        assert!(repo.all().unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_and_get() {
        let store = MemoryStore::new();
        let repo = PickupRepository::new(&store);
        repo.append(pickup("REQ-1")).unwrap();
        repo.append(pickup("REQ-2")).unwrap();

        let ids: Vec<_> = repo.all().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![RequestId::new("REQ-1"), RequestId::new("REQ-2")]);
        assert!(repo.get(&RequestId::new("REQ-2")).unwrap().is_some());
        assert!(repo.get(&RequestId::new("REQ-9")).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_request_id() {
        let store = MemoryStore::new();
        let repo = PickupRepository::new(&store);
        repo.append(pickup("REQ-1")).unwrap();
        assert!(matches!(
            repo.append(pickup("REQ-1")),
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[test]
    fn test_stored_layout() {
        let store = MemoryStore::new();
        let repo = PickupRepository::new(&store);
        repo.append(pickup("REQ-1")).unwrap();

        let raw = store.get(keys::PICKUPS).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["orderNumber"], "CC-482913");
        assert_eq!(json[0]["date"], "2025-04-14");
        assert_eq!(json[0]["time"], "3:00 PM");
        assert_eq!(json[0]["status"], "in-progress");
    }
}
