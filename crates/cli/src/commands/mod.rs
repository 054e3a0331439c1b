//! Command implementations.
//!
//! Every command opens the same [`Context`]: the JSON file store named by
//! the configuration, the system clock, and a notifier that logs.

pub mod cart;
pub mod orders;
pub mod pickups;

use comet_cupboard_pantry::clock::SystemClock;
use comet_cupboard_pantry::config::PantryConfig;
use comet_cupboard_pantry::db::RepositoryError;
use comet_cupboard_pantry::notify::TracingNotifier;
use comet_cupboard_pantry::services::{CartService, CheckoutService, PickupMonitor, UserDirectory};
use comet_cupboard_pantry::store::{JsonFileStore, StoreError};

/// Collaborators shared by every command.
pub struct Context {
    pub config: PantryConfig,
    store: JsonFileStore,
    clock: SystemClock,
    notifier: TracingNotifier,
}

impl Context {
    /// Open the store named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store file exists but cannot be read.
    pub fn open(config: PantryConfig) -> Result<Self, StoreError> {
        let store = JsonFileStore::open(config.store_path.clone())?;
        Ok(Self {
            config,
            store,
            clock: SystemClock,
            notifier: TracingNotifier,
        })
    }

    pub fn cart(&self) -> Result<CartService<'_>, RepositoryError> {
        CartService::load(&self.store, &self.notifier)
    }

    pub fn directory(&self) -> UserDirectory<'_> {
        UserDirectory::new(&self.store, &self.clock, self.config.zone)
    }

    pub fn checkout(&self) -> CheckoutService<'_> {
        CheckoutService::new(&self.store, &self.clock, &self.notifier, self.config.zone)
    }

    pub fn monitor(&self) -> PickupMonitor<'_> {
        PickupMonitor::new(&self.store, &self.clock, &self.notifier, self.config.zone)
    }

    pub fn clock(&self) -> &SystemClock {
        &self.clock
    }
}
