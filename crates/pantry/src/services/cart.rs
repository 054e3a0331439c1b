//! Cart service.
//!
//! Wraps a [`Cart`] with the store: the cart is read once from the `cart`
//! key and written back whole after every change.

use tracing::{debug, warn};

use comet_cupboard_core::ItemId;

use crate::cart::{AddOutcome, Cart, CartLine, GLOBAL_CART_LIMIT};
use crate::db::{RepositoryError, keys, load_json, save_json};
use crate::notify::{Notice, Notifier};
use crate::store::KeyValueStore;

/// Cart operations with write-through persistence.
pub struct CartService<'a> {
    store: &'a dyn KeyValueStore,
    notifier: &'a dyn Notifier,
    cart: Cart,
}

impl<'a> CartService<'a> {
    /// Load the stored cart.
    ///
    /// A stored cart that does not decode is discarded and replaced by an
    /// empty one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the store cannot be read.
    pub fn load(
        store: &'a dyn KeyValueStore,
        notifier: &'a dyn Notifier,
    ) -> Result<Self, RepositoryError> {
        let cart = match load_json::<Cart>(store, keys::CART) {
            Ok(cart) => cart.unwrap_or_default(),
            Err(RepositoryError::DataCorruption { source, .. }) => {
                warn!(error = %source, "Stored cart is corrupt, starting empty");
                Cart::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            store,
            notifier,
            cart,
        })
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add one unit of an item.
    ///
    /// A rejected add leaves the store untouched and tells the notifier why.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the updated cart cannot be written.
    pub fn add_item(&mut self, candidate: CartLine) -> Result<AddOutcome, RepositoryError> {
        let item_id = candidate.item_id().clone();
        let outcome = self.cart.add_item(candidate);

        match outcome {
            AddOutcome::Added | AddOutcome::Incremented => {
                debug!(item_id = %item_id, total = self.cart.total_count(), "Added to cart");
                self.persist()?;
            }
            AddOutcome::CartFull => {
                self.notifier.notify(&Notice::CartFull {
                    limit: GLOBAL_CART_LIMIT,
                });
            }
            AddOutcome::ItemLimitReached => {
                if let Some(line) = self.cart.find(&item_id) {
                    self.notifier.notify(&Notice::ItemLimitReached {
                        item: line.display_name().to_owned(),
                        limit: line.per_item_limit(),
                    });
                }
            }
        }
        Ok(outcome)
    }

    /// Set a line's quantity, clamped to fit. `None` if the item is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the updated cart cannot be written.
    pub fn set_quantity(
        &mut self,
        item_id: &ItemId,
        requested: u32,
    ) -> Result<Option<u32>, RepositoryError> {
        let stored = self.cart.set_quantity(item_id, requested);
        if stored.is_some() {
            self.persist()?;
        }
        Ok(stored)
    }

    /// Remove a line. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the updated cart cannot be written.
    pub fn remove_item(&mut self, item_id: &ItemId) -> Result<bool, RepositoryError> {
        let removed = self.cart.remove_item(item_id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the empty cart cannot be written.
    pub fn clear(&mut self) -> Result<(), RepositoryError> {
        self.cart.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), RepositoryError> {
        save_json(self.store, keys::CART, &self.cart)
    }
}
