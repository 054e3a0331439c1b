//! Cart capacity rules.
//!
//! A cart holds at most [`GLOBAL_CART_LIMIT`] items in total, and each line
//! at most its own per-item limit. Both caps hold after every mutation.
//! Over-capacity requests are clamped or ignored rather than rejected with
//! an error; [`Cart::add_item`] reports what happened so the caller can
//! decide what to tell the user.

use serde::{Deserialize, Serialize};

use comet_cupboard_core::ItemId;

/// Maximum total quantity across all lines of a cart.
pub const GLOBAL_CART_LIMIT: u32 = 5;

/// One requested item.
///
/// Invariant: `1 <= quantity <= per_item_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    item_id: ItemId,
    #[serde(rename = "name")]
    display_name: String,
    category: String,
    quantity: u32,
    #[serde(rename = "limit")]
    per_item_limit: u32,
}

impl CartLine {
    /// A line for one unit of an item. A limit of zero is raised to one.
    #[must_use]
    pub fn new(
        item_id: impl Into<ItemId>,
        display_name: impl Into<String>,
        category: impl Into<String>,
        per_item_limit: u32,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            display_name: display_name.into(),
            category: category.into(),
            quantity: 1,
            per_item_limit: per_item_limit.max(1),
        }
    }

    #[must_use]
    pub const fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn per_item_limit(&self) -> u32 {
        self.per_item_limit
    }
}

/// What [`Cart::add_item`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was created with quantity 1.
    Added,
    /// An existing line went up by one.
    Incremented,
    /// Nothing changed: the line is already at its per-item limit.
    ItemLimitReached,
    /// Nothing changed: the cart is at the global limit.
    CartFull,
}

impl AddOutcome {
    /// Whether the cart changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Added | Self::Incremented)
    }
}

/// Ordered collection of lines, keyed by item id.
///
/// Serializes as a plain JSON array of lines. Deserializing re-applies the
/// caps, so a hand-edited or stale array can never yield an invalid cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from arbitrary lines, enforcing every invariant.
    ///
    /// Duplicate item ids after the first are dropped, quantities are
    /// clamped into `1..=per_item_limit`, and lines that no longer fit
    /// under the global limit are shrunk or dropped, in order.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for mut line in lines {
            if cart.find(&line.item_id).is_some() {
                continue;
            }
            let room = GLOBAL_CART_LIMIT.saturating_sub(cart.total_count());
            if room == 0 {
                break;
            }
            line.per_item_limit = line.per_item_limit.max(1);
            line.quantity = line.quantity.clamp(1, line.per_item_limit).min(room);
            cart.lines.push(line);
        }
        cart
    }

    /// Add one unit of `candidate`'s item.
    ///
    /// An existing line goes up by one, capped at its per-item limit. A new
    /// line starts at quantity 1, whatever quantity `candidate` carries.
    /// Either way nothing changes if the cart is already at the global
    /// limit.
    pub fn add_item(&mut self, candidate: CartLine) -> AddOutcome {
        let total = self.total_count();
        if total >= GLOBAL_CART_LIMIT {
            return AddOutcome::CartFull;
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.item_id == candidate.item_id)
        {
            Some(line) if line.quantity >= line.per_item_limit => AddOutcome::ItemLimitReached,
            Some(line) => {
                line.quantity += 1;
                AddOutcome::Incremented
            }
            None => {
                self.lines.push(CartLine {
                    quantity: 1,
                    per_item_limit: candidate.per_item_limit.max(1),
                    ..candidate
                });
                AddOutcome::Added
            }
        }
    }

    /// Set a line's quantity, clamped to fit.
    ///
    /// The stored quantity is `requested` limited by the line's per-item
    /// limit and by the room the other lines leave under the global limit,
    /// and never below 1. Returns the stored quantity, or `None` if the
    /// item is not in the cart.
    pub fn set_quantity(&mut self, item_id: &ItemId, requested: u32) -> Option<u32> {
        let others: u32 = self
            .lines
            .iter()
            .filter(|line| &line.item_id != item_id)
            .map(|line| line.quantity)
            .sum();
        let line = self.lines.iter_mut().find(|line| &line.item_id == item_id)?;

        line.quantity = requested
            .min(line.per_item_limit)
            .min(GLOBAL_CART_LIMIT.saturating_sub(others))
            .max(1);
        Some(line.quantity)
    }

    /// Remove a line. Returns whether it was present.
    pub fn remove_item(&mut self, item_id: &ItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.item_id != item_id);
        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    #[must_use]
    pub fn has_reached_global_limit(&self) -> bool {
        self.total_count() >= GLOBAL_CART_LIMIT
    }

    #[must_use]
    pub fn find(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item_id == item_id)
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
