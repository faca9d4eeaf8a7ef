//! Cart entries and the quantity reducer.
//!
//! [`CartItems`] is the single source of truth for what is in a cart. Every
//! front end mutates it through the same four operations, so the quantity
//! rules live in exactly one place:
//!
//! - `increase` inserts a new entry at quantity 1 or adds one unit
//! - `decrease` subtracts one unit; an entry at quantity 1 is removed outright
//! - `remove` drops the entry whatever its quantity
//!
//! No entry is ever held at quantity 0.

use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// One distinct item and how many of it are in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartEntry {
    /// Catalog item this entry refers to.
    pub id: ItemId,
    /// Number of units, always at least 1 inside a [`CartItems`].
    pub quantity: u32,
}

impl CartEntry {
    /// Create an entry.
    #[must_use]
    pub const fn new(id: ItemId, quantity: u32) -> Self {
        Self { id, quantity }
    }
}

/// The cart contents: at most one [`CartEntry`] per item, in insertion order.
///
/// Serializes as a plain JSON array of `{"id": .., "quantity": ..}` objects.
/// Deserializing goes through [`CartItems::from_entries`], so stored data
/// with duplicate ids or zero quantities is normalized on the way in.
///
/// Equality ignores order: two carts are equal when they hold the same
/// quantity of every item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct CartItems {
    entries: Vec<CartEntry>,
}

impl CartItems {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries.
    ///
    /// Entries with quantity 0 are dropped. Repeated ids are merged into the
    /// first occurrence by summing their quantities.
    #[must_use]
    pub fn from_entries(raw: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut items = Self::new();
        for entry in raw {
            if entry.quantity == 0 {
                continue;
            }
            match items.position(entry.id) {
                Some(index) => {
                    if let Some(existing) = items.entries.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(entry.quantity);
                    }
                }
                None => items.entries.push(entry),
            }
        }
        items
    }

    /// Quantity held for `id`, or 0 when the item is not in the cart.
    #[must_use]
    pub fn quantity(&self, id: ItemId) -> u32 {
        self.entry(id).map_or(0, |entry| entry.quantity)
    }

    /// The entry for `id`, if any.
    #[must_use]
    pub fn entry(&self, id: ItemId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Whether the cart holds `id`.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.entry(id).is_some()
    }

    /// Add one unit of `id`, inserting it at quantity 1 if absent.
    pub fn increase(&mut self, id: ItemId) {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(1),
            None => self.entries.push(CartEntry::new(id, 1)),
        }
    }

    /// Take one unit of `id` away.
    ///
    /// An entry at quantity 1 is removed rather than kept at 0. Returns
    /// `false` when `id` was not in the cart, in which case nothing changes.
    pub fn decrease(&mut self, id: ItemId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        match self.entries.get_mut(index) {
            Some(entry) if entry.quantity > 1 => entry.quantity -= 1,
            Some(_) => {
                self.entries.remove(index);
            }
            None => return false,
        }
        true
    }

    /// Drop the entry for `id` regardless of its quantity.
    ///
    /// Returns `false` when `id` was not in the cart.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |total, entry| total.saturating_add(entry.quantity))
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

impl PartialEq for CartItems {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|entry| other.quantity(entry.id) == entry.quantity)
    }
}

impl Eq for CartItems {}

impl From<Vec<CartEntry>> for CartItems {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<CartItems> for Vec<CartEntry> {
    fn from(items: CartItems) -> Self {
        items.entries
    }
}

impl FromIterator<CartEntry> for CartItems {
    fn from_iter<T: IntoIterator<Item = CartEntry>>(iter: T) -> Self {
        Self::from_entries(iter)
    }
}

impl<'a> IntoIterator for &'a CartItems {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
