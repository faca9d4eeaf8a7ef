//! Cart state manager.
//!
//! [`ShoppingCart`] owns the cart contents and the cart panel flag. It loads
//! its entries from [`CartStorage`] once, applies every mutation through the
//! [`CartItems`] reducer, and writes the full entry list back after each
//! mutation.
//!
//! The in-memory entries are authoritative. A failed write is reported and
//! otherwise ignored: the mutation stands and the next successful write
//! brings storage back in line.

use rust_decimal::Decimal;
use serde::Serialize;

use shopcart_core::{CartItems, CurrencyCode, ItemId, Price};

use crate::catalog::{Catalog, StoreItem};
use crate::error::report_storage_failure;
use crate::storage::{CartStorage, StorageError};

/// Storage key holding the persisted entries.
pub const CART_STORAGE_KEY: &str = "shopping-cart";

/// Whether the cart panel is shown.
///
/// Not persisted: every new [`ShoppingCart`] starts `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartDisplay {
    Open,
    #[default]
    Closed,
}

/// One renderable cart line: a cart entry joined with its catalog item.
#[derive(Debug, Clone, Copy)]
pub struct CartLine<'a> {
    pub item: &'a StoreItem,
    pub quantity: u32,
}

impl CartLine<'_> {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self, currency: CurrencyCode) -> Price {
        self.item.unit_price(currency).times(self.quantity)
    }
}

/// The cart contents, the panel flag and the storage they are saved to.
#[derive(Debug)]
pub struct ShoppingCart {
    items: CartItems,
    display: CartDisplay,
    storage: CartStorage,
    last_persist_failed: bool,
}

impl ShoppingCart {
    /// Restore the cart from storage.
    ///
    /// Missing or unreadable data yields an empty cart. The panel starts
    /// closed.
    #[must_use]
    pub fn load(storage: CartStorage) -> Self {
        let items: CartItems = storage.load(CART_STORAGE_KEY, CartItems::new());
        tracing::debug!(
            entries = items.len(),
            quantity = items.total_quantity(),
            "cart restored"
        );
        Self {
            items,
            display: CartDisplay::Closed,
            storage,
            last_persist_failed: false,
        }
    }

    /// Current entries.
    #[must_use]
    pub const fn items(&self) -> &CartItems {
        &self.items
    }

    /// Quantity of `id` in the cart, 0 if absent.
    #[must_use]
    pub fn item_quantity(&self, id: ItemId) -> u32 {
        self.items.quantity(id)
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn cart_quantity(&self) -> u32 {
        self.items.total_quantity()
    }

    /// Add one unit of `id`.
    ///
    /// The item does not have to exist in the catalog.
    pub fn increase_quantity(&mut self, id: ItemId) {
        self.items.increase(id);
        tracing::debug!(%id, quantity = self.items.quantity(id), "cart item increased");
        self.persist();
    }

    /// Remove one unit of `id`; the entry disappears when it reaches zero.
    pub fn decrease_quantity(&mut self, id: ItemId) {
        if self.items.decrease(id) {
            tracing::debug!(%id, quantity = self.items.quantity(id), "cart item decreased");
        }
        self.persist();
    }

    /// Drop `id` from the cart whatever its quantity.
    pub fn remove_from_cart(&mut self, id: ItemId) {
        if self.items.remove(id) {
            tracing::debug!(%id, "cart item removed");
        }
        self.persist();
    }

    /// Show the cart panel.
    pub fn open_display(&mut self) {
        self.display = CartDisplay::Open;
    }

    /// Hide the cart panel.
    pub fn close_display(&mut self) {
        self.display = CartDisplay::Closed;
    }

    #[must_use]
    pub const fn display(&self) -> CartDisplay {
        self.display
    }

    #[must_use]
    pub fn is_display_open(&self) -> bool {
        self.display == CartDisplay::Open
    }

    /// Whether the most recent write to storage failed.
    #[must_use]
    pub const fn last_persist_failed(&self) -> bool {
        self.last_persist_failed
    }

    /// Entries joined with their catalog items, in cart order.
    ///
    /// Entries whose id is missing from the catalog are skipped; the cart
    /// itself is left untouched.
    pub fn line_items<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = CartLine<'a>> {
        self.items.iter().filter_map(move |entry| {
            let Some(item) = catalog.get(entry.id) else {
                tracing::debug!(id = %entry.id, "cart entry not in catalog, skipping");
                return None;
            };
            Some(CartLine {
                item,
                quantity: entry.quantity,
            })
        })
    }

    /// Sum of line totals over entries present in the catalog.
    #[must_use]
    pub fn total(&self, catalog: &Catalog, currency: CurrencyCode) -> Price {
        self.line_items(catalog)
            .fold(Price::new(Decimal::ZERO, currency), |total, line| {
                total.plus(line.line_total(currency).amount)
            })
    }

    fn persist(&mut self) {
        match self.try_persist() {
            Ok(()) => self.last_persist_failed = false,
            Err(err) => {
                report_storage_failure(&err, CART_STORAGE_KEY);
                self.last_persist_failed = true;
            }
        }
    }

    fn try_persist(&self) -> Result<(), StorageError> {
        self.storage.save(CART_STORAGE_KEY, &self.items)
    }
}
