//! Read-only product catalog.
//!
//! The catalog is a static JSON list of purchasable items. Carts only hold
//! item IDs, so every price, name and image shown next to a cart line comes
//! from here. The catalog is loaded once and never mutated.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopcart_core::{CurrencyCode, ItemId, Price};

/// Catalog compiled into the binary, used when no path is configured.
const BUNDLED_ITEMS: &str = include_str!("../data/items.json");

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate catalog item id {0}")]
    DuplicateId(ItemId),
    #[error("catalog item {0} has a negative price")]
    NegativePrice(ItemId),
}

/// A purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreItem {
    pub id: ItemId,
    pub name: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    pub img_url: String,
}

impl StoreItem {
    /// Unit price tagged with the store currency.
    #[must_use]
    pub const fn unit_price(&self, currency: CurrencyCode) -> Price {
        Price::new(self.price, currency)
    }
}

/// The full list of store items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<StoreItem>,
}

impl Catalog {
    /// Build a catalog from items, validating ids and prices.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on a repeated id or a negative price.
    pub fn new(items: Vec<StoreItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            if item.price.is_sign_negative() && !item.price.is_zero() {
                return Err(CatalogError::NegativePrice(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Parse a catalog from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<StoreItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), items = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// The catalog shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled file is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_ITEMS)
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&StoreItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items in catalog order.
    #[must_use]
    pub fn items(&self) -> &[StoreItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
