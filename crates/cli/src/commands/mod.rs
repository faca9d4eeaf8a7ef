//! CLI subcommands.

pub mod cart;
pub mod catalog;

use std::path::Path;

use thiserror::Error;

use shopcart_core::CurrencyCode;
use shopcart_storefront::catalog::{Catalog, CatalogError};
use shopcart_storefront::storage::{CartStorage, FileStore, StorageError};
use shopcart_storefront::ShoppingCart;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The store rejected a direct operation.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart changed in memory but could not be written back.
    #[error("Cart could not be saved to {0}")]
    PersistFailed(String),
}

/// Everything a command needs: the restored cart and the catalog.
pub struct Context {
    pub cart: ShoppingCart,
    pub catalog: Catalog,
    pub currency: CurrencyCode,
    storage: CartStorage,
    storage_dir: String,
}

impl Context {
    /// Restore the cart from `storage_dir` and load the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Catalog` if the catalog file is unreadable.
    pub fn open(
        storage_dir: &Path,
        quota_bytes: usize,
        catalog_path: Option<&Path>,
        currency: CurrencyCode,
    ) -> Result<Self, CommandError> {
        let catalog = match catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::bundled()?,
        };
        let storage = CartStorage::new(FileStore::with_quota(storage_dir, quota_bytes));

        Ok(Self::from_parts(
            storage,
            catalog,
            currency,
            storage_dir.display().to_string(),
        ))
    }

    fn from_parts(
        storage: CartStorage,
        catalog: Catalog,
        currency: CurrencyCode,
        storage_dir: String,
    ) -> Self {
        Self {
            cart: ShoppingCart::load(storage.clone()),
            catalog,
            currency,
            storage,
            storage_dir,
        }
    }

    /// Fail if the last cart mutation was not persisted.
    fn ensure_saved(&self) -> Result<(), CommandError> {
        if self.cart.last_persist_failed() {
            return Err(CommandError::PersistFailed(self.storage_dir.clone()));
        }
        Ok(())
    }
}
