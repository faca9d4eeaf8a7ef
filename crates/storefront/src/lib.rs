//! shopcart storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! # Modules
//!
//! - [`cart`] - The cart state manager and its rendering helpers
//! - [`catalog`] - Read-only list of store items
//! - [`storage`] - Key-value persistence for the cart
//! - [`routes`] - HTTP handlers and askama templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;

pub use cart::{CART_STORAGE_KEY, CartDisplay, CartLine, ShoppingCart};
pub use catalog::{Catalog, CatalogError, StoreItem};
pub use storage::{CartStorage, FileStore, KeyValueStore, MemoryStore, StorageError};
