//! shopcart core - shared types library.
//!
//! This crate provides the types used across all shopcart components:
//! - `storefront` - Server-rendered store and cart panel
//! - `cli` - Command-line access to the persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP. The cart reducer lives here so that every front end applies the
//! exact same quantity rules.
//!
//! # Modules
//!
//! - [`types`] - Item IDs, prices with currency formatting, and cart entries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
