//! Core types for shopcart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;

pub use cart::{CartEntry, CartItems};
pub use id::*;
pub use price::{CurrencyCode, CurrencyParseError, Price, format_currency};
