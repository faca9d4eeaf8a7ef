//! JSON view of the cart.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use shopcart_core::{CartEntry, ItemId, Price};

use crate::cart::CartDisplay;
use crate::error::Result;
use crate::state::AppState;

/// Full cart state as returned by `GET /api/cart`.
#[derive(Debug, Serialize)]
pub struct CartSnapshot {
    /// Persisted entries, in cart order, including ones missing from the catalog.
    pub entries: Vec<CartEntry>,
    pub cart_quantity: u32,
    pub display: CartDisplay,
    /// Renderable lines only.
    pub lines: Vec<LineSnapshot>,
    pub total: Price,
    pub total_display: String,
}

/// One renderable cart line.
#[derive(Debug, Serialize)]
pub struct LineSnapshot {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Current cart state as JSON.
#[instrument(skip(state))]
pub async fn cart(State(state): State<AppState>) -> Result<Json<CartSnapshot>> {
    let currency = state.config().currency;
    let catalog = state.catalog();
    let cart = state.cart()?;

    let lines = cart
        .line_items(catalog)
        .map(|line| LineSnapshot {
            id: line.item.id,
            name: line.item.name.clone(),
            quantity: line.quantity,
            unit_price: line.item.unit_price(currency),
            line_total: line.line_total(currency),
        })
        .collect();
    let total = cart.total(catalog, currency);

    Ok(Json(CartSnapshot {
        entries: cart.items().entries().to_vec(),
        cart_quantity: cart.cart_quantity(),
        display: cart.display(),
        lines,
        total,
        total_display: total.display(),
    }))
}
