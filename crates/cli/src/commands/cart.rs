//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! cart-cli show
//! cart-cli increase 3
//! cart-cli decrease 3
//! cart-cli remove 3
//! cart-cli reset
//! ```

use std::fmt::Write as _;

use shopcart_core::{CurrencyCode, ItemId};
use shopcart_storefront::catalog::Catalog;
use shopcart_storefront::{CART_STORAGE_KEY, ShoppingCart};

use super::{CommandError, Context};

/// Print the cart.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    print!("{}", render_cart(&ctx.cart, &ctx.catalog, ctx.currency));
}

/// Add one unit of `id` and print the new quantity.
///
/// # Errors
///
/// Returns `CommandError::PersistFailed` if the cart could not be saved.
pub fn increase(mut ctx: Context, id: ItemId) -> Result<(), CommandError> {
    ctx.cart.increase_quantity(id);
    if ctx.catalog.get(id).is_none() {
        tracing::warn!(%id, "item is not in the catalog; it will not be shown");
    }
    report_quantity(&ctx, id)
}

/// Remove one unit of `id` and print the new quantity.
///
/// # Errors
///
/// Returns `CommandError::PersistFailed` if the cart could not be saved.
pub fn decrease(mut ctx: Context, id: ItemId) -> Result<(), CommandError> {
    ctx.cart.decrease_quantity(id);
    report_quantity(&ctx, id)
}

/// Remove `id` from the cart.
///
/// # Errors
///
/// Returns `CommandError::PersistFailed` if the cart could not be saved.
pub fn remove(mut ctx: Context, id: ItemId) -> Result<(), CommandError> {
    ctx.cart.remove_from_cart(id);
    report_quantity(&ctx, id)
}

/// Delete the persisted cart.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the stored cart could not be removed.
#[allow(clippy::print_stdout)]
pub fn reset(ctx: &Context) -> Result<(), CommandError> {
    ctx.storage.clear(CART_STORAGE_KEY)?;
    tracing::info!(dir = %ctx.storage_dir, "cart reset");
    println!("Cart cleared.");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn report_quantity(ctx: &Context, id: ItemId) -> Result<(), CommandError> {
    ctx.ensure_saved()?;
    println!(
        "item {id}: {} in cart ({} total)",
        ctx.cart.item_quantity(id),
        ctx.cart.cart_quantity()
    );
    Ok(())
}

/// Render cart lines, total quantity and grand total as plain text.
///
/// Entries missing from the catalog are not listed but still count toward
/// the total quantity.
#[must_use]
pub fn render_cart(cart: &ShoppingCart, catalog: &Catalog, currency: CurrencyCode) -> String {
    let mut out = String::new();
    if cart.items().is_empty() {
        out.push_str("Cart is empty.\n");
        return out;
    }

    for line in cart.line_items(catalog) {
        let badge = if line.quantity > 1 {
            format!(" x{}", line.quantity)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "{:>4}  {:<20} {:>12} {:>14}",
            line.item.id,
            format!("{}{badge}", line.item.name),
            line.item.unit_price(currency).display(),
            line.line_total(currency).display(),
        );
    }
    let _ = writeln!(out, "Items: {}", cart.cart_quantity());
    let _ = writeln!(out, "Total: {}", cart.total(catalog, currency).display());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopcart_storefront::storage::CartStorage;

    use super::*;

    #[test]
    fn test_render_empty_cart() {
        let cart = ShoppingCart::load(CartStorage::in_memory());
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(
            render_cart(&cart, &catalog, CurrencyCode::USD),
            "Cart is empty.\n"
        );
    }

    #[test]
    fn test_reset_deletes_persisted_cart() {
        let storage = CartStorage::in_memory();
        let ctx = Context::from_parts(
            storage.clone(),
            Catalog::bundled().unwrap(),
            CurrencyCode::USD,
            "memory".to_string(),
        );
        increase(ctx, ItemId::new(1)).unwrap();
        assert_eq!(ShoppingCart::load(storage.clone()).cart_quantity(), 1);

        let ctx = Context::from_parts(
            storage.clone(),
            Catalog::bundled().unwrap(),
            CurrencyCode::USD,
            "memory".to_string(),
        );
        reset(&ctx).unwrap();

        assert!(storage
            .try_load::<shopcart_core::CartItems>(CART_STORAGE_KEY)
            .unwrap()
            .is_none());
        assert_eq!(ShoppingCart::load(storage).cart_quantity(), 0);
    }

    #[test]
    fn test_render_lines_and_totals() {
        let mut cart = ShoppingCart::load(CartStorage::in_memory());
        let catalog = Catalog::bundled().unwrap();
        cart.increase_quantity(ItemId::new(2));
        cart.increase_quantity(ItemId::new(3));
        cart.increase_quantity(ItemId::new(3));
        cart.increase_quantity(ItemId::new(77));

        let text = render_cart(&cart, &catalog, CurrencyCode::USD);
        assert!(text.contains("Computer"));
        assert!(text.contains("Banana x2"));
        assert!(text.contains("$1,199.00"));
        assert!(text.contains("$2.10"));
        assert!(text.contains("Items: 4"));
        assert!(text.contains("Total: $1,201.10"));
        assert!(!text.contains("77"));
    }
}
