//! Catalog listing.

use std::fmt::Write as _;

use shopcart_core::CurrencyCode;
use shopcart_storefront::ShoppingCart;
use shopcart_storefront::catalog::Catalog;

use super::Context;

/// Print every catalog item with its cart quantity.
#[allow(clippy::print_stdout)]
pub fn list(ctx: &Context) {
    print!("{}", render_catalog(&ctx.catalog, &ctx.cart, ctx.currency));
}

#[must_use]
pub fn render_catalog(catalog: &Catalog, cart: &ShoppingCart, currency: CurrencyCode) -> String {
    let mut out = String::new();
    for item in catalog.items() {
        let _ = writeln!(
            out,
            "{:>4}  {:<20} {:>12}  in cart: {}",
            item.id,
            item.name,
            item.unit_price(currency).display(),
            cart.item_quantity(item.id),
        );
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopcart_core::ItemId;
    use shopcart_storefront::storage::CartStorage;

    use super::*;

    #[test]
    fn test_render_catalog_shows_quantities() {
        let catalog = Catalog::bundled().unwrap();
        let mut cart = ShoppingCart::load(CartStorage::in_memory());
        cart.increase_quantity(ItemId::new(4));

        let text = render_catalog(&catalog, &cart, CurrencyCode::USD);
        assert_eq!(text.lines().count(), 4);
        let car = text.lines().find(|l| l.contains("Car")).unwrap();
        assert!(car.contains("$14,000.00"));
        assert!(car.ends_with("in cart: 1"));
        assert!(text.lines().next().unwrap().ends_with("in cart: 0"));
    }
}
