//! Store page: the catalog with per-item cart controls.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Catalog item display data for templates.
#[derive(Debug, Clone)]
pub struct StoreItemView {
    pub id: i64,
    pub name: String,
    pub img_url: String,
    pub price: String,
    /// Units of this item currently in the cart.
    pub quantity: u32,
}

/// Store page template.
#[derive(Template, WebTemplate)]
#[template(path = "store/index.html")]
pub struct StoreIndexTemplate {
    pub items: Vec<StoreItemView>,
    pub cart: CartView,
}

/// Display the store page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<StoreIndexTemplate> {
    let currency = state.config().currency;
    let cart = state.cart()?;

    let items = state
        .catalog()
        .items()
        .iter()
        .map(|item| StoreItemView {
            id: item.id.as_i64(),
            name: item.name.clone(),
            img_url: item.img_url.clone(),
            price: item.unit_price(currency).display(),
            quantity: cart.item_quantity(item.id),
        })
        .collect();

    Ok(StoreIndexTemplate {
        items,
        cart: CartView::build(&cart, state.catalog(), currency),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopcart_core::{CurrencyCode, ItemId};

    use crate::cart::ShoppingCart;
    use crate::catalog::Catalog;
    use crate::storage::CartStorage;

    fn render(ids: &[i64]) -> String {
        let catalog = Catalog::bundled().unwrap();
        let mut cart = ShoppingCart::load(CartStorage::in_memory());
        for &id in ids {
            cart.increase_quantity(ItemId::new(id));
        }

        let items = catalog
            .items()
            .iter()
            .map(|item| StoreItemView {
                id: item.id.as_i64(),
                name: item.name.clone(),
                img_url: item.img_url.clone(),
                price: item.unit_price(CurrencyCode::USD).display(),
                quantity: cart.item_quantity(item.id),
            })
            .collect();

        StoreIndexTemplate {
            items,
            cart: CartView::build(&cart, &catalog, CurrencyCode::USD),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_store_page_with_empty_cart() {
        let html = render(&[]);
        assert_eq!(html.matches("+ Add To Cart").count(), 4);
        assert!(html.contains("id=\"cart-button\""));
        assert!(!html.contains("hx-post=\"/cart/open\""));
    }

    #[test]
    fn test_store_page_shows_quantities_and_cart_button() {
        let html = render(&[2, 2]);
        assert_eq!(html.matches("+ Add To Cart").count(), 3);
        assert!(html.contains("<strong>2</strong> in cart"));
        assert!(html.contains("hx-post=\"/cart/open\""));
    }
}
