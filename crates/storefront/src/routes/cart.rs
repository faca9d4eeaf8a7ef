//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with the fragment that changed and an
//! `HX-Trigger: cart-updated` header so the badge and panel refresh.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use shopcart_core::{CurrencyCode, ItemId};

use crate::cart::{CartLine, ShoppingCart};
use crate::catalog::Catalog;
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// HTMX event fired after any cart mutation.
pub const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: i64,
    pub name: String,
    pub img_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl CartItemView {
    fn from_line(line: &CartLine<'_>, currency: CurrencyCode) -> Self {
        Self {
            id: line.item.id.as_i64(),
            name: line.item.name.clone(),
            img_url: line.item.img_url.clone(),
            quantity: line.quantity,
            price: line.item.unit_price(currency).display(),
            line_price: line.line_total(currency).display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
    pub is_open: bool,
}

impl CartView {
    /// Snapshot the cart for rendering.
    ///
    /// Lines whose item is missing from the catalog are left out; the item
    /// count still includes them.
    #[must_use]
    pub fn build(cart: &ShoppingCart, catalog: &Catalog, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .line_items(catalog)
                .map(|line| CartItemView::from_line(&line, currency))
                .collect(),
            total: cart.total(catalog, currency).display(),
            item_count: cart.cart_quantity(),
            is_open: cart.is_display_open(),
        }
    }
}

/// Form body or query string naming a single item.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub id: ItemId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Navbar cart button fragment template (for HTMX).
///
/// Renders an empty placeholder while the cart is empty so the button can
/// appear on the first `cart-updated` event.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_button.html")]
pub struct CartButtonTemplate {
    pub count: u32,
}

/// Per-item quantity controls fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/quantity_controls.html")]
pub struct QuantityControlsTemplate {
    pub id: i64,
    pub quantity: u32,
}

fn cart_view(state: &AppState, cart: &ShoppingCart) -> CartView {
    CartView::build(cart, state.catalog(), state.config().currency)
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CartShowTemplate> {
    let cart = state.cart()?;
    Ok(CartShowTemplate {
        cart: cart_view(&state, &cart),
    })
}

/// Cart items fragment (HTMX).
#[instrument(skip(state))]
pub async fn items(State(state): State<AppState>) -> Result<CartItemsTemplate> {
    let cart = state.cart()?;
    Ok(CartItemsTemplate {
        cart: cart_view(&state, &cart),
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<CartCountTemplate> {
    let cart = state.cart()?;
    Ok(CartCountTemplate {
        count: cart.cart_quantity(),
    })
}

/// Get the navbar cart button (HTMX).
#[instrument(skip(state))]
pub async fn button(State(state): State<AppState>) -> Result<CartButtonTemplate> {
    let cart = state.cart()?;
    Ok(CartButtonTemplate {
        count: cart.cart_quantity(),
    })
}

/// Quantity controls for one item (HTMX).
#[instrument(skip(state))]
pub async fn quantity(
    State(state): State<AppState>,
    Query(query): Query<ItemForm>,
) -> Result<QuantityControlsTemplate> {
    let cart = state.cart()?;
    Ok(QuantityControlsTemplate {
        id: query.id.as_i64(),
        quantity: cart.item_quantity(query.id),
    })
}

/// Add one unit of an item (HTMX).
///
/// Returns the item's quantity controls.
#[instrument(skip(state))]
pub async fn increase(
    State(state): State<AppState>,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let mut cart = state.cart()?;
    cart.increase_quantity(form.id);
    cart_breadcrumb("Increased item quantity", form.id);

    Ok(quantity_controls(&cart, form.id))
}

/// Remove one unit of an item (HTMX).
///
/// Returns the item's quantity controls.
#[instrument(skip(state))]
pub async fn decrease(
    State(state): State<AppState>,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let mut cart = state.cart()?;
    cart.decrease_quantity(form.id);
    cart_breadcrumb("Decreased item quantity", form.id);

    Ok(quantity_controls(&cart, form.id))
}

/// Remove an item from the cart (HTMX).
///
/// Returns the refreshed cart items.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<ItemForm>) -> Result<Response> {
    let mut cart = state.cart()?;
    cart.remove_from_cart(form.id);
    cart_breadcrumb("Removed item from cart", form.id);

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart: cart_view(&state, &cart),
        },
    )
        .into_response())
}

/// Open the cart panel (HTMX).
#[instrument(skip(state))]
pub async fn open(State(state): State<AppState>) -> Result<CartPanelTemplate> {
    let mut cart = state.cart()?;
    cart.open_display();
    Ok(CartPanelTemplate {
        cart: cart_view(&state, &cart),
    })
}

/// Close the cart panel (HTMX).
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>) -> Result<CartPanelTemplate> {
    let mut cart = state.cart()?;
    cart.close_display();
    Ok(CartPanelTemplate {
        cart: cart_view(&state, &cart),
    })
}

fn cart_breadcrumb(message: &str, id: ItemId) {
    let id = id.to_string();
    add_breadcrumb("cart", message, Some(&[("item_id", id.as_str())][..]));
}

fn quantity_controls(cart: &ShoppingCart, id: ItemId) -> Response {
    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        QuantityControlsTemplate {
            id: id.as_i64(),
            quantity: cart.item_quantity(id),
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::CartStorage;

    fn cart_with(ids: &[i64]) -> ShoppingCart {
        let mut cart = ShoppingCart::load(CartStorage::in_memory());
        for &id in ids {
            cart.increase_quantity(ItemId::new(id));
        }
        cart
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let catalog = Catalog::bundled().unwrap();
        let cart = cart_with(&[1, 1, 4]);

        let view = CartView::build(&cart, &catalog, CurrencyCode::USD);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].name, "Book");
        assert_eq!(view.items[0].price, "$10.99");
        assert_eq!(view.items[0].line_price, "$21.98");
        assert_eq!(view.items[1].line_price, "$14,000.00");
        assert_eq!(view.total, "$14,021.98");
        assert_eq!(view.item_count, 3);
        assert!(!view.is_open);
    }

    #[test]
    fn test_cart_item_renders_multiplier_only_above_one() {
        let catalog = Catalog::bundled().unwrap();
        let cart = cart_with(&[1, 1, 3]);

        let html = CartItemsTemplate {
            cart: CartView::build(&cart, &catalog, CurrencyCode::USD),
        }
        .render()
        .unwrap();

        assert!(html.contains("Book"));
        assert!(html.contains("x2"));
        assert!(html.contains("Banana"));
        assert!(!html.contains("x1"));
        assert!(html.contains("$21.98"));
    }

    #[test]
    fn test_unknown_item_renders_nothing() {
        let catalog = Catalog::bundled().unwrap();
        let cart = cart_with(&[99]);

        let html = CartItemsTemplate {
            cart: CartView::build(&cart, &catalog, CurrencyCode::USD),
        }
        .render()
        .unwrap();

        assert!(!html.contains("data-item-id=\"99\""));
        assert!(html.contains("$0.00"));
    }

    #[test]
    fn test_empty_cart_message() {
        let catalog = Catalog::bundled().unwrap();
        let cart = cart_with(&[]);

        let html = CartItemsTemplate {
            cart: CartView::build(&cart, &catalog, CurrencyCode::USD),
        }
        .render()
        .unwrap();
        assert!(html.contains("Your cart is empty"));
    }

    #[test]
    fn test_quantity_controls_switch_on_zero() {
        let html = QuantityControlsTemplate { id: 1, quantity: 0 }
            .render()
            .unwrap();
        assert!(html.contains("Add To Cart"));

        let html = QuantityControlsTemplate { id: 1, quantity: 3 }
            .render()
            .unwrap();
        assert!(!html.contains("Add To Cart"));
        assert!(html.contains("<strong>3</strong> in cart"));
        assert!(html.contains("Remove"));
    }

    #[test]
    fn test_cart_button_only_opens_non_empty_cart() {
        let html = CartButtonTemplate { count: 0 }.render().unwrap();
        assert!(html.contains("id=\"cart-button\""));
        assert!(html.contains("hx-get=\"/cart/button\""));
        assert!(!html.contains("/cart/open"));

        let html = CartButtonTemplate { count: 2 }.render().unwrap();
        assert!(html.contains("hx-post=\"/cart/open\""));
        assert!(html.contains(">2</span>"));
    }

    #[test]
    fn test_panel_reflects_display_flag() {
        let catalog = Catalog::bundled().unwrap();
        let mut cart = cart_with(&[2]);
        cart.open_display();

        let html = CartPanelTemplate {
            cart: CartView::build(&cart, &catalog, CurrencyCode::USD),
        }
        .render()
        .unwrap();
        assert!(html.contains("cart-panel open"));
        assert!(html.contains("Computer"));
    }
}
