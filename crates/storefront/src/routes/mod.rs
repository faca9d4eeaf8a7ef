//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Store page
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! GET  /cart/items             - Cart items fragment
//! GET  /cart/count             - Cart count badge (fragment)
//! GET  /cart/button            - Navbar cart button, hidden while empty (fragment)
//! GET  /cart/quantity?id=N     - Quantity controls for one item (fragment)
//! POST /cart/increase          - Add one unit (returns quantity controls, triggers cart-updated)
//! POST /cart/decrease          - Remove one unit (returns quantity controls, triggers cart-updated)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/open              - Open the cart panel (returns cart_panel fragment)
//! POST /cart/close             - Close the cart panel (returns cart_panel fragment)
//!
//! # API
//! GET  /api/cart               - Cart state as JSON
//! ```

pub mod api;
pub mod cart;
pub mod store;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/count", get(cart::count))
        .route("/button", get(cart::button))
        .route("/quantity", get(cart::quantity))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
}

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/cart", get(api::cart))
}

/// Create all storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(store::index))
        .nest("/cart", cart_routes())
        .nest("/api", api_routes())
}

/// Build the complete application with state and request tracing applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
