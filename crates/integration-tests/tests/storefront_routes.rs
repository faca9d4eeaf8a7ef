//! Integration tests for the storefront HTTP surface.
//!
//! Requests go straight through the router with `tower::ServiceExt::oneshot`,
//! no socket involved.

use axum::http::StatusCode;
use serde_json::Value;

use shopcart_core::ItemId;
use shopcart_integration_tests::{body_text, get, post_form, send, test_app};
use shopcart_storefront::CART_STORAGE_KEY;
use shopcart_storefront::storage::CartStorage;

async fn api_cart(app: &axum::Router) -> Value {
    let response = send(app, get("/api/cart")).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_text(response).await).expect("cart JSON")
}

// =============================================================================
// Basic Endpoints
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = test_app(CartStorage::in_memory());
    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_store_page_lists_catalog() {
    let app = test_app(CartStorage::in_memory());
    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    for name in ["Book", "Computer", "Banana", "Car"] {
        assert!(html.contains(name), "store page should list {name}");
    }
    assert!(html.contains("$14,000.00"));
    assert!(html.contains("+ Add To Cart"));
}

// =============================================================================
// Mutation Endpoints
// =============================================================================

#[tokio::test]
async fn test_increase_returns_controls_and_trigger() {
    let app = test_app(CartStorage::in_memory());

    let response = send(&app, post_form("/cart/increase", "id=2")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("HX-Trigger").expect("HX-Trigger header"),
        "cart-updated"
    );
    let html = body_text(response).await;
    assert!(html.contains("<strong>1</strong> in cart"));

    let response = send(&app, get("/cart/count")).await;
    assert!(body_text(response).await.contains('1'));
}

#[tokio::test]
async fn test_cart_button_appears_after_first_increase() {
    let app = test_app(CartStorage::in_memory());

    let page = body_text(send(&app, get("/")).await).await;
    assert!(page.contains("hx-get=\"/cart/button\""));
    assert!(!page.contains("hx-post=\"/cart/open\""));

    let button = body_text(send(&app, get("/cart/button")).await).await;
    assert!(!button.contains("/cart/open"));

    send(&app, post_form("/cart/increase", "id=1")).await;

    let button = body_text(send(&app, get("/cart/button")).await).await;
    assert!(button.contains("hx-post=\"/cart/open\""));
    assert!(button.contains(">1</span>"));

    let response = send(&app, post_form("/cart/open", "")).await;
    assert!(body_text(response).await.contains("cart-panel open"));
}

#[tokio::test]
async fn test_scenario_increase_then_remove() {
    let storage = CartStorage::in_memory();
    let app = test_app(storage.clone());

    send(&app, post_form("/cart/increase", "id=5")).await;
    send(&app, post_form("/cart/increase", "id=5")).await;
    send(&app, post_form("/cart/increase", "id=3")).await;

    let state = api_cart(&app).await;
    assert_eq!(state["cart_quantity"], 3);
    assert_eq!(
        state["entries"],
        serde_json::json!([{"id": 5, "quantity": 2}, {"id": 3, "quantity": 1}])
    );
    // id 5 is not in the catalog, only Banana renders
    assert_eq!(state["lines"].as_array().expect("lines array").len(), 1);
    assert_eq!(state["lines"][0]["name"], "Banana");
    assert_eq!(state["total_display"], "$1.05");

    let response = send(&app, post_form("/cart/remove", "id=3")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Your cart is empty"));

    let state = api_cart(&app).await;
    assert_eq!(
        state["entries"],
        serde_json::json!([{"id": 5, "quantity": 2}])
    );

    let persisted: Value = storage.try_load(CART_STORAGE_KEY)
        .expect("storage readable")
        .expect("cart persisted");
    assert_eq!(persisted, serde_json::json!([{"id": 5, "quantity": 2}]));
}

#[tokio::test]
async fn test_decrease_collapses_to_zero() {
    let app = test_app(CartStorage::in_memory());
    send(&app, post_form("/cart/increase", "id=1")).await;
    send(&app, post_form("/cart/increase", "id=1")).await;

    let response = send(&app, post_form("/cart/decrease", "id=1")).await;
    assert!(body_text(response).await.contains("<strong>1</strong> in cart"));

    let response = send(&app, post_form("/cart/decrease", "id=1")).await;
    assert!(body_text(response).await.contains("+ Add To Cart"));

    let state = api_cart(&app).await;
    assert_eq!(state["entries"], serde_json::json!([]));
    assert_eq!(state["cart_quantity"], 0);
}

#[tokio::test]
async fn test_decrease_unknown_item_is_noop() {
    let app = test_app(CartStorage::in_memory());
    send(&app, post_form("/cart/increase", "id=4")).await;

    let response = send(&app, post_form("/cart/decrease", "id=2")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let state = api_cart(&app).await;
    assert_eq!(state["entries"], serde_json::json!([{"id": 4, "quantity": 1}]));
}

#[tokio::test]
async fn test_invalid_form_is_rejected() {
    let app = test_app(CartStorage::in_memory());
    let response = send(&app, post_form("/cart/increase", "id=banana")).await;
    assert!(response.status().is_client_error());

    let state = api_cart(&app).await;
    assert_eq!(state["cart_quantity"], 0);
}

// =============================================================================
// Display Flag
// =============================================================================

#[tokio::test]
async fn test_open_and_close_panel() {
    let app = test_app(CartStorage::in_memory());
    assert_eq!(api_cart(&app).await["display"], "closed");

    let response = send(&app, post_form("/cart/open", "")).await;
    assert!(body_text(response).await.contains("cart-panel open"));
    assert_eq!(api_cart(&app).await["display"], "open");

    send(&app, post_form("/cart/close", "")).await;
    let response = send(&app, post_form("/cart/close", "")).await;
    assert!(body_text(response).await.contains("cart-panel closed"));
    assert_eq!(api_cart(&app).await["display"], "closed");
}

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn test_cart_items_fragment_renders_lines() {
    let app = test_app(CartStorage::in_memory());
    send(&app, post_form("/cart/increase", "id=1")).await;
    send(&app, post_form("/cart/increase", "id=1")).await;
    send(&app, post_form("/cart/increase", "id=2")).await;

    let html = body_text(send(&app, get("/cart/items")).await).await;
    assert!(html.contains("Book"));
    assert!(html.contains("x2"));
    assert!(html.contains("$21.98"));
    assert!(html.contains("$1,199.00"));
    assert!(html.contains("Total $1,220.98"));
}

#[tokio::test]
async fn test_quantity_query() {
    let app = test_app(CartStorage::in_memory());
    send(&app, post_form("/cart/increase", "id=3")).await;

    let html = body_text(send(&app, get("/cart/quantity?id=3")).await).await;
    assert!(html.contains("<strong>1</strong> in cart"));

    let html = body_text(send(&app, get("/cart/quantity?id=4")).await).await;
    assert!(html.contains("+ Add To Cart"));
}

#[tokio::test]
async fn test_cart_restored_from_storage() {
    let storage = CartStorage::in_memory();
    storage
        .save(CART_STORAGE_KEY, &serde_json::json!([{"id": 4, "quantity": 2}]))
        .expect("seed stored cart");
    let app = test_app(storage);

    let state = api_cart(&app).await;
    assert_eq!(state["cart_quantity"], 2);
    assert_eq!(state["total_display"], "$28,000.00");
    assert_eq!(state["lines"][0]["id"], ItemId::new(4).as_i64());
}
