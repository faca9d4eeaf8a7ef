//! Integration tests for shopcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart survives restarts through the file store
//! - `storefront_routes` - HTTP surface driven through the router
//!
//! This library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use tower::ServiceExt;

use shopcart_storefront::catalog::Catalog;
use shopcart_storefront::config::StorefrontConfig;
use shopcart_storefront::routes;
use shopcart_storefront::state::AppState;
use shopcart_storefront::storage::CartStorage;
use shopcart_storefront::ShoppingCart;

/// A unique directory under the system temp dir, deleted on drop.
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    /// Reserve a fresh directory path. The directory itself is created lazily
    /// by whatever writes into it.
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            path: std::env::temp_dir().join(format!("shopcart-{label}-{}", uuid::Uuid::new_v4())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Build the storefront router over the bundled catalog and `storage`.
///
/// # Panics
///
/// Panics if the bundled catalog is malformed.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_app(storage: CartStorage) -> Router {
    let catalog = Catalog::bundled().expect("bundled catalog parses");
    let state = AppState::new(
        StorefrontConfig::default(),
        catalog,
        ShoppingCart::load(storage),
    );
    routes::app(state)
}

/// Send one request through the router.
///
/// # Panics
///
/// Panics if the router returns an error (it is infallible).
#[allow(clippy::expect_used)]
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

/// `GET path`.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .expect("valid request")
}

/// `POST path` with a form-encoded body.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn post_form(path: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("valid request")
}

/// Read a response body as UTF-8.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
#[allow(clippy::expect_used)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
