//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page
//!
//! # Catalog
//! GET  /products                 - Product listing (?category=&search=&sort=)
//! GET  /products/{id}            - Product detail
//! GET  /deals/{slug}             - Deal page
//!
//! # Cart (HTMX fragments)
//! GET  /cart                     - Cart page
//! POST /cart/add                 - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update              - Update quantity (returns cart_items fragment)
//! POST /cart/remove              - Remove item (returns cart_items fragment)
//! POST /cart/clear               - Empty the cart (returns cart_items fragment)
//! GET  /cart/count               - Cart count badge (fragment)
//!
//! # Checkout (POSTs rate limited)
//! GET  /checkout                 - Current checkout step
//! POST /checkout/shipping        - Submit shipping details
//! POST /checkout/back            - Go back one step
//! POST /checkout/payment         - Submit payment method
//! POST /checkout/payment/verify  - Gateway modal callback
//! GET  /checkout/confirmation    - Order confirmation
//! ```

pub mod cart;
pub mod checkout;
pub mod deals;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::checkout_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
///
/// Only the form submissions sit behind the rate limiter.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/shipping", post(checkout::submit_shipping))
        .route("/back", post(checkout::back))
        .route("/payment", post(checkout::submit_payment))
        .route("/payment/verify", post(checkout::verify_payment))
        .layer(checkout_rate_limiter())
        .route("/", get(checkout::show))
        .route("/confirmation", get(checkout::confirmation))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .route("/deals/{slug}", get(deals::show))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
