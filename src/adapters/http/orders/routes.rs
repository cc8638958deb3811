//! Checkout router.

use axum::routing::post;
use axum::Router;

use super::handlers::create_checkout;
use crate::adapters::http::AppState;

/// Create the orders router.
///
/// # Routes
///
/// - `POST /create-checkout` - build a hosted-checkout preference
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/create-checkout", post(create_checkout))
}
