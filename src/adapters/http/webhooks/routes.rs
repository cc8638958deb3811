//! Webhook router.
//!
//! No user authentication here: the payment route trusts only what it
//! fetches back from the processor, and the compliance routes are verified
//! by signature.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    customers_data_request, customers_redact, handle_payment_notification, order_paid_health,
    store_redact,
};
use crate::adapters::http::AppState;

/// Create the webhook router.
///
/// # Routes
///
/// - `GET /order-paid` - healthcheck
/// - `POST /order-paid` - payment notification (query, IPN or JSON body)
/// - `POST /store-redact` - signed store erasure request
/// - `POST /customers-redact` - signed customer erasure request
/// - `POST /customers-data-request` - signed customer export request
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/order-paid",
            get(order_paid_health).post(handle_payment_notification),
        )
        .route("/store-redact", post(store_redact))
        .route("/customers-redact", post(customers_redact))
        .route("/customers-data-request", post(customers_data_request))
}
