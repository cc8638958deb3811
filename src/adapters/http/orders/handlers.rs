//! Checkout HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::dto::{CheckoutResponse, CreateCheckoutRequest, ErrorResponse};
use crate::adapters::http::AppState;
use crate::application::CheckoutError;

/// `POST /api/orders/create-checkout` - open a hosted checkout for a cart.
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Response {
    match state.checkout.create(request.into_intent()).await {
        Ok(session) => (StatusCode::OK, Json(CheckoutResponse::from(session))).into_response(),
        Err(CheckoutError::InvalidIntent) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("incomplete checkout data (items/total)")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "checkout preference creation failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("failed to create checkout preference")),
            )
                .into_response()
        }
    }
}
