//! Webhook handlers: payment notifications and compliance callbacks.
//!
//! Payment notifications are acknowledged with 200 in every
//! non-authentication case - the processor retries aggressively on non-2xx
//! and uncontrolled redelivery is worse than a logged, manually-recoverable
//! gap. Compliance callbacks are the opposite: they are signed, and an
//! invalid signature is a hard 401 with no downstream dispatch.
//!
//! Compliance verification runs over the raw request bytes exactly as
//! received; parsing happens only after the signature passes.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::dto::NotificationAck;
use crate::adapters::http::AppState;
use crate::domain::compliance::{CustomersDataRequest, CustomersRedact, StoreRedact};
use crate::domain::notification::NotificationEvent;

/// Signature header set by the storefront platform.
const SIGNATURE_HEADER: &str = "x-linkedstore-hmac-sha256";

/// Variant produced by some proxy setups.
const SIGNATURE_HEADER_PREFIXED: &str = "http_x_linkedstore_hmac_sha256";

/// `GET /webhooks/order-paid` - healthcheck used by the processor's
/// endpoint validation.
pub async fn order_paid_health() -> &'static str {
    "OK"
}

/// `POST /webhooks/order-paid` - payment notification ingress.
///
/// Accepts every wire shape the processor uses: query parameters, the
/// legacy IPN form, and the JSON webhook. The body is parsed best-effort;
/// a non-JSON body simply means the query parameters must carry the event.
pub async fn handle_payment_notification(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> impl IntoResponse {
    let body_json: Option<serde_json::Value> = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::debug!("notification body is not JSON; relying on query parameters");
                None
            }
        }
    };

    let event = NotificationEvent::from_wire(&params, body_json.as_ref());
    let outcome = state.reconciler.handle(event).await;

    (StatusCode::OK, Json(NotificationAck::new(outcome)))
}

/// `POST /webhooks/store-redact` - erase all data held for a store.
pub async fn store_redact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !signature_ok(&state, &headers, &body, "store-redact") {
        return unauthorized();
    }

    match serde_json::from_slice::<StoreRedact>(&body) {
        Ok(request) => {
            state.compliance.redact_store(request).await;
            (StatusCode::OK, "OK").into_response()
        }
        Err(err) => logged_parse_failure("store-redact", err),
    }
}

/// `POST /webhooks/customers-redact` - erase data for specific customers.
pub async fn customers_redact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !signature_ok(&state, &headers, &body, "customers-redact") {
        return unauthorized();
    }

    match serde_json::from_slice::<CustomersRedact>(&body) {
        Ok(request) => {
            state.compliance.redact_customers(request).await;
            (StatusCode::OK, "OK").into_response()
        }
        Err(err) => logged_parse_failure("customers-redact", err),
    }
}

/// `POST /webhooks/customers-data-request` - export a customer's data.
pub async fn customers_data_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !signature_ok(&state, &headers, &body, "customers-data-request") {
        return unauthorized();
    }

    match serde_json::from_slice::<CustomersDataRequest>(&body) {
        Ok(request) => {
            state.compliance.export_customer_data(request).await;
            (StatusCode::OK, "OK").into_response()
        }
        Err(err) => logged_parse_failure("customers-data-request", err),
    }
}

fn signature_ok(state: &AppState, headers: &HeaderMap, body: &Bytes, endpoint: &str) -> bool {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .or_else(|| headers.get(SIGNATURE_HEADER_PREFIXED))
        .and_then(|value| value.to_str().ok());

    let verified = state.verifier.verify(body, signature);
    if !verified {
        tracing::warn!(endpoint, "compliance webhook rejected: invalid signature");
    }
    verified
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "invalid signature").into_response()
}

/// A verified payload that fails to parse is acknowledged and logged; the
/// platform does not resend compliance callbacks on our schedule.
fn logged_parse_failure(endpoint: &str, err: serde_json::Error) -> Response {
    tracing::error!(endpoint, error = %err, "compliance payload unparseable");
    (StatusCode::OK, "logged").into_response()
}
