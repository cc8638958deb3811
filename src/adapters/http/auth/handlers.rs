//! OAuth install-callback handler.
//!
//! The storefront platform redirects here after the merchant authorizes
//! the app. The authorization code is exchanged for the first credential
//! record, which seeds the token store.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::adapters::http::AppState;

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub store_id: Option<String>,
}

/// `GET /auth/callback` - authorization-code exchange.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallbackParams>,
) -> Response {
    let (Some(code), Some(store_id)) = (params.code, params.store_id) else {
        return (StatusCode::BAD_REQUEST, "code or store_id missing").into_response();
    };

    let grant = match state.oauth.exchange_code(&code).await {
        Ok(grant) => grant,
        Err(err) => {
            tracing::error!(store_id = %store_id, error = %err, "authorization code exchange failed");
            return (StatusCode::BAD_GATEWAY, "token exchange failed").into_response();
        }
    };

    match state.credentials.store_grant(grant).await {
        Ok(_) => {
            tracing::info!(store_id = %store_id, "installation credential stored");
            (StatusCode::OK, "tokens stored").into_response()
        }
        Err(err) => {
            tracing::error!(store_id = %store_id, error = %err, "installation credential could not be persisted");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to store tokens").into_response()
        }
    }
}
