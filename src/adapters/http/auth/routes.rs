//! Auth router.

use axum::routing::get;
use axum::Router;

use super::handlers::oauth_callback;
use crate::adapters::http::AppState;

/// Create the auth router.
///
/// # Routes
///
/// - `GET /callback` - OAuth install callback (code exchange)
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/callback", get(oauth_callback))
}
