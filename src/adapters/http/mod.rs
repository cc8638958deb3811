//! HTTP adapters - axum routes and handlers.
//!
//! Three route groups: the payment/compliance webhooks, the checkout API
//! consumed by the storefront frontend, and the OAuth install callback.

pub mod auth;
pub mod orders;
pub mod webhooks;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::application::{
    CreateCheckoutHandler, CredentialLifecycleManager, PaymentNotificationReconciler,
};
use crate::domain::compliance::WebhookVerifier;
use crate::ports::{ComplianceSink, OAuthClient};

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<PaymentNotificationReconciler>,
    pub verifier: Arc<WebhookVerifier>,
    pub compliance: Arc<dyn ComplianceSink>,
    pub checkout: Arc<CreateCheckoutHandler>,
    pub credentials: Arc<CredentialLifecycleManager>,
    pub oauth: Arc<dyn OAuthClient>,
}

/// Assemble the full API router.
///
/// # Routes
///
/// - `GET /` - liveness probe
/// - `/webhooks/*` - payment notifications and compliance callbacks
/// - `/api/orders/*` - checkout creation for the frontend
/// - `/auth/*` - OAuth install callback
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/webhooks", webhooks::webhook_routes())
        .nest("/api/orders", orders::order_routes())
        .nest("/auth", auth::auth_routes())
        .with_state(state)
}

async fn root() -> &'static str {
    "storefront bridge is running"
}
