//! Service entry point: configuration, wiring and the axum server.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use storefront_bridge::adapters::compliance::LoggingComplianceSink;
use storefront_bridge::adapters::http::{api_router, AppState};
use storefront_bridge::adapters::ledger::InMemoryReconciliationLedger;
use storefront_bridge::adapters::mercado_pago::{MercadoPagoClient, MercadoPagoConfig};
use storefront_bridge::adapters::storage::FileTokenStore;
use storefront_bridge::adapters::storefront::{
    OAuthConfig, StorefrontApiConfig, StorefrontOAuthClient, StorefrontOrdersClient,
};
use storefront_bridge::application::{
    CheckoutCurrency, CheckoutUrls, CreateCheckoutHandler, CredentialLifecycleManager,
    PaymentNotificationReconciler,
};
use storefront_bridge::config::AppConfig;
use storefront_bridge::domain::compliance::WebhookVerifier;
use storefront_bridge::domain::order::ForwardingPolicy;
use storefront_bridge::ports::SystemClock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    config.validate()?;

    let clock = Arc::new(SystemClock);
    let storefront_timeout = Duration::from_secs(config.storefront.timeout_secs);

    let token_store = Arc::new(FileTokenStore::new(&config.storefront.token_file));
    let oauth_client = Arc::new(StorefrontOAuthClient::new(OAuthConfig {
        token_url: config.storefront.token_url.clone(),
        client_id: config.storefront.client_id.clone(),
        client_secret: SecretString::new(config.storefront.client_secret.clone()),
        redirect_uri: config.storefront.redirect_uri.clone(),
        user_agent: config.storefront.user_agent.clone(),
        timeout: storefront_timeout,
    }));

    let mut credentials =
        CredentialLifecycleManager::new(token_store, oauth_client.clone(), clock.clone());
    if let Some(fallback) = &config.storefront.fallback_access_token {
        credentials = credentials.with_fallback_token(fallback.clone());
    }
    let credentials = Arc::new(credentials);

    let gateway = Arc::new(MercadoPagoClient::new(MercadoPagoConfig {
        access_token: SecretString::new(config.payment.access_token.clone()),
        api_base_url: config.payment.api_base_url.clone(),
        timeout: Duration::from_secs(config.payment.timeout_secs),
    }));

    let orders = Arc::new(StorefrontOrdersClient::new(StorefrontApiConfig {
        api_base_url: config.storefront.api_base_url.clone(),
        store_id: config.storefront.store_id.clone(),
        user_agent: config.storefront.user_agent.clone(),
        timeout: storefront_timeout,
    }));

    let reconciler = Arc::new(PaymentNotificationReconciler::new(
        gateway.clone(),
        orders,
        credentials.clone(),
        Arc::new(InMemoryReconciliationLedger::new()),
        clock,
        ForwardingPolicy {
            default_province: config.storefront.default_province.clone(),
            country: config.storefront.country.clone(),
            shipping_carrier: config.storefront.shipping_carrier.clone(),
            shipping_option: config.storefront.shipping_option.clone(),
            shipping_cost: config.storefront.shipping_cost,
        },
    ));

    let checkout = Arc::new(CreateCheckoutHandler::new(
        gateway,
        CheckoutUrls {
            front_url: config.payment.front_url.clone(),
            back_url: config.payment.back_url.clone(),
        },
        CheckoutCurrency(config.payment.currency.clone()),
    ));

    let state = AppState {
        reconciler,
        verifier: Arc::new(WebhookVerifier::new(config.storefront.client_secret.clone())),
        compliance: Arc::new(LoggingComplianceSink::new()),
        checkout,
        credentials,
        oauth: oauth_client,
    };

    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "storefront bridge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
    }
}
