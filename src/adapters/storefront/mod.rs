//! Storefront platform adapters: orders API and OAuth token endpoint.

mod oauth_client;
mod orders_client;

pub use oauth_client::{OAuthConfig, StorefrontOAuthClient};
pub use orders_client::{StorefrontApiConfig, StorefrontOrdersClient};
