//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `STOREFRONT_BRIDGE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use storefront_bridge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod error;
mod payment;
mod server;
mod storefront;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use storefront::StorefrontConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Storefront platform configuration (API, OAuth app, forwarding)
    pub storefront: StorefrontConfig,

    /// Payment processor configuration
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `STOREFRONT_BRIDGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `STOREFRONT_BRIDGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `STOREFRONT_BRIDGE__STOREFRONT__STORE_ID=...` -> `storefront.store_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STOREFRONT_BRIDGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.storefront.validate()?;
        self.payment.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("STOREFRONT_BRIDGE__STOREFRONT__STORE_ID", "123456");
        env::set_var(
            "STOREFRONT_BRIDGE__STOREFRONT__USER_AGENT",
            "bridge (ops@example.com)",
        );
        env::set_var("STOREFRONT_BRIDGE__STOREFRONT__CLIENT_ID", "client-id");
        env::set_var("STOREFRONT_BRIDGE__STOREFRONT__CLIENT_SECRET", "client-secret");
        env::set_var("STOREFRONT_BRIDGE__PAYMENT__ACCESS_TOKEN", "TEST-token");
        env::set_var("STOREFRONT_BRIDGE__PAYMENT__FRONT_URL", "https://shop.example");
        env::set_var("STOREFRONT_BRIDGE__PAYMENT__BACK_URL", "https://bridge.example");
    }

    fn clear_env() {
        env::remove_var("STOREFRONT_BRIDGE__STOREFRONT__STORE_ID");
        env::remove_var("STOREFRONT_BRIDGE__STOREFRONT__USER_AGENT");
        env::remove_var("STOREFRONT_BRIDGE__STOREFRONT__CLIENT_ID");
        env::remove_var("STOREFRONT_BRIDGE__STOREFRONT__CLIENT_SECRET");
        env::remove_var("STOREFRONT_BRIDGE__PAYMENT__ACCESS_TOKEN");
        env::remove_var("STOREFRONT_BRIDGE__PAYMENT__FRONT_URL");
        env::remove_var("STOREFRONT_BRIDGE__PAYMENT__BACK_URL");
        env::remove_var("STOREFRONT_BRIDGE__SERVER__PORT");
        env::remove_var("STOREFRONT_BRIDGE__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.storefront.store_id, "123456");
        assert_eq!(config.payment.access_token, "TEST-token");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_storefront_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storefront.default_province, "SP");
        assert_eq!(config.storefront.token_file, "tokens.json");
        assert_eq!(config.payment.currency, "BRL");
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("STOREFRONT_BRIDGE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("STOREFRONT_BRIDGE__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
