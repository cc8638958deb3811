//! OrderSink port - the storefront's order-creation API.
//!
//! A thin authenticated call: the reconciler supplies both the payload and
//! a bearer token obtained from the credential lifecycle manager.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::order::OrderPayload;

/// Errors from order creation.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The storefront answered with an error status.
    #[error("storefront rejected the order: {0}")]
    Rejected(String),

    /// The storefront could not be reached or timed out.
    #[error("storefront unreachable: {0}")]
    Network(String),
}

/// Order created on the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub id: u64,
}

/// Port for forwarding orders to the storefront.
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Create an order, authenticating with `access_token`.
    async fn create_order(
        &self,
        payload: &OrderPayload,
        access_token: &str,
    ) -> Result<CreatedOrder, OrderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_sink_is_object_safe() {
        fn _accepts_dyn(_sink: &dyn OrderSink) {}
    }
}
