//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Credential Ports
//!
//! - `TokenStore` - Durable holder of the current credential record
//! - `OAuthClient` - The storefront platform's token endpoint
//! - `Clock` - Injectable time source for staleness checks
//!
//! ## Reconciliation Ports
//!
//! - `PaymentGateway` - Payment fetch and hosted-checkout preferences
//! - `OrderSink` - The storefront's order-creation API
//! - `ReconciliationLedger` - At-most-once claim per payment id
//!
//! ## Compliance Ports
//!
//! - `ComplianceSink` - Downstream data-erasure/export processing

mod clock;
mod compliance_sink;
mod oauth;
mod order_sink;
mod payment_gateway;
mod reconciliation_ledger;
mod token_store;

pub use clock::{Clock, SystemClock};
pub use compliance_sink::ComplianceSink;
pub use oauth::{OAuthClient, OAuthError};
pub use order_sink::{CreatedOrder, OrderError, OrderSink};
pub use payment_gateway::{
    BackUrls, CheckoutPreference, GatewayError, PaymentGateway, PreferenceItem, PreferenceRequest,
};
pub use reconciliation_ledger::{ClaimOutcome, ReconciliationLedger};
pub use token_store::{TokenStore, TokenStoreError};
