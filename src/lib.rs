//! Storefront Bridge - storefront and payment-processor integration service
//!
//! Creates hosted checkouts on the payment processor and reconciles its
//! asynchronous payment notifications into exactly-once order creation on
//! the storefront platform, maintaining the platform access credential
//! along the way.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
