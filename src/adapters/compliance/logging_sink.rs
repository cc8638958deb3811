//! Logging compliance sink.
//!
//! Records verified data-subject requests in the structured log for the
//! operations team to act on. Replace with a queue- or job-backed sink when
//! erasure/export is automated.

use async_trait::async_trait;

use crate::domain::compliance::{CustomersDataRequest, CustomersRedact, StoreRedact};
use crate::ports::ComplianceSink;

/// `ComplianceSink` that logs each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingComplianceSink;

impl LoggingComplianceSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ComplianceSink for LoggingComplianceSink {
    async fn redact_store(&self, request: StoreRedact) {
        tracing::info!(store_id = request.store_id, "store data erasure requested");
    }

    async fn redact_customers(&self, request: CustomersRedact) {
        tracing::info!(
            store_id = request.store_id,
            customer_id = request.customer.as_ref().and_then(|c| c.id),
            orders = request.orders_to_redact.len(),
            "customer data erasure requested"
        );
    }

    async fn export_customer_data(&self, request: CustomersDataRequest) {
        tracing::info!(
            store_id = request.store_id,
            customer_id = request.customer.as_ref().and_then(|c| c.id),
            orders = request.orders_requested.len(),
            "customer data export requested"
        );
    }
}
