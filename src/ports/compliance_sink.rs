//! ComplianceSink port - downstream processing of data-subject requests.
//!
//! Handlers acknowledge a verified compliance webhook immediately;
//! erasure/export work happens behind this port and may complete
//! asynchronously.

use async_trait::async_trait;

use crate::domain::compliance::{CustomersDataRequest, CustomersRedact, StoreRedact};

/// Port for dispatching verified compliance requests.
#[async_trait]
pub trait ComplianceSink: Send + Sync {
    /// Erase all data held for a store.
    async fn redact_store(&self, request: StoreRedact);

    /// Erase data held for specific customers of a store.
    async fn redact_customers(&self, request: CustomersRedact);

    /// Export the data held for a customer.
    async fn export_customer_data(&self, request: CustomersDataRequest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliance_sink_is_object_safe() {
        fn _accepts_dyn(_sink: &dyn ComplianceSink) {}
    }
}
