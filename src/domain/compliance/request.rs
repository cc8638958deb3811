//! Data-subject request payloads delivered by the storefront platform.
//!
//! These arrive on signed webhooks; the shapes are fixed by the platform's
//! privacy-compliance API.

use serde::Deserialize;

/// Customer reference inside redaction/export requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplianceCustomer {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Request to erase all data held for a store (app uninstall).
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRedact {
    pub store_id: u64,
}

/// Request to erase data for specific customers of a store.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomersRedact {
    pub store_id: u64,

    #[serde(default)]
    pub customer: Option<ComplianceCustomer>,

    #[serde(default)]
    pub orders_to_redact: Vec<u64>,
}

/// Request to export the data held for a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomersDataRequest {
    pub store_id: u64,

    #[serde(default)]
    pub customer: Option<ComplianceCustomer>,

    #[serde(default)]
    pub orders_requested: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_redact_parses_minimal_payload() {
        let request: StoreRedact = serde_json::from_str(r#"{"store_id": 42}"#).unwrap();
        assert_eq!(request.store_id, 42);
    }

    #[test]
    fn customers_redact_parses_full_payload() {
        let request: CustomersRedact = serde_json::from_str(
            r#"{
                "store_id": 42,
                "customer": {"id": 7, "email": "ana@example.com"},
                "orders_to_redact": [1, 2, 3]
            }"#,
        )
        .unwrap();

        assert_eq!(request.store_id, 42);
        assert_eq!(request.customer.unwrap().id, Some(7));
        assert_eq!(request.orders_to_redact, vec![1, 2, 3]);
    }

    #[test]
    fn customers_data_request_tolerates_missing_fields() {
        let request: CustomersDataRequest =
            serde_json::from_str(r#"{"store_id": 42}"#).unwrap();

        assert!(request.customer.is_none());
        assert!(request.orders_requested.is_empty());
    }
}
