//! Payment records fetched from the processor, and the order intent they
//! carry.
//!
//! The authoritative copy of a payment lives in the payment processor; this
//! module models the slice of it the reconciler consumes. The order intent
//! is written by us at checkout-preference time and comes back embedded in
//! the payment's metadata, which is what lets a stateless webhook rebuild
//! the storefront order.

use serde::{Deserialize, Serialize};

/// Payment state as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
    /// Any status outside the three we act on; carries the raw value for
    /// logging.
    Other(String),
}

impl PaymentStatus {
    /// Map the processor's status string onto the closed set we act on.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "approved" => PaymentStatus::Approved,
            "pending" | "in_process" | "in_mediation" | "authorized" => PaymentStatus::Pending,
            "rejected" | "cancelled" => PaymentStatus::Rejected,
            other => PaymentStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Other(raw) => raw,
        }
    }
}

/// The slice of a processor payment the reconciler consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    /// Processor payment id, stringified.
    pub id: String,

    pub status: PaymentStatus,

    /// Our own reference attached at checkout time; used for traceability
    /// and manual recovery when metadata is lost.
    pub external_reference: Option<String>,

    /// Order intent embedded at preference-creation time. Absence is a
    /// reportable failure mode, not a crash.
    pub metadata: Option<OrderIntent>,

    /// Amount actually charged, used for defense-in-depth comparison
    /// against the intent total.
    pub transaction_amount: Option<f64>,

    pub currency_id: Option<String>,
}

/// Everything needed to create the storefront order, captured at checkout
/// time and round-tripped through the processor's metadata field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub items: Vec<IntentItem>,
    pub customer: IntentCustomer,
    pub total: f64,
}

/// One checkout line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentItem {
    /// Storefront variant id; 0 when the storefront mapping is unknown.
    #[serde(default)]
    pub variant_id: u64,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Unit price.
    pub price: f64,

    #[serde(default)]
    pub name: String,
}

fn default_quantity() -> u32 {
    1
}

/// Customer details captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentCustomer {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    /// National identification document number, when collected.
    #[serde(default)]
    pub document: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    /// Province / state code; defaulted by policy when absent.
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub zipcode: Option<String>,
}
