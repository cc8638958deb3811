//! Translation of an order intent into the storefront order-creation
//! payload.
//!
//! The storefront's order API takes a fully-specified order: products by
//! variant id, customer identification, billing and shipping addresses, and
//! payment bookkeeping. The reconciler builds this from the intent captured
//! at checkout plus the fetched payment record, stamping `payment_status =
//! paid` because reconciliation only runs for approved payments.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::payment::{OrderIntent, PaymentRecord};

/// Site-level policy applied when translating intents into orders.
///
/// The province fallback is a business-policy knob, not a constant: stores
/// in different regions want different defaults.
#[derive(Debug, Clone)]
pub struct ForwardingPolicy {
    /// Region code used when the customer supplied no province/state.
    pub default_province: String,

    /// ISO country code stamped on both address blocks.
    pub country: String,

    pub shipping_carrier: String,
    pub shipping_option: String,
    pub shipping_cost: f64,
}

impl Default for ForwardingPolicy {
    fn default() -> Self {
        Self {
            default_province: "SP".to_string(),
            country: "BR".to_string(),
            shipping_carrier: "Correios".to_string(),
            shipping_option: "PAC".to_string(),
            shipping_cost: 10.0,
        }
    }
}

/// Order-creation payload for the storefront API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPayload {
    pub gateway: String,
    pub payment_status: String,
    pub paid_at: String,
    pub products: Vec<OrderProduct>,
    pub customer: OrderCustomer,
    pub billing_address: OrderAddress,
    pub shipping_address: OrderAddress,
    pub shipping_pickup_type: String,
    pub shipping: String,
    pub shipping_option: String,
    pub shipping_cost_customer: f64,
    pub total: f64,
    pub owner_note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderProduct {
    pub variant_id: u64,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identification {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderAddress {
    pub address: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub zipcode: String,
}

impl OrderPayload {
    /// Build the storefront payload from the checkout intent and the
    /// fetched payment.
    ///
    /// Line items map 1:1 preserving variant id, quantity and unit price.
    /// The owner note carries the payment id and external reference so the
    /// order can be traced back to the processor from the storefront admin.
    pub fn from_intent(
        intent: &OrderIntent,
        payment: &PaymentRecord,
        policy: &ForwardingPolicy,
        paid_at: DateTime<Utc>,
    ) -> Self {
        let customer = &intent.customer;
        let province = customer
            .state
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| policy.default_province.clone());

        let address = OrderAddress {
            address: customer.address.clone().unwrap_or_default(),
            city: customer.city.clone().unwrap_or_default(),
            province,
            country: policy.country.clone(),
            zipcode: customer.zipcode.clone().unwrap_or_default(),
        };

        Self {
            gateway: "offline".to_string(),
            payment_status: "paid".to_string(),
            paid_at: paid_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            products: intent
                .items
                .iter()
                .map(|item| OrderProduct {
                    variant_id: item.variant_id,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            customer: OrderCustomer {
                name: customer.name.clone(),
                email: customer.email.clone(),
                identification: customer
                    .document
                    .clone()
                    .filter(|d| !d.is_empty())
                    .map(|number| Identification {
                        kind: "CPF".to_string(),
                        number,
                    }),
            },
            billing_address: address.clone(),
            shipping_address: address,
            shipping_pickup_type: "ship".to_string(),
            shipping: policy.shipping_carrier.clone(),
            shipping_option: policy.shipping_option.clone(),
            shipping_cost_customer: policy.shipping_cost,
            total: intent.total,
            owner_note: format!(
                "Settled via hosted checkout - payment id {}, ref {}",
                payment.id,
                payment.external_reference.as_deref().unwrap_or("-")
            ),
        }
    }
}
