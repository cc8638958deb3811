//! Mercado Pago payment-processor adapter.

mod client;

pub use client::{MercadoPagoClient, MercadoPagoConfig};
