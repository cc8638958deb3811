//! ReconciliationLedger port - at-most-once order creation per payment.
//!
//! The processor retries notifications aggressively and may deliver the
//! same payment id from several workers at once. The ledger provides an
//! atomic claim so only one reconciliation attempt per payment id ever
//! reaches the storefront.
//!
//! The bundled implementation is in-memory, so claims do not survive a
//! process restart. The port exists so a durable implementation can be
//! swapped in without touching the reconciler.

use async_trait::async_trait;

/// Result of attempting to claim a payment id for forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// This caller owns the attempt and must later `mark_forwarded` or
    /// `release`.
    Claimed,

    /// Another attempt for this payment id is currently in flight.
    InFlight,

    /// An order was already forwarded for this payment id.
    AlreadyForwarded,
}

/// Port for the per-payment reconciliation ledger.
#[async_trait]
pub trait ReconciliationLedger: Send + Sync {
    /// Atomically claim `payment_id` for forwarding (insert-if-absent).
    async fn claim(&self, payment_id: &str) -> ClaimOutcome;

    /// Record that the order for `payment_id` was created successfully.
    async fn mark_forwarded(&self, payment_id: &str);

    /// Give up an unfinished claim so a later notification can retry.
    /// A forwarded marker is never released.
    async fn release(&self, payment_id: &str);
}
