//! In-memory reconciliation ledger.
//!
//! Claims live in a process-local map, so at-most-once only holds within
//! the process lifetime; a restart between notification and redelivery may
//! allow a second forward. This is the documented durability gap - the
//! ledger sits behind a port precisely so a durable store can replace it.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::ports::{ClaimOutcome, ReconciliationLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptState {
    InFlight,
    Forwarded,
}

/// Map-backed `ReconciliationLedger` with atomic insert-if-absent claims.
#[derive(Debug, Default)]
pub struct InMemoryReconciliationLedger {
    attempts: Mutex<HashMap<String, AttemptState>>,
}

impl InMemoryReconciliationLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReconciliationLedger for InMemoryReconciliationLedger {
    async fn claim(&self, payment_id: &str) -> ClaimOutcome {
        let mut attempts = self.attempts.lock().await;
        match attempts.get(payment_id) {
            Some(AttemptState::Forwarded) => ClaimOutcome::AlreadyForwarded,
            Some(AttemptState::InFlight) => ClaimOutcome::InFlight,
            None => {
                attempts.insert(payment_id.to_string(), AttemptState::InFlight);
                ClaimOutcome::Claimed
            }
        }
    }

    async fn mark_forwarded(&self, payment_id: &str) {
        let mut attempts = self.attempts.lock().await;
        attempts.insert(payment_id.to_string(), AttemptState::Forwarded);
    }

    async fn release(&self, payment_id: &str) {
        let mut attempts = self.attempts.lock().await;
        // Only an unfinished claim is released; a forwarded marker is
        // permanent for the process lifetime.
        if attempts.get(payment_id) == Some(&AttemptState::InFlight) {
            attempts.remove(payment_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_claim_wins() {
        let ledger = InMemoryReconciliationLedger::new();

        assert_eq!(ledger.claim("123").await, ClaimOutcome::Claimed);
        assert_eq!(ledger.claim("123").await, ClaimOutcome::InFlight);
    }

    #[tokio::test]
    async fn distinct_payment_ids_are_independent() {
        let ledger = InMemoryReconciliationLedger::new();

        assert_eq!(ledger.claim("a").await, ClaimOutcome::Claimed);
        assert_eq!(ledger.claim("b").await, ClaimOutcome::Claimed);
    }

    #[tokio::test]
    async fn forwarded_marker_is_sticky() {
        let ledger = InMemoryReconciliationLedger::new();

        ledger.claim("123").await;
        ledger.mark_forwarded("123").await;

        assert_eq!(ledger.claim("123").await, ClaimOutcome::AlreadyForwarded);
    }

    #[tokio::test]
    async fn release_reopens_an_unfinished_claim() {
        let ledger = InMemoryReconciliationLedger::new();

        ledger.claim("123").await;
        ledger.release("123").await;

        assert_eq!(ledger.claim("123").await, ClaimOutcome::Claimed);
    }

    #[tokio::test]
    async fn release_never_unmarks_a_forwarded_payment() {
        let ledger = InMemoryReconciliationLedger::new();

        ledger.claim("123").await;
        ledger.mark_forwarded("123").await;
        ledger.release("123").await;

        assert_eq!(ledger.claim("123").await, ClaimOutcome::AlreadyForwarded);
    }

    #[tokio::test]
    async fn concurrent_claims_yield_exactly_one_winner() {
        use std::sync::Arc;

        let ledger = Arc::new(InMemoryReconciliationLedger::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move { ledger.claim("123").await }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() == ClaimOutcome::Claimed {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
