//! Payment notification reconciler - turns processor notifications into
//! at-most-once storefront orders.
//!
//! The processor's notifications are duplicated, unordered and carry no
//! authority of their own: the reconciler always fetches the payment by id
//! and acts on the fetched state. Every internal failure collapses into a
//! logged outcome; the HTTP layer acknowledges the notifier regardless,
//! because non-2xx responses trigger aggressive redelivery.

use std::sync::Arc;

use crate::application::credential_manager::CredentialLifecycleManager;
use crate::domain::notification::NotificationEvent;
use crate::domain::order::{ForwardingPolicy, OrderPayload};
use crate::domain::payment::PaymentStatus;
use crate::ports::{ClaimOutcome, Clock, OrderSink, PaymentGateway, ReconciliationLedger};

/// Largest tolerated difference between the charged amount and the intent
/// total before the payment is quarantined.
const AMOUNT_TOLERANCE: f64 = 0.01;

/// Terminal result of handling one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// Not a payment notification, or no payment id; nothing fetched.
    Ignored,

    /// Payment exists but is not approved yet; safe to receive again.
    NotApproved,

    /// Approved payment without a recoverable order intent. Terminal for
    /// this event; reported loudly for manual follow-up.
    MissingMetadata,

    /// Charged amount disagrees with the intent total; never forwarded.
    AmountMismatch,

    /// An order was created for this payment (now or previously).
    Forwarded,

    /// The processor could not be queried; the notifier may retry.
    GatewayFetchError,

    /// Order creation failed; the claim is released so a duplicate
    /// notification can retry.
    ForwardError,
}

impl ReconciliationOutcome {
    /// Status token returned in the acknowledgement body.
    pub fn status_token(&self) -> &'static str {
        match self {
            ReconciliationOutcome::Ignored => "ignored",
            ReconciliationOutcome::NotApproved => "not-approved",
            ReconciliationOutcome::MissingMetadata => "missing-metadata",
            ReconciliationOutcome::AmountMismatch => "amount-mismatch",
            ReconciliationOutcome::Forwarded => "received",
            ReconciliationOutcome::GatewayFetchError => "gateway-fetch-error",
            ReconciliationOutcome::ForwardError => "forward-error-logged",
        }
    }
}

/// Orchestrates fetch, idempotency claim, translation and forwarding.
pub struct PaymentNotificationReconciler {
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderSink>,
    credentials: Arc<CredentialLifecycleManager>,
    ledger: Arc<dyn ReconciliationLedger>,
    clock: Arc<dyn Clock>,
    policy: ForwardingPolicy,
}

impl PaymentNotificationReconciler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrderSink>,
        credentials: Arc<CredentialLifecycleManager>,
        ledger: Arc<dyn ReconciliationLedger>,
        clock: Arc<dyn Clock>,
        policy: ForwardingPolicy,
    ) -> Self {
        Self {
            gateway,
            orders,
            credentials,
            ledger,
            clock,
            policy,
        }
    }

    /// Reconcile one notification into a terminal outcome.
    pub async fn handle(&self, event: NotificationEvent) -> ReconciliationOutcome {
        let NotificationEvent::Payment { id: payment_id } = event else {
            tracing::debug!("non-payment notification acknowledged without reconciliation");
            return ReconciliationOutcome::Ignored;
        };

        let payment = match self.gateway.fetch_payment(&payment_id).await {
            Ok(payment) => payment,
            Err(err) => {
                tracing::error!(
                    payment_id = %payment_id,
                    error = %err,
                    "payment fetch failed; notification left unreconciled"
                );
                return ReconciliationOutcome::GatewayFetchError;
            }
        };

        tracing::info!(
            payment_id = %payment.id,
            status = payment.status.as_str(),
            external_reference = payment.external_reference.as_deref().unwrap_or("-"),
            "payment notification received"
        );

        if payment.status != PaymentStatus::Approved {
            return ReconciliationOutcome::NotApproved;
        }

        match self.ledger.claim(&payment_id).await {
            ClaimOutcome::AlreadyForwarded => {
                tracing::debug!(payment_id = %payment_id, "order already forwarded; duplicate suppressed");
                return ReconciliationOutcome::Forwarded;
            }
            ClaimOutcome::InFlight => {
                tracing::debug!(payment_id = %payment_id, "reconciliation already in flight; duplicate suppressed");
                return ReconciliationOutcome::Forwarded;
            }
            ClaimOutcome::Claimed => {}
        }

        let Some(intent) = payment.metadata.as_ref() else {
            tracing::error!(
                payment_id = %payment.id,
                external_reference = payment.external_reference.as_deref().unwrap_or("-"),
                "payment metadata missing; order cannot be reconstructed"
            );
            self.ledger.release(&payment_id).await;
            return ReconciliationOutcome::MissingMetadata;
        };

        if let Some(amount) = payment.transaction_amount {
            if (amount - intent.total).abs() > AMOUNT_TOLERANCE {
                tracing::warn!(
                    payment_id = %payment.id,
                    transaction_amount = amount,
                    intent_total = intent.total,
                    "charged amount disagrees with checkout intent; order not forwarded"
                );
                self.ledger.release(&payment_id).await;
                return ReconciliationOutcome::AmountMismatch;
            }
        }

        let payload = OrderPayload::from_intent(intent, &payment, &self.policy, self.clock.now());

        let token = match self.credentials.get_valid_token().await {
            Ok(token) => token,
            Err(err) => {
                tracing::error!(payment_id = %payment.id, error = %err, "no usable storefront credential");
                self.ledger.release(&payment_id).await;
                return ReconciliationOutcome::ForwardError;
            }
        };

        match self.orders.create_order(&payload, &token).await {
            Ok(created) => {
                tracing::info!(
                    payment_id = %payment.id,
                    order_id = created.id,
                    "order created on storefront"
                );
                self.ledger.mark_forwarded(&payment_id).await;
                ReconciliationOutcome::Forwarded
            }
            Err(err) => {
                tracing::error!(payment_id = %payment.id, error = %err, "order creation failed");
                self.ledger.release(&payment_id).await;
                ReconciliationOutcome::ForwardError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex as StdMutex;

    use crate::adapters::ledger::InMemoryReconciliationLedger;
    use crate::domain::credential::CredentialRecord;
    use crate::domain::payment::{
        IntentCustomer, IntentItem, OrderIntent, PaymentRecord, PaymentStatus,
    };
    use crate::ports::{
        CheckoutPreference, CreatedOrder, GatewayError, OAuthClient, OAuthError, OrderError,
        PreferenceRequest, TokenStore, TokenStoreError,
    };

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    struct StubGateway {
        payments: HashMap<String, PaymentRecord>,
        fetches: AtomicU32,
        fail: bool,
    }

    impl StubGateway {
        fn with(payment: PaymentRecord) -> Self {
            let mut payments = HashMap::new();
            payments.insert(payment.id.clone(), payment);
            Self {
                payments,
                fetches: AtomicU32::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                payments: HashMap::new(),
                fetches: AtomicU32::new(0),
                fail: true,
            }
        }

        fn fetch_count(&self) -> u32 {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentRecord, GatewayError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GatewayError::Network("connect timeout".to_string()));
            }
            self.payments
                .get(payment_id)
                .cloned()
                .ok_or_else(|| GatewayError::Rejected("404 payment not found".to_string()))
        }

        async fn create_preference(
            &self,
            _request: PreferenceRequest,
        ) -> Result<CheckoutPreference, GatewayError> {
            unimplemented!("not exercised by reconciler tests")
        }
    }

    struct RecordingSink {
        orders: StdMutex<Vec<(OrderPayload, String)>>,
        fail_first: AtomicU32,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                orders: StdMutex::new(Vec::new()),
                fail_first: AtomicU32::new(0),
            }
        }

        fn failing_first(n: u32) -> Self {
            Self {
                orders: StdMutex::new(Vec::new()),
                fail_first: AtomicU32::new(n),
            }
        }

        fn order_count(&self) -> usize {
            self.orders.lock().unwrap().len()
        }

        fn last_order(&self) -> OrderPayload {
            self.orders.lock().unwrap().last().unwrap().0.clone()
        }
    }

    #[async_trait]
    impl OrderSink for RecordingSink {
        async fn create_order(
            &self,
            payload: &OrderPayload,
            access_token: &str,
        ) -> Result<CreatedOrder, OrderError> {
            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(OrderError::Network("storefront 502".to_string()));
            }
            self.orders
                .lock()
                .unwrap()
                .push((payload.clone(), access_token.to_string()));
            Ok(CreatedOrder { id: 9001 })
        }
    }

    struct StaticStore(CredentialRecord);

    #[async_trait]
    impl TokenStore for StaticStore {
        async fn load(&self) -> Result<Option<CredentialRecord>, TokenStoreError> {
            Ok(Some(self.0.clone()))
        }

        async fn save(&self, _record: &CredentialRecord) -> Result<(), TokenStoreError> {
            Ok(())
        }
    }

    struct NoOAuth;

    #[async_trait]
    impl OAuthClient for NoOAuth {
        async fn exchange_code(&self, _code: &str) -> Result<crate::domain::credential::TokenGrant, OAuthError> {
            Err(OAuthError::Rejected("not configured".to_string()))
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<crate::domain::credential::TokenGrant, OAuthError> {
            Err(OAuthError::Rejected("not configured".to_string()))
        }
    }

    fn paid_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_704_067_200, 0).unwrap()
    }

    fn credentials() -> Arc<CredentialLifecycleManager> {
        let record = CredentialRecord {
            access_token: "store-token".to_string(),
            refresh_token: None,
            expires_at: None,
        };
        Arc::new(CredentialLifecycleManager::new(
            Arc::new(StaticStore(record)),
            Arc::new(NoOAuth),
            Arc::new(FixedClock(paid_at())),
        ))
    }

    fn intent() -> OrderIntent {
        OrderIntent {
            items: vec![
                IntentItem {
                    variant_id: 7,
                    quantity: 2,
                    price: 10.0,
                    name: "Reserve Red".to_string(),
                },
                IntentItem {
                    variant_id: 9,
                    quantity: 1,
                    price: 15.0,
                    name: "Rose".to_string(),
                },
            ],
            customer: IntentCustomer {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                ..Default::default()
            },
            total: 35.0,
        }
    }

    fn approved_payment() -> PaymentRecord {
        PaymentRecord {
            id: "123".to_string(),
            status: PaymentStatus::Approved,
            external_reference: Some("order_1".to_string()),
            metadata: Some(intent()),
            transaction_amount: Some(35.0),
            currency_id: Some("BRL".to_string()),
        }
    }

    fn reconciler(
        gateway: Arc<StubGateway>,
        sink: Arc<RecordingSink>,
    ) -> PaymentNotificationReconciler {
        PaymentNotificationReconciler::new(
            gateway,
            sink,
            credentials(),
            Arc::new(InMemoryReconciliationLedger::new()),
            Arc::new(FixedClock(paid_at())),
            ForwardingPolicy::default(),
        )
    }

    fn payment_event(id: &str) -> NotificationEvent {
        NotificationEvent::Payment { id: id.to_string() }
    }

    // ══════════════════════════════════════════════════════════════
    // Outcome Matrix
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn non_payment_event_is_ignored_without_network_calls() {
        let gateway = Arc::new(StubGateway::with(approved_payment()));
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(gateway.clone(), sink.clone());

        let outcome = reconciler.handle(NotificationEvent::Other).await;

        assert_eq!(outcome, ReconciliationOutcome::Ignored);
        assert_eq!(gateway.fetch_count(), 0);
        assert_eq!(sink.order_count(), 0);
    }

    #[tokio::test]
    async fn approved_payment_is_forwarded_with_mapped_line_items() {
        let gateway = Arc::new(StubGateway::with(approved_payment()));
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(gateway, sink.clone());

        let outcome = reconciler.handle(payment_event("123")).await;

        assert_eq!(outcome, ReconciliationOutcome::Forwarded);
        assert_eq!(sink.order_count(), 1);

        let order = sink.last_order();
        assert_eq!(order.products.len(), 2);
        assert_eq!(order.products[0].variant_id, 7);
        assert_eq!(order.products[0].quantity, 2);
        assert_eq!(order.payment_status, "paid");
        assert!(order.owner_note.contains("123"));
        assert!(order.owner_note.contains("order_1"));
    }

    #[tokio::test]
    async fn forwarded_order_uses_managed_access_token() {
        let gateway = Arc::new(StubGateway::with(approved_payment()));
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(gateway, sink.clone());

        reconciler.handle(payment_event("123")).await;

        let tokens = sink.orders.lock().unwrap();
        assert_eq!(tokens[0].1, "store-token");
    }

    #[tokio::test]
    async fn pending_payment_is_not_forwarded() {
        let mut payment = approved_payment();
        payment.status = PaymentStatus::Pending;
        let gateway = Arc::new(StubGateway::with(payment));
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(gateway, sink.clone());

        let outcome = reconciler.handle(payment_event("123")).await;

        assert_eq!(outcome, ReconciliationOutcome::NotApproved);
        assert_eq!(sink.order_count(), 0);
    }

    #[tokio::test]
    async fn pending_then_approved_forwards_on_second_notification() {
        let mut pending = approved_payment();
        pending.status = PaymentStatus::Pending;
        let sink = Arc::new(RecordingSink::new());

        let outcome_pending = reconciler(Arc::new(StubGateway::with(pending)), sink.clone())
            .handle(payment_event("123"))
            .await;
        assert_eq!(outcome_pending, ReconciliationOutcome::NotApproved);

        let outcome_approved = reconciler(Arc::new(StubGateway::with(approved_payment())), sink.clone())
            .handle(payment_event("123"))
            .await;
        assert_eq!(outcome_approved, ReconciliationOutcome::Forwarded);
        assert_eq!(sink.order_count(), 1);
    }

    #[tokio::test]
    async fn gateway_failure_yields_fetch_error_without_forwarding() {
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(Arc::new(StubGateway::failing()), sink.clone());

        let outcome = reconciler.handle(payment_event("123")).await;

        assert_eq!(outcome, ReconciliationOutcome::GatewayFetchError);
        assert_eq!(sink.order_count(), 0);
    }

    #[tokio::test]
    async fn missing_metadata_is_terminal_and_never_forwards() {
        let mut payment = approved_payment();
        payment.metadata = None;
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(Arc::new(StubGateway::with(payment)), sink.clone());

        let outcome = reconciler.handle(payment_event("123")).await;

        assert_eq!(outcome, ReconciliationOutcome::MissingMetadata);
        assert_eq!(sink.order_count(), 0);
    }

    #[tokio::test]
    async fn amount_mismatch_quarantines_the_payment() {
        let mut payment = approved_payment();
        payment.transaction_amount = Some(17.5);
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(Arc::new(StubGateway::with(payment)), sink.clone());

        let outcome = reconciler.handle(payment_event("123")).await;

        assert_eq!(outcome, ReconciliationOutcome::AmountMismatch);
        assert_eq!(sink.order_count(), 0);
    }

    #[tokio::test]
    async fn sub_cent_amount_difference_is_tolerated() {
        let mut payment = approved_payment();
        payment.transaction_amount = Some(35.004);
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(Arc::new(StubGateway::with(payment)), sink.clone());

        let outcome = reconciler.handle(payment_event("123")).await;

        assert_eq!(outcome, ReconciliationOutcome::Forwarded);
    }

    // ══════════════════════════════════════════════════════════════
    // Idempotency
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn replayed_notification_forwards_exactly_once() {
        let gateway = Arc::new(StubGateway::with(approved_payment()));
        let sink = Arc::new(RecordingSink::new());
        let reconciler = reconciler(gateway, sink.clone());

        let first = reconciler.handle(payment_event("123")).await;
        let second = reconciler.handle(payment_event("123")).await;

        assert_eq!(first, ReconciliationOutcome::Forwarded);
        assert_eq!(second, ReconciliationOutcome::Forwarded);
        assert_eq!(sink.order_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_notifications_create_at_most_one_order() {
        let gateway = Arc::new(StubGateway::with(approved_payment()));
        let sink = Arc::new(RecordingSink::new());
        let reconciler = Arc::new(reconciler(gateway, sink.clone()));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let reconciler = reconciler.clone();
            handles.push(tokio::spawn(async move {
                reconciler.handle(payment_event("123")).await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), ReconciliationOutcome::Forwarded);
        }
        assert_eq!(sink.order_count(), 1);
    }

    #[tokio::test]
    async fn failed_forward_leaves_retry_path_open() {
        let gateway = Arc::new(StubGateway::with(approved_payment()));
        let sink = Arc::new(RecordingSink::failing_first(1));
        let reconciler = reconciler(gateway, sink.clone());

        let first = reconciler.handle(payment_event("123")).await;
        assert_eq!(first, ReconciliationOutcome::ForwardError);
        assert_eq!(sink.order_count(), 0);

        let second = reconciler.handle(payment_event("123")).await;
        assert_eq!(second, ReconciliationOutcome::Forwarded);
        assert_eq!(sink.order_count(), 1);
    }

    // ══════════════════════════════════════════════════════════════
    // Status Tokens
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn status_tokens_are_stable() {
        assert_eq!(ReconciliationOutcome::Ignored.status_token(), "ignored");
        assert_eq!(ReconciliationOutcome::Forwarded.status_token(), "received");
        assert_eq!(
            ReconciliationOutcome::GatewayFetchError.status_token(),
            "gateway-fetch-error"
        );
        assert_eq!(
            ReconciliationOutcome::ForwardError.status_token(),
            "forward-error-logged"
        );
    }
}
