//! Webhook response DTOs.

use serde::Serialize;

use crate::application::ReconciliationOutcome;

/// Acknowledgement body for payment notifications.
///
/// Always delivered with HTTP 200: the status token reports the internal
/// outcome without inviting notifier retries.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationAck {
    pub status: &'static str,
}

impl NotificationAck {
    pub fn new(outcome: ReconciliationOutcome) -> Self {
        Self {
            status: outcome.status_token(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_serializes_status_token() {
        let ack = NotificationAck::new(ReconciliationOutcome::Forwarded);
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json, serde_json::json!({"status": "received"}));
    }
}
