//! Webhook signature verification for storefront compliance callbacks.
//!
//! The storefront platform signs compliance webhooks with an HMAC-SHA256
//! over the raw request body, base64-encoded, keyed by the app's client
//! secret. Verification must run over the exact bytes received; any
//! re-serialization breaks the digest.
//!
//! Fails closed: a missing secret or a missing signature header verifies
//! as false, never as an error.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Stateless verifier for signed webhook payloads.
pub struct WebhookVerifier {
    secret: Option<SecretString>,
}

impl WebhookVerifier {
    /// Create a verifier keyed by the shared app secret.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            secret: (!secret.is_empty()).then(|| SecretString::new(secret)),
        }
    }

    /// A verifier with no secret configured; rejects everything.
    pub fn disabled() -> Self {
        Self { secret: None }
    }

    /// Verify `provided` against the HMAC-SHA256 of `raw_body`.
    pub fn verify(&self, raw_body: &[u8], provided: Option<&str>) -> bool {
        let Some(secret) = &self.secret else {
            return false;
        };
        let Some(provided) = provided else {
            return false;
        };

        let expected = compute_signature(secret.expose_secret(), raw_body);
        constant_time_compare(expected.as_bytes(), provided.as_bytes())
    }
}

/// HMAC-SHA256 over `raw_body`, base64-encoded.
fn compute_signature(secret: &str, raw_body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(raw_body);
    BASE64.encode(mac.finalize().into_bytes())
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Signature helper for test fixtures.
#[cfg(test)]
pub fn sign_for_tests(secret: &str, raw_body: &[u8]) -> String {
    compute_signature(secret, raw_body)
}
