//! `X-Hub-Signature-256` verification for inbound webhook deliveries.
//!
//! An empty app secret disables verification entirely. That mode exists
//! for local testing only; `AppConfig::validate` refuses it unless it is
//! explicitly allowed.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// `false` when running without a secret (every delivery accepted).
    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    pub fn verify(&self, raw_body: &[u8], header_value: &str) -> bool {
        verify_signature(&self.secret, raw_body, header_value)
    }
}

/// Checks `header_value` against `sha256=<hex(HMAC-SHA256(secret, body))>`
/// with lowercase hex. The digest comparison is constant time.
pub fn verify_signature(secret: &str, raw_body: &[u8], header_value: &str) -> bool {
    if secret.is_empty() {
        return true;
    }
    let Some(signature) = header_value.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    // Only the lowercase form `sign` produces is accepted.
    if signature.is_empty() || !signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return false;
    }
    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(raw_body);
    mac.verify_slice(&signature_bytes).is_ok()
}

/// Produces the header value a sender with `secret` would attach to `body`.
pub fn sign(secret: &str, raw_body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(raw_body);
    Some(format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes())))
}
