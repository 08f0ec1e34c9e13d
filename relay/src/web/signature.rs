//! Webhook signature verification.
//!
//! GitHub signs webhook bodies with HMAC-SHA1 and sends the result as
//! `X-Hub-Signature: sha1=<hex>`. Sentry integrations sign with HMAC-SHA256
//! keyed by the client secret and send the bare hex digest in
//! `Sentry-Hook-Signature`.
//!
//! Both checks operate on the raw request bytes, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use tracing::warn;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Compute the `sha1=<hex>` signature GitHub would send for `body`.
pub fn github_signature(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(format!("sha1={}", hex::encode(mac.finalize().into_bytes())))
}

/// Verify a GitHub `X-Hub-Signature` header against the raw body.
///
/// The comparison is an exact, case-sensitive match against
/// `"sha1=" + hex(HMAC-SHA1(secret, body))`. Callers must reject requests
/// that carry no header before calling this.
pub fn verify_github_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let expected = match github_signature(secret, body) {
        Some(sig) => sig,
        None => {
            warn!("github_signature_invalid_key");
            return false;
        }
    };
    let valid = constant_time_compare(&expected, signature);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature.len(),
            "github_signature_mismatch"
        );
    }

    valid
}

/// Verify a Sentry `Sentry-Hook-Signature` header against the raw body.
pub fn verify_sentry_signature(client_secret: &str, body: &[u8], signature: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(client_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("sentry_signature_invalid_key");
            return false;
        }
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    let valid = constant_time_compare(&expected, signature);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature.len(),
            "sentry_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
