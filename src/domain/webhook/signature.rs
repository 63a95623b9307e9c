//! Webhook signature verification.
//!
//! Payment providers sign the raw request body with a shared secret and send
//! the lowercase hex digest in a header. Verification must run on the exact
//! bytes received, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

/// Hash function used for the keyed MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    HmacSha256,
    HmacSha512,
}

impl SignatureAlgorithm {
    /// Length of the raw digest in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            SignatureAlgorithm::HmacSha256 => 32,
            SignatureAlgorithm::HmacSha512 => 64,
        }
    }

    fn mac(&self, secret: &[u8], payload: &[u8]) -> Vec<u8> {
        match self {
            SignatureAlgorithm::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(secret)
                    .expect("HMAC accepts any key length");
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            SignatureAlgorithm::HmacSha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(secret)
                    .expect("HMAC accepts any key length");
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}

/// Computes the lowercase hex signature a provider would send for `payload`.
pub fn sign(payload: &[u8], secret: &str, algorithm: SignatureAlgorithm) -> String {
    hex::encode(algorithm.mac(secret.as_bytes(), payload))
}

/// Verifies a hex-encoded signature against the raw payload.
///
/// Returns `false` for an empty signature, an empty secret, a signature that
/// is not valid hex, or any digest mismatch. Never panics.
pub fn verify(
    payload: &[u8],
    supplied_signature: &str,
    secret: &str,
    algorithm: SignatureAlgorithm,
) -> bool {
    let supplied_signature = supplied_signature.trim();
    if supplied_signature.is_empty() || secret.is_empty() {
        return false;
    }

    let Ok(supplied) = hex::decode(supplied_signature) else {
        return false;
    };
    if supplied.len() != algorithm.digest_len() {
        return false;
    }

    let expected = algorithm.mac(secret.as_bytes(), payload);
    constant_time_compare(&expected, &supplied)
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
