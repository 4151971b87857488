//! Request signing for the GatePay open platform.
//!
//! Every request carries an `X-GatePay-Signature` header. The signature is the lower-case hex encoding of
//! HMAC-SHA512 over the payload
//!
//! ```text
//! {timestamp}\n{nonce}\n{body}\n
//! ```
//!
//! keyed with the merchant's payment key. `timestamp` is the UTC time in milliseconds and `body` is the exact JSON
//! string that is sent, or the empty string for requests without a body.
use std::fmt::{self, Debug};

use gpg_common::Secret;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha512;

use crate::GatePayApiError;

type HmacSha512 = Hmac<Sha512>;

#[derive(Clone)]
pub struct RequestSigner {
    // Keyed once; each signature works on a clone.
    mac: HmacSha512,
}

impl RequestSigner {
    /// Fails with [`GatePayApiError::MissingPaymentKey`] if the key is blank.
    pub fn new(payment_key: &Secret<String>) -> Result<Self, GatePayApiError> {
        if payment_key.is_blank() {
            return Err(GatePayApiError::MissingPaymentKey);
        }
        let mac = HmacSha512::new_from_slice(payment_key.reveal().as_bytes())
            .map_err(|e| GatePayApiError::Initialization(e.to_string()))?;
        Ok(Self { mac })
    }

    pub fn sign(&self, nonce: &str, timestamp: i64, body: &str) -> String {
        let payload = format!("{timestamp}\n{nonce}\n{body}\n");
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestSigner(****)")
    }
}

/// A fresh 128-bit random nonce, hex encoded.
pub fn new_nonce() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(bytes)
}
