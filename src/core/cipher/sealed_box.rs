//! Sealed-box backend.
//!
//! Output is bit-compatible with libsodium's `crypto_box_seal`: a fresh
//! ephemeral key pair per call, nonce derived from both public keys, and the
//! ephemeral public key prepended to the ciphertext.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, SecretKey};
use tracing::trace;

use super::Sealer;
use crate::core::domain::RecipientPublicKey;
use crate::core::types::Ciphertext;
use crate::error::SealError;

/// Anonymous public-key encryption via `crypto_box`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SealedBox;

impl SealedBox {
    /// Seal and immediately open a probe value with a throwaway key pair.
    ///
    /// Used by the startup capability probe.
    pub fn self_test() -> bool {
        let secret = SecretKey::generate(&mut OsRng);
        let key = RecipientPublicKey::new("self-test", *secret.public_key().as_bytes());
        let probe = b"envcopy";

        let Ok(sealed) = SealedBox.seal(&key, probe) else {
            return false;
        };
        let Ok(bytes) = BASE64.decode(sealed) else {
            return false;
        };
        secret
            .unseal(&bytes)
            .map(|opened| opened == probe)
            .unwrap_or(false)
    }
}

impl Sealer for SealedBox {
    fn seal(&self, key: &RecipientPublicKey, plaintext: &[u8]) -> Result<Ciphertext, SealError> {
        trace!(
            key_id = key.key_id(),
            plaintext_len = plaintext.len(),
            "sealing"
        );

        let recipient = PublicKey::from(*key.key_bytes());
        let sealed = recipient
            .seal(&mut OsRng, plaintext)
            .map_err(|e| SealError::EncryptionFailed(e.to_string()))?;

        trace!(ciphertext_len = sealed.len(), "sealed");

        Ok(BASE64.encode(sealed))
    }

    fn name(&self) -> &'static str {
        "sealed-box"
    }
}
