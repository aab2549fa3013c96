//! Secret sealing.
//!
//! Secrets are write-only on the remote side: the store publishes a public
//! key per environment and accepts only values sealed for it.
//!
//! ## Backends
//!
//! - **sealed box**: Default. libsodium-compatible `crypto_box_seal`
//!   (X25519 + XSalsa20-Poly1305 with an ephemeral sender key).
//! - **unavailable**: Stand-in used when the startup probe finds sealing
//!   broken. Every call fails with `SealError::EncryptionUnavailable`.

use crate::core::domain::RecipientPublicKey;
use crate::core::types::Ciphertext;
use crate::error::SealError;

mod sealed_box;

pub use sealed_box::SealedBox;

/// Encrypts a plaintext for a recipient public key.
///
/// Implementations hold no per-call state and may be shared across threads.
pub trait Sealer: Send + Sync {
    /// Seal `plaintext` for `key`.
    ///
    /// # Returns
    ///
    /// Base64-encoded ciphertext (standard alphabet, padded, no line breaks).
    ///
    /// # Errors
    ///
    /// Returns `SealError` if encryption fails.
    fn seal(&self, key: &RecipientPublicKey, plaintext: &[u8]) -> Result<Ciphertext, SealError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Sealer that always fails with `EncryptionUnavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl Sealer for Unavailable {
    fn seal(&self, _key: &RecipientPublicKey, _plaintext: &[u8]) -> Result<Ciphertext, SealError> {
        Err(SealError::EncryptionUnavailable)
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

/// Seal a plaintext for a base64-encoded public key.
///
/// Convenience wrapper around [`SealedBox`] for callers that hold the key
/// exactly as the remote API returns it.
///
/// # Errors
///
/// Returns `SealError::InvalidPublicKey` if the key does not decode to
/// 32 bytes; nothing is encrypted in that case.
pub fn seal(public_key_b64: &str, plaintext: &[u8]) -> Result<Ciphertext, SealError> {
    let key = RecipientPublicKey::from_base64("", public_key_b64)?;
    SealedBox.seal(&key, plaintext)
}
