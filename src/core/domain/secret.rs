//! Secret types.
//!
//! The remote store never reveals secret values, so a listed secret is only
//! a name. Values enter the program locally and leave it sealed.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::core::types::{Ciphertext, KeyId, Name};
use crate::error::SealError;

/// Length of an X25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// A secret as listed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretDescriptor {
    pub name: Name,
}

impl SecretDescriptor {
    pub fn new(name: impl Into<Name>) -> Self {
        Self { name: name.into() }
    }
}

/// A secret's plaintext, wiped from memory on drop.
pub struct SecretValue {
    name: Name,
    plaintext: Zeroizing<String>,
}

impl SecretValue {
    pub fn new(name: impl Into<Name>, plaintext: Zeroizing<String>) -> Self {
        Self {
            name: name.into(),
            plaintext,
        }
    }

    /// The empty value used by `--clone-secrets-empty`.
    pub fn empty(name: impl Into<Name>) -> Self {
        Self::new(name, Zeroizing::new(String::new()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plaintext(&self) -> &[u8] {
        self.plaintext.as_bytes()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("name", &self.name)
            .field("plaintext", &"<redacted>")
            .finish()
    }
}

/// The target environment's current encryption key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientPublicKey {
    key_id: KeyId,
    key_bytes: [u8; PUBLIC_KEY_LEN],
}

impl RecipientPublicKey {
    pub fn new(key_id: impl Into<KeyId>, key_bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self {
            key_id: key_id.into(),
            key_bytes,
        }
    }

    /// Decode a key as returned by the remote API.
    ///
    /// # Errors
    ///
    /// Returns `SealError::InvalidPublicKey` if the key is not valid base64
    /// or does not decode to exactly 32 bytes.
    pub fn from_base64(key_id: impl Into<KeyId>, key: &str) -> Result<Self, SealError> {
        let decoded = BASE64
            .decode(key.trim())
            .map_err(|e| SealError::InvalidPublicKey(format!("not valid base64: {}", e)))?;
        let len = decoded.len();
        let key_bytes: [u8; PUBLIC_KEY_LEN] = decoded.try_into().map_err(|_| {
            SealError::InvalidPublicKey(format!(
                "expected {} bytes, got {}",
                PUBLIC_KEY_LEN, len
            ))
        })?;
        Ok(Self::new(key_id, key_bytes))
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn key_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.key_bytes
    }
}

/// The payload of a create-or-update secret request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub name: Name,
    pub ciphertext: Ciphertext,
    pub key_id: KeyId,
}

/// Wire body of an upsert request.
#[derive(Debug, Serialize)]
pub struct SealedSecretBody<'a> {
    pub encrypted_value: &'a str,
    pub key_id: &'a str,
}

impl SealedSecret {
    pub fn body(&self) -> SealedSecretBody<'_> {
        SealedSecretBody {
            encrypted_value: &self.ciphertext,
            key_id: &self.key_id,
        }
    }
}
