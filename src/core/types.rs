//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A variable or secret name (e.g., DATABASE_URL).
///
/// Must match `^[A-Za-z_][A-Za-z0-9_]*$` to be copied.
pub type Name = String;

/// A deployment environment name (e.g., staging, production).
pub type EnvironmentName = String;

/// Server-assigned identifier of an environment's public key.
pub type KeyId = String;

/// Base64-encoded sealed-box ciphertext.
pub type Ciphertext = String;
