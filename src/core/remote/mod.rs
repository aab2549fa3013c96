//! Remote environment store.
//!
//! Abstracts the five operations the pipelines need so the GitHub-backed
//! implementation can be swapped for a fake in tests.
//!
//! ## Backends
//!
//! - **gh**: Default. Shells out to `gh api`, reusing the user's GitHub
//!   CLI authentication.

use crate::core::config::Repository;
use crate::core::domain::{EnvironmentVariable, RecipientPublicKey, SealedSecret, SecretDescriptor};
use crate::error::Result;

mod gh;

pub use gh::GhCli;

/// Operations on one repository's deployment environments.
///
/// Listing methods return the complete, de-paginated listing.
pub trait Remote: Send + Sync {
    /// List all variables (names and values) defined in `env`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Fetch` with the raw response on failure.
    fn list_variables(&self, repo: &Repository, env: &str) -> Result<Vec<EnvironmentVariable>>;

    /// Create a variable in `env`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Write` on failure, including when the
    /// variable already exists.
    fn create_variable(
        &self,
        repo: &Repository,
        env: &str,
        variable: &EnvironmentVariable,
    ) -> Result<()>;

    /// List the names of all secrets defined in `env`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Fetch` with the raw response on failure.
    fn list_secret_names(&self, repo: &Repository, env: &str) -> Result<Vec<SecretDescriptor>>;

    /// Fetch the current public key of `env`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Fetch` on failure or `SealError::InvalidPublicKey`
    /// if the key is malformed.
    fn public_key(&self, repo: &Repository, env: &str) -> Result<RecipientPublicKey>;

    /// Create or update a secret in `env`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Write` on failure.
    fn upsert_secret(&self, repo: &Repository, env: &str, secret: &SealedSecret) -> Result<()>;
}
