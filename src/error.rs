//! Error types.
//!
//! Errors are grouped by concern and wrapped by [`Error`]. Which of them are
//! fatal depends on where they surface: per-item errors are folded into a
//! [`CopyReport`](crate::core::domain::CopyReport) by the pipelines, listing
//! errors abort one pipeline, and setup errors abort the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Seal(#[from] SealError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    File(#[from] FileError),

    /// One or more pipelines could not list their source environment.
    #[error("incomplete run: {} pipeline aborted", .0.join(" and "))]
    Incomplete(Vec<&'static str>),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Environment problems detected before any work starts.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("required dependency not found: {name} ({hint})")]
    DependencyMissing { name: String, hint: &'static str },
}

/// Invalid command-line configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid repository '{0}': expected owner/repo")]
    InvalidRepository(String),

    #[error("source and target environment are both '{0}'")]
    SameEnvironment(String),
}

/// Reasons a variable or secret is not eligible for copying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty name")]
    EmptyName,

    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("empty value for {0}")]
    EmptyValue(String),
}

/// Sealed-box encryption failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SealError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("sealed-box encryption is unavailable in this build")]
    EncryptionUnavailable,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Failures talking to the remote environment store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// A read (listing or key fetch) failed. `detail` carries the raw response.
    #[error("failed to fetch {what}: {detail}")]
    Fetch { what: String, detail: String },

    /// A write (create or upsert) failed. `detail` carries the raw response.
    #[error("failed to write {what}: {detail}")]
    Write { what: String, detail: String },

    #[error("unexpected response for {what}: {detail}")]
    Decode { what: String, detail: String },

    #[error("could not run {program}: {detail}")]
    Spawn { program: String, detail: String },
}

/// Secrets file and template errors.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("secrets file not found: {}", .0.display())]
    SecretsFileNotFound(PathBuf),

    #[error("cannot read secrets file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("secrets file {} is not a JSON object of strings: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write template {}: {source}", path.display())]
    TemplateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
