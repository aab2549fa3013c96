//! envcopy - Copy GitHub Actions environment configuration.
//!
//! Copies variables and, optionally, secrets from one deployment environment
//! to another within the same repository.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── output        # Terminal output helpers
//! │   └── report        # Per-item and summary rendering
//! └── core/             # Core library components
//!     ├── config        # Immutable run configuration
//!     ├── capabilities  # Startup probe (gh, sealing)
//!     ├── cipher/       # Sealed-box encryption
//!     ├── remote/       # Remote environment store
//!     │   └── gh        # `gh api` implementation
//!     ├── pipeline/     # Variable and secret copy pipelines
//!     ├── secrets_file  # JSON secrets file and template
//!     └── prompt        # Hidden-input value prompt
//! ```
//!
//! Secret values never come from the remote store: they are read from a
//! JSON file, prompted for, or left empty, then sealed for the target
//! environment's public key before upload.

pub mod cli;
pub mod core;
pub mod error;
