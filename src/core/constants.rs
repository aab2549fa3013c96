//! Constants used throughout envcopy.
//!
//! Centralizes magic strings and limits.

/// Default GitHub CLI binary name.
pub const GH_BIN: &str = "gh";

/// Install hint shown when the GitHub CLI is missing.
pub const GH_INSTALL_HINT: &str = "install it from https://cli.github.com and run `gh auth login`";

/// Page size used for listing variables and secrets (the API maximum).
pub const PAGE_SIZE: usize = 100;

/// Upper bound for `--jobs`.
pub const MAX_JOBS: u16 = 16;

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "ENVCOPY_LOG";

/// Gitignore entries that keep secrets files out of version control.
pub const GITIGNORE_ENTRIES: &[&str] = &["*.secrets.json", "secrets*.json"];
