//! Test fixtures and constants.

use envcopy::core::config::{CopyConfig, Route, SecretsMode, Settings};

pub const REPO: &str = "acme/app";
pub const SOURCE: &str = "staging";
pub const TARGET: &str = "production";

/// Variables from the end-to-end example: one valid, one empty, one badly named.
pub const MIXED_VARIABLES: &[(&str, &str)] = &[("FOO", "bar"), ("BAZ", ""), ("1BAD", "x")];

/// Standard variables that all copy cleanly.
pub const STANDARD_VARIABLES: &[(&str, &str)] = &[
    ("DATABASE_HOST", "db.internal"),
    ("LOG_LEVEL", "info"),
    ("REGION", "eu-west-1"),
    ("FEATURE_FLAGS", "a,b,c"),
];

/// Base configuration copying staging -> production in acme/app.
pub fn config() -> CopyConfig {
    let route = Route::new(REPO.parse().unwrap(), SOURCE, TARGET).unwrap();
    CopyConfig::new(route)
}

pub fn config_with(mode: SecretsMode) -> CopyConfig {
    config().with_secrets(mode)
}

pub fn config_with_settings(settings: Settings) -> CopyConfig {
    config().with_settings(settings)
}
