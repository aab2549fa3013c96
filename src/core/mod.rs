//! Core library components.
//!
//! This module contains the copy pipelines and everything they are built
//! from: configuration, validation, encryption and the remote store.

pub mod cancel;
pub mod capabilities;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod pipeline;
pub mod prompt;
pub mod remote;
pub mod secrets_file;
pub mod types;
pub mod validation;
