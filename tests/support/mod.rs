//! Test support utilities for envcopy integration tests.
//!
//! Provides an in-memory remote, a scripted prompt, a fake `gh` executable
//! and assertion helpers.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod remote;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use remote::{FakeRemote, ScriptedPrompt, Write};

use tempfile::TempDir;

/// Test environment with an isolated temp directory.
///
/// Child processes use `.current_dir()`, so no process-global state is
/// mutated and tests can run in parallel.
pub struct Test {
    /// Working directory for the command under test
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Path inside the test directory.
    pub fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}
