//! Run configuration.
//!
//! A [`CopyConfig`] is built once from the command line and passed by
//! reference to each pipeline. Nothing in it changes during a run.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::core::types::EnvironmentName;
use crate::error::{ConfigError, Result};

/// A GitHub repository in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Repository {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepository(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;

        let well_formed = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        if !well_formed(owner) || !well_formed(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Where to copy from and to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub repo: Repository,
    pub source: EnvironmentName,
    pub target: EnvironmentName,
}

impl Route {
    /// # Errors
    ///
    /// Returns `ConfigError::SameEnvironment` if source and target match.
    pub fn new(
        repo: Repository,
        source: impl Into<EnvironmentName>,
        target: impl Into<EnvironmentName>,
    ) -> Result<Self> {
        let source = source.into();
        let target = target.into();
        if source == target {
            return Err(ConfigError::SameEnvironment(source).into());
        }
        Ok(Self {
            repo,
            source,
            target,
        })
    }
}

/// How secret values are obtained, if secrets are copied at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsMode {
    /// Print source secret names; write nothing.
    ListOnly,
    /// Write a name -> "" JSON template to the path.
    GenerateTemplate(PathBuf),
    /// Read name -> value from a JSON file.
    FromFile(PathBuf),
    /// Prompt for each value with hidden input.
    Interactive,
    /// Upload an empty value for every secret.
    EmptyValues,
}

impl SecretsMode {
    /// Read-only modes inspect the source and never touch the target.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ListOnly | Self::GenerateTemplate(_))
    }
}

/// When the target environment's public key is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Once per secrets pipeline run.
    #[default]
    PerRun,
    /// Before every secret upload.
    PerSecret,
}

/// Execution knobs shared by both pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Worker threads for per-item writes. 1 keeps strict listing order.
    pub jobs: usize,
    pub dry_run: bool,
    pub key_policy: KeyPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jobs: 1,
            dry_run: false,
            key_policy: KeyPolicy::PerRun,
        }
    }
}

/// Everything a run needs to know, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyConfig {
    pub route: Route,
    pub secrets: Option<SecretsMode>,
    pub settings: Settings,
}

impl CopyConfig {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            secrets: None,
            settings: Settings::default(),
        }
    }

    pub fn with_secrets(mut self, mode: SecretsMode) -> Self {
        self.secrets = Some(mode);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Variables are copied unless a read-only secrets mode was chosen.
    pub fn copies_variables(&self) -> bool {
        !self.secrets.as_ref().is_some_and(SecretsMode::is_read_only)
    }
}
