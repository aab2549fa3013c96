//! Command-line interface.

pub mod output;
pub mod report;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use tracing::debug;

use crate::core::cancel::Cancellation;
use crate::core::capabilities::Capabilities;
use crate::core::config::{CopyConfig, KeyPolicy, Repository, Route, SecretsMode, Settings};
use crate::core::constants::{self, MAX_JOBS};
use crate::core::pipeline::{copy_secrets, copy_variables, SecretsInput};
use crate::core::prompt::TerminalPrompt;
use crate::core::remote::{GhCli, Remote};
use crate::core::secrets_file;
use crate::error::{Error, Result, SealError};

use report::RunDocument;

/// envcopy - Copy GitHub Actions environment variables and secrets.
#[derive(Parser, Debug)]
#[command(
    name = "envcopy",
    about = "Copy GitHub Actions environment variables and secrets between environments",
    version,
    group(ArgGroup::new("secrets_mode").multiple(false)),
    after_help = "Secret values cannot be read back from GitHub: supply them with \
                  --secrets-file, interactively with --with-secrets, or as empty \
                  values with --clone-secrets-empty."
)]
pub struct Cli {
    /// Environment to copy from
    pub source: String,

    /// Environment to copy to
    pub target: String,

    /// Repository in owner/repo form
    pub repo: Repository,

    /// Also copy secrets, prompting for each value
    #[arg(long)]
    pub with_secrets: bool,

    /// Read secret values from a JSON file (name -> value)
    #[arg(long, value_name = "FILE", group = "secrets_mode")]
    pub secrets_file: Option<PathBuf>,

    /// List source secret names and exit without writing
    #[arg(long, group = "secrets_mode")]
    pub list_secrets_only: bool,

    /// Write a JSON template of source secret names to FILE and exit
    #[arg(long, value_name = "FILE", group = "secrets_mode")]
    pub generate_secrets_template: Option<PathBuf>,

    /// Create every secret with an empty value
    #[arg(long, group = "secrets_mode")]
    pub clone_secrets_empty: bool,

    /// Read and seal, but write nothing to the target
    #[arg(long)]
    pub dry_run: bool,

    /// Parallel writes (1 keeps listing order)
    #[arg(
        short,
        long,
        env = "ENVCOPY_JOBS",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..=MAX_JOBS as i64)
    )]
    pub jobs: u16,

    /// Fetch the target public key before every secret instead of once
    #[arg(long)]
    pub refresh_public_key: bool,

    /// Stop starting new items after SECS seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// GitHub CLI binary
    #[arg(long, env = "ENVCOPY_GH", default_value = constants::GH_BIN)]
    pub gh: PathBuf,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Secrets mode selected by the flags. `--with-secrets` alone means interactive.
    pub fn secrets_mode(&self) -> Option<SecretsMode> {
        if self.list_secrets_only {
            Some(SecretsMode::ListOnly)
        } else if let Some(path) = &self.generate_secrets_template {
            Some(SecretsMode::GenerateTemplate(path.clone()))
        } else if let Some(path) = &self.secrets_file {
            Some(SecretsMode::FromFile(path.clone()))
        } else if self.clone_secrets_empty {
            Some(SecretsMode::EmptyValues)
        } else if self.with_secrets {
            Some(SecretsMode::Interactive)
        } else {
            None
        }
    }

    /// Build the immutable run configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SameEnvironment` if source and target match.
    pub fn config(&self) -> Result<CopyConfig> {
        let route = Route::new(self.repo.clone(), &self.source, &self.target)?;
        let settings = Settings {
            jobs: usize::from(self.jobs),
            dry_run: self.dry_run,
            key_policy: if self.refresh_public_key {
                KeyPolicy::PerSecret
            } else {
                KeyPolicy::PerRun
            },
        };

        let mut config = CopyConfig::new(route).with_settings(settings);
        config.secrets = self.secrets_mode();
        Ok(config)
    }

    fn cancellation(&self) -> Cancellation {
        match self.timeout {
            Some(secs) => Cancellation::with_timeout(Duration::from_secs(secs)),
            None => Cancellation::new(),
        }
    }
}

/// Execute a parsed command line.
///
/// Setup problems (bad arguments, an unusable secrets file, missing `gh`)
/// fail before any remote call.
pub fn execute(cli: Cli) -> Result<()> {
    let config = cli.config()?;

    let mut prompt = TerminalPrompt;
    let secrets = match &config.secrets {
        Some(mode) => Some(SecretsInput::prepare(mode, &mut prompt)?),
        None => None,
    };

    let caps = Capabilities::probe(&cli.gh)?;
    let remote = GhCli::new(&caps.gh);
    let cancel = cli.cancellation();

    run(&remote, &config, &caps, secrets, &cancel, cli.json)
}

/// Run both pipelines and print their reports.
///
/// The pipelines are independent: a failure that aborts one does not stop
/// the other. Such failures end the run with `Error::Incomplete` once
/// everything else has been reported.
pub fn run(
    remote: &dyn Remote,
    config: &CopyConfig,
    caps: &Capabilities,
    secrets: Option<SecretsInput<'_>>,
    cancel: &Cancellation,
    json: bool,
) -> Result<()> {
    let route = &config.route;
    let mut doc = RunDocument::default();
    let mut aborted = Vec::new();

    if !json {
        output::header(&format!("{}: {} → {}", route.repo, route.source, route.target));
        if config.settings.dry_run {
            output::dimmed("dry run: nothing will be written");
        }
    }

    if config.copies_variables() {
        match copy_variables(remote, config, cancel) {
            Ok(report) => {
                if !json {
                    report::print(&report);
                }
                doc.record(report);
            }
            Err(e) => {
                output::error(&format!("variables: {}", e));
                doc.errors.push(format!("variables: {}", e));
                aborted.push("variables");
            }
        }
    }

    if let Some(input) = secrets {
        if !caps.can_encrypt && !input.is_read_only() {
            let msg = format!("secrets not copied: {}", SealError::EncryptionUnavailable);
            if !json {
                output::warn(&msg);
            }
            doc.errors.push(msg);
        } else {
            let template = match &input {
                SecretsInput::Template(path) => Some(path.clone()),
                _ => None,
            };
            match copy_secrets(remote, config, input, caps.sealer(), cancel) {
                Ok(report) => {
                    if !json {
                        report::print(&report);
                        if let Some(path) = &template {
                            template_hints(path);
                        }
                    }
                    doc.record(report);
                }
                Err(e) => {
                    output::error(&format!("secrets: {}", e));
                    doc.errors.push(format!("secrets: {}", e));
                    aborted.push("secrets");
                }
            }
        }
    }

    if json {
        let rendered = serde_json::to_string_pretty(&doc).map_err(std::io::Error::from)?;
        println!("{}", rendered);
    } else {
        println!();
        output::dimmed("done");
    }

    debug!(aborted = aborted.len(), "run finished");
    if aborted.is_empty() {
        Ok(())
    } else {
        Err(Error::Incomplete(aborted))
    }
}

fn template_hints(path: &std::path::Path) {
    println!();
    output::success(&format!("template written to {}", output::path(path)));
    if !secrets_file::is_gitignored_name(path) {
        output::warn(&format!(
            "{} is not covered by the default ignore rules ({}); keep it out of version control",
            output::path(path),
            constants::GITIGNORE_ENTRIES.join(", ")
        ));
    }
    output::hint(&format!(
        "fill in the values, then rerun with --secrets-file {}",
        path.display()
    ));
}
