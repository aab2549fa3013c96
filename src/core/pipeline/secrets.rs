//! Secret copy pipeline.
//!
//! Secret values cannot be read back from the remote store, so every mode
//! that writes supplies values locally. Values are resolved sequentially
//! first (prompting must not interleave with workers), then sealed and
//! uploaded through the worker pool.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::cancel::Cancellation;
use crate::core::cipher::Sealer;
use crate::core::config::{CopyConfig, KeyPolicy, Repository, SecretsMode};
use crate::core::domain::{
    CopyReport, ItemReport, Outcome, Pipeline, RecipientPublicKey, SealedSecret, SecretDescriptor,
    SecretValue, SkipReason,
};
use crate::core::pipeline::pool;
use crate::core::prompt::ValuePrompt;
use crate::core::remote::Remote;
use crate::core::secrets_file::{self, SecretsFile};
use crate::core::validation::validate_name;
use crate::error::Result;

/// What the secrets pipeline works from, prepared before the remote is
/// touched.
pub enum SecretsInput<'a> {
    /// Report source names only.
    List,
    /// Report source names and write an empty-valued template here.
    Template(PathBuf),
    File(SecretsFile),
    Prompt(&'a mut dyn ValuePrompt),
    Empty,
}

impl<'a> SecretsInput<'a> {
    /// Prepare the input for `mode`. A secrets file is loaded here, so an
    /// unusable file fails before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `FileError::SecretsFileNotFound`, `Read` or `Parse` for an
    /// unusable secrets file.
    pub fn prepare(mode: &SecretsMode, prompt: &'a mut dyn ValuePrompt) -> Result<Self> {
        Ok(match mode {
            SecretsMode::ListOnly => Self::List,
            SecretsMode::GenerateTemplate(path) => Self::Template(path.clone()),
            SecretsMode::FromFile(path) => Self::File(SecretsFile::load(path)?),
            SecretsMode::Interactive => Self::Prompt(prompt),
            SecretsMode::EmptyValues => Self::Empty,
        })
    }

    /// Read-only inputs never write to the target.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::List | Self::Template(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Template(_) => "template",
            Self::File(_) => "file",
            Self::Prompt(_) => "prompt",
            Self::Empty => "empty",
        }
    }
}

/// Copy secrets from the source to the target environment.
///
/// `List` and `Template` report every source secret as `Listed` and never
/// write to the target. The other inputs seal and upload each secret that
/// has a value; failures are recorded per secret.
///
/// # Errors
///
/// Returns the listing error if the source secrets cannot be fetched,
/// `FileError::TemplateWrite` if the template cannot be written, or a
/// prompt error if the terminal cannot be read.
pub fn copy_secrets(
    remote: &dyn Remote,
    config: &CopyConfig,
    input: SecretsInput<'_>,
    sealer: &dyn Sealer,
    cancel: &Cancellation,
) -> Result<CopyReport> {
    let route = &config.route;
    info!(
        repo = %route.repo,
        source = %route.source,
        target = %route.target,
        input = input.kind(),
        "copying secrets"
    );

    let secrets = remote.list_secret_names(&route.repo, &route.source)?;
    debug!(count = secrets.len(), "source secrets listed");

    let report = |outcomes: Vec<Option<Outcome>>| {
        let items = secrets
            .iter()
            .zip(outcomes)
            .map(|(secret, outcome)| ItemReport {
                name: secret.name.clone(),
                outcome: outcome.unwrap_or(Outcome::Skipped(SkipReason::Cancelled)),
            })
            .collect();
        CopyReport::new(Pipeline::Secrets, &route.source, &route.target, items)
    };
    let listed = || report(vec![Some(Outcome::Listed); secrets.len()]);

    let mut source = match input {
        SecretsInput::List => return Ok(listed()),
        SecretsInput::Template(path) => {
            secrets_file::write_template(&path, secrets.iter().map(|s| s.name.as_str()))?;
            return Ok(listed());
        }
        SecretsInput::File(file) => {
            for name in file.names() {
                if !secrets.iter().any(|s| s.name == name) {
                    debug!(name, "secrets file entry has no source secret; ignored");
                }
            }
            ValueSource::File(file)
        }
        SecretsInput::Prompt(prompt) => ValueSource::Prompt(prompt),
        SecretsInput::Empty => ValueSource::Empty,
    };

    let mut outcomes: Vec<Option<Outcome>> = vec![None; secrets.len()];
    let mut deliveries: Vec<(usize, SecretValue)> = Vec::new();

    for (index, secret) in secrets.iter().enumerate() {
        if cancel.is_cancelled() {
            break;
        }
        match source.resolve(secret)? {
            Resolution::Deliver(value) => deliveries.push((index, value)),
            Resolution::Skip(reason) => {
                debug!(name = %secret.name, %reason, "skipping secret");
                outcomes[index] = Some(Outcome::Skipped(reason));
            }
        }
    }

    let delivery = Delivery {
        remote,
        config,
        sealer,
        keys: RecipientKeyCache::new(config.settings.key_policy),
    };
    let delivered = pool::run(&deliveries, config.settings.jobs, cancel, |(_, value)| {
        delivery.deliver(value)
    });
    for ((index, _), outcome) in deliveries.iter().zip(delivered) {
        outcomes[*index] = outcome;
    }

    Ok(report(outcomes))
}

/// Where secret values come from.
enum ValueSource<'a> {
    File(SecretsFile),
    Prompt(&'a mut dyn ValuePrompt),
    Empty,
}

enum Resolution {
    Deliver(SecretValue),
    Skip(SkipReason),
}

impl ValueSource<'_> {
    fn resolve(&mut self, secret: &SecretDescriptor) -> Result<Resolution> {
        if let Err(e) = validate_name(&secret.name) {
            return Ok(Resolution::Skip(SkipReason::InvalidName(e.to_string())));
        }

        let name = secret.name.as_str();
        let resolution = match self {
            Self::File(file) => match file.get(name) {
                None => Resolution::Skip(SkipReason::NotInFile),
                Some("") => Resolution::Skip(SkipReason::EmptyInFile),
                Some(value) => Resolution::Deliver(SecretValue::new(
                    name,
                    Zeroizing::new(value.to_string()),
                )),
            },
            Self::Prompt(prompt) => match prompt.ask(name)? {
                Some(value) => Resolution::Deliver(SecretValue::new(name, value)),
                None => Resolution::Skip(SkipReason::NoInput),
            },
            Self::Empty => Resolution::Deliver(SecretValue::empty(name)),
        };
        Ok(resolution)
    }
}

/// Caches the target environment's public key according to a [`KeyPolicy`].
///
/// A failed fetch is not cached; the next secret tries again.
#[derive(Debug)]
pub struct RecipientKeyCache {
    policy: KeyPolicy,
    cached: Mutex<Option<RecipientPublicKey>>,
}

impl RecipientKeyCache {
    pub fn new(policy: KeyPolicy) -> Self {
        Self {
            policy,
            cached: Mutex::new(None),
        }
    }

    /// Current key for `env`, fetched if not cached.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the key cannot be fetched or decoded.
    pub fn get(
        &self,
        remote: &dyn Remote,
        repo: &Repository,
        env: &str,
    ) -> Result<RecipientPublicKey> {
        if self.policy == KeyPolicy::PerSecret {
            return remote.public_key(repo, env);
        }

        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }
        let key = remote.public_key(repo, env)?;
        debug!(key_id = key.key_id(), "fetched target public key");
        *cached = Some(key.clone());
        Ok(key)
    }
}

/// Seals and uploads one secret at a time. Shared by all workers.
struct Delivery<'a> {
    remote: &'a dyn Remote,
    config: &'a CopyConfig,
    sealer: &'a dyn Sealer,
    keys: RecipientKeyCache,
}

impl Delivery<'_> {
    fn deliver(&self, value: &SecretValue) -> Outcome {
        let route = &self.config.route;
        let name = value.name();

        let key = match self.keys.get(self.remote, &route.repo, &route.target) {
            Ok(key) => key,
            Err(e) => return Outcome::SealFailed(format!("public key unavailable: {}", e)),
        };

        let ciphertext = match self.sealer.seal(&key, value.plaintext()) {
            Ok(ciphertext) => ciphertext,
            Err(e) => return Outcome::SealFailed(e.to_string()),
        };

        if self.config.settings.dry_run {
            debug!(name, sealer = self.sealer.name(), "sealed (dry run)");
            return Outcome::DryRun;
        }

        let sealed = SealedSecret {
            name: name.to_string(),
            ciphertext,
            key_id: key.key_id().to_string(),
        };
        match self.remote.upsert_secret(&route.repo, &route.target, &sealed) {
            Ok(()) => {
                debug!(name, "secret uploaded");
                Outcome::Uploaded
            }
            Err(e) => {
                debug!(name, error = %e, "secret upload failed");
                Outcome::UploadFailed(e.to_string())
            }
        }
    }
}
