//! GitHub CLI backend.
//!
//! Talks to the GitHub REST API through `gh api`, so authentication, host
//! selection and proxies follow the user's `gh` setup.
//!
//! ## Requirements
//!
//! - `gh` must be installed and authenticated (`gh auth login`)
//! - The token needs write access to the repository's environments
//!
//! Request bodies are passed as JSON on stdin (`--input -`), never as
//! command-line arguments, so values do not show up in process listings.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::Remote;
use crate::core::config::Repository;
use crate::core::constants::PAGE_SIZE;
use crate::core::domain::{EnvironmentVariable, RecipientPublicKey, SealedSecret, SecretDescriptor};
use crate::error::{RemoteError, Result};

/// `gh api` client bound to one `gh` binary.
#[derive(Debug, Clone)]
pub struct GhCli {
    bin: PathBuf,
}

/// One page of a listing endpoint.
trait Page: DeserializeOwned {
    type Item;

    fn total_count(&self) -> usize;
    fn into_items(self) -> Vec<Self::Item>;
}

#[derive(Debug, Deserialize)]
struct VariablesPage {
    #[serde(default)]
    total_count: usize,
    #[serde(default)]
    variables: Vec<EnvironmentVariable>,
}

impl Page for VariablesPage {
    type Item = EnvironmentVariable;

    fn total_count(&self) -> usize {
        self.total_count
    }

    fn into_items(self) -> Vec<EnvironmentVariable> {
        self.variables
    }
}

#[derive(Debug, Deserialize)]
struct SecretsPage {
    #[serde(default)]
    total_count: usize,
    #[serde(default)]
    secrets: Vec<SecretDescriptor>,
}

impl Page for SecretsPage {
    type Item = SecretDescriptor;

    fn total_count(&self) -> usize {
        self.total_count
    }

    fn into_items(self) -> Vec<SecretDescriptor> {
        self.secrets
    }
}

#[derive(Debug, Deserialize)]
struct PublicKeyResponse {
    key_id: String,
    key: String,
}

/// Base API path of an environment. The environment name is percent-encoded.
pub(crate) fn environment_path(repo: &Repository, env: &str) -> String {
    format!(
        "repos/{}/{}/environments/{}",
        repo.owner(),
        repo.name(),
        urlencoding::encode(env)
    )
}

impl GhCli {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Run `gh api`. On a non-zero exit, returns the raw response text.
    fn api(&self, method: &str, path: &str, body: Option<&[u8]>) -> Result<Vec<u8>> {
        trace!(method, path, "gh api");

        let mut cmd = Command::new(&self.bin);
        cmd.args(["api", "--method", method, path]);
        if body.is_some() {
            cmd.args(["--input", "-"]);
        }

        let mut child = cmd
            .stdin(if body.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RemoteError::Spawn {
                program: self.bin.display().to_string(),
                detail: e.to_string(),
            })?;

        // A child that exits early closes its stdin; keep its response.
        let mut write_failure = None;
        if let (Some(body), Some(mut stdin)) = (body, child.stdin.take()) {
            if let Err(e) = stdin.write_all(body) {
                debug!(method, path, error = %e, "gh api did not read the request body");
                write_failure = Some(e);
            }
        }

        let output = child.wait_with_output()?;
        if output.status.success() {
            return match write_failure {
                None => Ok(output.stdout),
                Some(e) => Err(RemoteError::Write {
                    what: path.to_string(),
                    detail: format!("request body not delivered: {}", e),
                }
                .into()),
            };
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let raw = [stdout.trim(), stderr.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        debug!(method, path, status = ?output.status.code(), "gh api failed");

        let err = if method == "GET" {
            RemoteError::Fetch {
                what: path.to_string(),
                detail: raw,
            }
        } else {
            RemoteError::Write {
                what: path.to_string(),
                detail: raw,
            }
        };
        Err(err.into())
    }

    fn get<T: DeserializeOwned>(&self, what: &str, path: &str) -> Result<T> {
        let bytes = self.api("GET", path, None)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            RemoteError::Decode {
                what: what.to_string(),
                detail: e.to_string(),
            }
            .into()
        })
    }

    fn send<B: Serialize>(&self, method: &str, path: &str, body: &B) -> Result<()> {
        let body = serde_json::to_vec(body).map_err(|e| RemoteError::Write {
            what: path.to_string(),
            detail: e.to_string(),
        })?;
        self.api(method, path, Some(&body))?;
        Ok(())
    }

    /// Fetch every page of a listing endpoint.
    fn paged<P: Page>(&self, what: &str, base: &str) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();

        for number in 1usize.. {
            let path = format!("{}?per_page={}&page={}", base, PAGE_SIZE, number);
            let page: P = self.get(what, &path)?;
            let total = page.total_count();
            let batch = page.into_items();
            let fetched = batch.len();
            items.extend(batch);

            if fetched < PAGE_SIZE || items.len() >= total {
                break;
            }
        }

        debug!(what, count = items.len(), "listed");
        Ok(items)
    }
}

impl Remote for GhCli {
    fn list_variables(&self, repo: &Repository, env: &str) -> Result<Vec<EnvironmentVariable>> {
        let base = format!("{}/variables", environment_path(repo, env));
        self.paged::<VariablesPage>("variables", &base)
    }

    fn create_variable(
        &self,
        repo: &Repository,
        env: &str,
        variable: &EnvironmentVariable,
    ) -> Result<()> {
        let path = format!("{}/variables", environment_path(repo, env));
        self.send("POST", &path, variable)
    }

    fn list_secret_names(&self, repo: &Repository, env: &str) -> Result<Vec<SecretDescriptor>> {
        let base = format!("{}/secrets", environment_path(repo, env));
        self.paged::<SecretsPage>("secrets", &base)
    }

    fn public_key(&self, repo: &Repository, env: &str) -> Result<RecipientPublicKey> {
        let path = format!("{}/secrets/public-key", environment_path(repo, env));
        let response: PublicKeyResponse = self.get("public key", &path)?;
        Ok(RecipientPublicKey::from_base64(
            response.key_id,
            &response.key,
        )?)
    }

    fn upsert_secret(&self, repo: &Repository, env: &str, secret: &SealedSecret) -> Result<()> {
        let path = format!(
            "{}/secrets/{}",
            environment_path(repo, env),
            urlencoding::encode(&secret.name)
        );
        self.send("PUT", &path, &secret.body())
    }
}
