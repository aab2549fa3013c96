//! In-memory remote and scripted prompt.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use base64::Engine;
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use zeroize::Zeroizing;

use envcopy::core::config::Repository;
use envcopy::core::domain::{
    EnvironmentVariable, RecipientPublicKey, SealedSecret, SecretDescriptor,
};
use envcopy::core::prompt::ValuePrompt;
use envcopy::core::remote::Remote;
use envcopy::error::{RemoteError, Result};

/// A write the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Variable {
        env: String,
        name: String,
        value: String,
    },
    Secret {
        env: String,
        name: String,
        ciphertext: String,
        key_id: String,
    },
}

impl Write {
    pub fn name(&self) -> &str {
        match self {
            Write::Variable { name, .. } | Write::Secret { name, .. } => name,
        }
    }
}

/// In-memory environment store.
///
/// Every environment shares one key pair so uploaded ciphertexts can be
/// opened again with [`FakeRemote::open`].
pub struct FakeRemote {
    variables: HashMap<String, Vec<EnvironmentVariable>>,
    secrets: HashMap<String, Vec<String>>,
    secret_key: SecretKey,
    key_id: String,
    bad_key: bool,
    failing_variable_listing: bool,
    failing_secret_listing: bool,
    failing_writes: HashSet<String>,
    writes: Mutex<Vec<Write>>,
    key_fetches: AtomicUsize,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
            secrets: HashMap::new(),
            secret_key: SecretKey::generate(&mut OsRng),
            key_id: "568250167242549743".to_string(),
            bad_key: false,
            failing_variable_listing: false,
            failing_secret_listing: false,
            failing_writes: HashSet::new(),
            writes: Mutex::new(Vec::new()),
            key_fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_variables(mut self, env: &str, vars: &[(&str, &str)]) -> Self {
        let vars = vars
            .iter()
            .map(|(name, value)| EnvironmentVariable::new(*name, *value))
            .collect();
        self.variables.insert(env.to_string(), vars);
        self
    }

    pub fn with_secrets(mut self, env: &str, names: &[&str]) -> Self {
        let names = names.iter().map(|n| n.to_string()).collect();
        self.secrets.insert(env.to_string(), names);
        self
    }

    /// Reject writes of `name` as if it already existed.
    pub fn failing_write(mut self, name: &str) -> Self {
        self.failing_writes.insert(name.to_string());
        self
    }

    /// Fail every listing call.
    pub fn failing_listings(self) -> Self {
        self.failing_variable_listing().failing_secret_listing()
    }

    pub fn failing_variable_listing(mut self) -> Self {
        self.failing_variable_listing = true;
        self
    }

    pub fn failing_secret_listing(mut self) -> Self {
        self.failing_secret_listing = true;
        self
    }

    /// Publish a public key that is not 32 bytes long.
    pub fn bad_public_key(mut self) -> Self {
        self.bad_key = true;
        self
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn written_names(&self) -> Vec<String> {
        self.writes().iter().map(|w| w.name().to_string()).collect()
    }

    pub fn key_fetches(&self) -> usize {
        self.key_fetches.load(Ordering::SeqCst)
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Decrypt a base64 sealed box produced for this remote's public key.
    pub fn open(&self, ciphertext: &str) -> Vec<u8> {
        let raw = base64::engine::general_purpose::STANDARD
            .decode(ciphertext)
            .expect("ciphertext is not base64");
        self.secret_key
            .unseal(&raw)
            .expect("ciphertext does not open with the target key")
    }

    fn fetch_error(&self, what: &str) -> envcopy::error::Error {
        RemoteError::Fetch {
            what: what.to_string(),
            detail: "HTTP 404: Not Found".to_string(),
        }
        .into()
    }

    fn record(&self, write: Write) -> Result<()> {
        if self.failing_writes.contains(write.name()) {
            return Err(RemoteError::Write {
                what: write.name().to_string(),
                detail: "HTTP 409: Already exists".to_string(),
            }
            .into());
        }
        self.writes.lock().unwrap().push(write);
        Ok(())
    }
}

impl Remote for FakeRemote {
    fn list_variables(&self, _repo: &Repository, env: &str) -> Result<Vec<EnvironmentVariable>> {
        if self.failing_variable_listing {
            return Err(self.fetch_error("variables"));
        }
        Ok(self.variables.get(env).cloned().unwrap_or_default())
    }

    fn create_variable(
        &self,
        _repo: &Repository,
        env: &str,
        variable: &EnvironmentVariable,
    ) -> Result<()> {
        self.record(Write::Variable {
            env: env.to_string(),
            name: variable.name.clone(),
            value: variable.value.clone(),
        })
    }

    fn list_secret_names(&self, _repo: &Repository, env: &str) -> Result<Vec<SecretDescriptor>> {
        if self.failing_secret_listing {
            return Err(self.fetch_error("secrets"));
        }
        let names = self.secrets.get(env).cloned().unwrap_or_default();
        Ok(names.into_iter().map(SecretDescriptor::new).collect())
    }

    fn public_key(&self, _repo: &Repository, _env: &str) -> Result<RecipientPublicKey> {
        self.key_fetches.fetch_add(1, Ordering::SeqCst);
        let bytes = if self.bad_key {
            vec![7u8; 16]
        } else {
            self.secret_key.public_key().as_bytes().to_vec()
        };
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(RecipientPublicKey::from_base64(self.key_id.clone(), &encoded)?)
    }

    fn upsert_secret(&self, _repo: &Repository, env: &str, secret: &SealedSecret) -> Result<()> {
        self.record(Write::Secret {
            env: env.to_string(),
            name: secret.name.clone(),
            ciphertext: secret.ciphertext.clone(),
            key_id: secret.key_id.clone(),
        })
    }
}

/// Prompt that answers from a fixed script. `None` answers mean no input.
pub struct ScriptedPrompt {
    answers: VecDeque<Option<String>>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
            asked: Vec::new(),
        }
    }
}

impl ValuePrompt for ScriptedPrompt {
    fn ask(&mut self, name: &str) -> Result<Option<Zeroizing<String>>> {
        self.asked.push(name.to_string());
        Ok(self
            .answers
            .pop_front()
            .flatten()
            .filter(|v| !v.is_empty())
            .map(Zeroizing::new))
    }
}
