//! Environment variable type.

use serde::{Deserialize, Serialize};

use crate::core::types::Name;

/// A plaintext variable as listed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: Name,
    #[serde(default)]
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<Name>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
