//! Secrets file and template I/O.
//!
//! Both are a flat JSON object mapping secret name to value. Templates are
//! generated with every value empty, for the user to fill in.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::GITIGNORE_ENTRIES;
use crate::core::types::Name;
use crate::error::{FileError, Result};

/// Secret values loaded from a secrets file. Values are wiped on drop.
#[derive(Default)]
pub struct SecretsFile {
    values: BTreeMap<Name, Zeroizing<String>>,
}

impl SecretsFile {
    /// Load a secrets file.
    ///
    /// # Errors
    ///
    /// Returns `FileError::SecretsFileNotFound` if the path does not exist,
    /// `FileError::Read` if it cannot be read, or `FileError::Parse` if it is
    /// not a JSON object whose values are all strings.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading secrets file");

        if !path.exists() {
            return Err(FileError::SecretsFileNotFound(path.to_path_buf()).into());
        }
        let contents = Zeroizing::new(std::fs::read_to_string(path).map_err(|source| {
            FileError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?);
        let values: BTreeMap<Name, String> =
            serde_json::from_str(&contents).map_err(|source| FileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(entries = values.len(), "secrets file loaded");

        Ok(Self {
            values: values
                .into_iter()
                .map(|(name, value)| (name, Zeroizing::new(value)))
                .collect(),
        })
    }

    /// Value for `name`, if the file has an entry for it (possibly empty).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str())
    }

    /// Entry names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Write a template mapping every name to an empty string.
///
/// Keys are sorted and de-duplicated, so output does not depend on listing order.
///
/// # Errors
///
/// Returns `FileError::TemplateWrite` if the file cannot be written.
pub fn write_template<'a>(path: &Path, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let template: BTreeMap<&str, &str> = names.into_iter().map(|n| (n, "")).collect();
    let write_err = |source: io::Error| FileError::TemplateWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut contents = serde_json::to_string_pretty(&template)
        .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    contents.push('\n');
    std::fs::write(path, contents).map_err(write_err)?;

    debug!(path = %path.display(), entries = template.len(), "template written");
    Ok(())
}

/// Whether the file name matches one of the shipped gitignore patterns.
pub fn is_gitignored_name(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    GITIGNORE_ENTRIES.iter().any(|pattern| {
        glob::Pattern::new(pattern)
            .map(|p| p.matches(file_name))
            .unwrap_or(false)
    })
}
