//! Startup capability probe.
//!
//! Resolves the external tools a run depends on and checks that sealing
//! works, once, before any remote call is made.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::cipher::{SealedBox, Sealer, Unavailable};
use crate::core::constants;
use crate::error::{Result, SetupError};

/// What this process can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Resolved GitHub CLI binary.
    pub gh: PathBuf,
    /// Whether secrets can be sealed. Variables are copied either way.
    pub can_encrypt: bool,
}

impl Capabilities {
    /// Probe for the GitHub CLI and a working sealed-box implementation.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::DependencyMissing` if `gh` cannot be resolved.
    pub fn probe(gh: &Path) -> Result<Self> {
        let resolved = which::which(gh).map_err(|e| {
            debug!(gh = %gh.display(), error = %e, "gh lookup failed");
            SetupError::DependencyMissing {
                name: gh.display().to_string(),
                hint: constants::GH_INSTALL_HINT,
            }
        })?;
        debug!(gh = %resolved.display(), "found gh");

        let can_encrypt = SealedBox::self_test();
        if !can_encrypt {
            warn!("sealed-box self-test failed; secret cloning disabled");
        }

        Ok(Self {
            gh: resolved,
            can_encrypt,
        })
    }

    /// The sealer matching the probe result.
    pub fn sealer(&self) -> &'static dyn Sealer {
        if self.can_encrypt {
            &SealedBox
        } else {
            &Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::RecipientPublicKey;
    use crate::error::{Error, SealError};

    #[test]
    fn test_missing_gh_is_dependency_error() {
        let err = Capabilities::probe(Path::new("/nonexistent/envcopy-test/gh")).unwrap_err();
        assert!(matches!(
            err,
            Error::Setup(SetupError::DependencyMissing { .. })
        ));
    }

    #[test]
    fn test_sealer_follows_capability() {
        let key = RecipientPublicKey::new("1", [9u8; 32]);
        let caps = Capabilities {
            gh: PathBuf::from("gh"),
            can_encrypt: false,
        };
        assert_eq!(
            caps.sealer().seal(&key, b"x"),
            Err(SealError::EncryptionUnavailable)
        );

        let caps = Capabilities {
            can_encrypt: true,
            ..caps
        };
        assert!(caps.sealer().seal(&key, b"x").is_ok());
    }
}
