//! Domain types.
//!
//! All values are request-scoped: created, used and dropped within one pass
//! over an environment.

mod report;
mod secret;
mod variable;

pub use report::{CopyReport, ItemReport, Outcome, Pipeline, SkipReason};
pub use secret::{RecipientPublicKey, SealedSecret, SecretDescriptor, SecretValue};
pub use variable::EnvironmentVariable;
