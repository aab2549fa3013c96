//! Copy pipelines.
//!
//! Each pipeline lists its source environment once, then handles every
//! listed item independently. A listing failure aborts that pipeline only;
//! per-item failures are recorded in the [`CopyReport`] and never abort.
//!
//! [`CopyReport`]: crate::core::domain::CopyReport

pub mod pool;
mod secrets;
mod variables;

pub use secrets::{copy_secrets, RecipientKeyCache, SecretsInput};
pub use variables::copy_variables;
