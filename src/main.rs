//! envcopy - Copy GitHub Actions environment variables and secrets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envcopy::cli::output;
use envcopy::cli::{execute, Cli};
use envcopy::core::constants::LOG_ENV;
use envcopy::error::{Error, FileError, RemoteError};

fn main() {
    // Usage errors exit with 1 rather than clap's default of 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envcopy=debug")
        } else {
            EnvFilter::new("envcopy=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::File(FileError::SecretsFileNotFound(_)) => {
                Some("create one with --generate-secrets-template FILE")
            }
            Error::Remote(RemoteError::Fetch { .. }) | Error::Incomplete(_) => {
                Some("check the environment names and run: gh auth status")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
