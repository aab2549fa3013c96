//! Variable copy pipeline.

use tracing::{debug, info};

use crate::core::cancel::Cancellation;
use crate::core::config::CopyConfig;
use crate::core::domain::{
    CopyReport, EnvironmentVariable, ItemReport, Outcome, Pipeline, SkipReason,
};
use crate::core::pipeline::pool;
use crate::core::remote::Remote;
use crate::core::validation::{validate_name, validate_value};
use crate::error::Result;

/// Copy every eligible variable from the source to the target environment.
///
/// Variables with an empty value or an invalid name are skipped. A failed
/// create is recorded against that variable and the rest still run.
///
/// # Errors
///
/// Returns the listing error if the source variables cannot be fetched.
pub fn copy_variables(
    remote: &dyn Remote,
    config: &CopyConfig,
    cancel: &Cancellation,
) -> Result<CopyReport> {
    let route = &config.route;
    info!(
        repo = %route.repo,
        source = %route.source,
        target = %route.target,
        "copying variables"
    );

    let variables = remote.list_variables(&route.repo, &route.source)?;
    debug!(count = variables.len(), "source variables listed");

    let outcomes = pool::run(&variables, config.settings.jobs, cancel, |variable| {
        copy_one(remote, config, variable)
    });

    let items = variables
        .into_iter()
        .zip(outcomes)
        .map(|(variable, outcome)| ItemReport {
            name: variable.name,
            outcome: outcome.unwrap_or(Outcome::Skipped(SkipReason::Cancelled)),
        })
        .collect();

    Ok(CopyReport::new(
        Pipeline::Variables,
        &route.source,
        &route.target,
        items,
    ))
}

fn copy_one(remote: &dyn Remote, config: &CopyConfig, variable: &EnvironmentVariable) -> Outcome {
    if validate_value(&variable.name, &variable.value).is_err() {
        debug!(name = %variable.name, "skipping empty variable");
        return Outcome::Skipped(SkipReason::EmptyValue);
    }
    if let Err(e) = validate_name(&variable.name) {
        debug!(name = %variable.name, error = %e, "skipping invalid variable name");
        return Outcome::Skipped(SkipReason::InvalidName(e.to_string()));
    }
    if config.settings.dry_run {
        return Outcome::DryRun;
    }

    let route = &config.route;
    match remote.create_variable(&route.repo, &route.target, variable) {
        Ok(()) => {
            debug!(name = %variable.name, "variable created");
            Outcome::Created
        }
        Err(e) => {
            debug!(name = %variable.name, error = %e, "variable create failed");
            Outcome::CreateFailed(e.to_string())
        }
    }
}
