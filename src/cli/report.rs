//! Report rendering.
//!
//! Human output prints one line per item followed by a summary; `--json`
//! collects everything into a single [`RunDocument`] printed at the end.

use serde::Serialize;

use crate::cli::output;
use crate::core::domain::{CopyReport, Outcome, Pipeline};

/// Everything a run produced, for `--json`.
#[derive(Debug, Default, Serialize)]
pub struct RunDocument {
    pub variables: Option<CopyReport>,
    pub secrets: Option<CopyReport>,
    pub errors: Vec<String>,
}

impl RunDocument {
    pub fn record(&mut self, report: CopyReport) {
        match report.pipeline {
            Pipeline::Variables => self.variables = Some(report),
            Pipeline::Secrets => self.secrets = Some(report),
        }
    }
}

/// Print every item's outcome and a summary line.
pub fn print(report: &CopyReport) {
    let title = match report.pipeline {
        Pipeline::Variables => "Variables",
        Pipeline::Secrets => "Secrets",
    };
    output::section(title);

    if report.items.is_empty() {
        output::dimmed(&format!("no {} in {}", report.pipeline, report.source));
        return;
    }

    for item in &report.items {
        let name = output::key(&item.name);
        match &item.outcome {
            Outcome::Created => output::success(&format!("created {}", name)),
            Outcome::Uploaded => output::success(&format!("uploaded {}", name)),
            Outcome::Listed => output::list_item(&name),
            Outcome::DryRun => output::dimmed(&format!("would copy {}", item.name)),
            Outcome::Skipped(reason) => output::warn(&format!("skipped {} ({})", name, reason)),
            Outcome::CreateFailed(reason) | Outcome::UploadFailed(reason) => {
                output::failure(&format!("failed {}: {}", name, reason))
            }
            Outcome::SealFailed(reason) => {
                output::failure(&format!("could not seal {}: {}", name, reason))
            }
        }
    }

    println!();
    output::kv(report.pipeline.as_str(), summary(report));
}

/// One-line count summary, e.g. `1 created, 2 skipped, 0 failed`.
pub fn summary(report: &CopyReport) -> String {
    let listed = report
        .items
        .iter()
        .filter(|i| matches!(i.outcome, Outcome::Listed))
        .count();
    if listed == report.items.len() && listed > 0 {
        return format!("{} listed", listed);
    }

    let mut summary = format!(
        "{} created, {} skipped, {} failed",
        report.created(),
        report.skipped(),
        report.failed()
    );
    let planned = report
        .items
        .iter()
        .filter(|i| matches!(i.outcome, Outcome::DryRun))
        .count();
    if planned > 0 {
        summary.push_str(&format!(", {} dry run", planned));
    }
    summary
}
