//! `jgen check` - lint every pattern in the catalog.

use super::{Context, Status};
use crate::report::{self, JsonOutput};
use anyhow::Result;
use journalgen_engine::check_pattern;
use std::io::Write;

/// Arguments for `jgen check`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Run the command.
pub fn run<W: Write>(ctx: &Context, args: &Args, out: &mut W) -> Result<Status> {
    let patterns = ctx.load_patterns()?;

    let mut diagnostics = Vec::new();
    let (mut errors, mut warnings) = (0, 0);
    for pattern in &patterns {
        let issues = check_pattern(pattern);
        if ctx.json() {
            diagnostics.extend(report::issue_diagnostics(pattern, &issues));
        } else {
            let (e, w) = report::report_issues(pattern, &issues, ctx.color, out)?;
            errors += e;
            warnings += w;
        }
    }

    if ctx.json() {
        let output = JsonOutput::new(diagnostics);
        errors = output.error_count;
        warnings = output.warning_count;
        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)?;
    } else {
        report::print_summary(errors, warnings, out)?;
    }

    tracing::debug!(patterns = patterns.len(), errors, warnings, "check finished");
    if errors > 0 || (args.strict && warnings > 0) {
        Ok(Status::Failure)
    } else {
        Ok(Status::Success)
    }
}
