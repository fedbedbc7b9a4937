//! `jgen list` - show the pattern pick-list.

use super::{Context, Status};
use anyhow::Result;
use journalgen_core::PatternSummary;
use journalgen_engine::PatternRepository;
use std::io::Write;

/// Arguments for `jgen list`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Include inactive patterns
    #[arg(long)]
    pub all: bool,
}

/// Run the command.
pub fn run<W: Write>(ctx: &Context, args: &Args, out: &mut W) -> Result<Status> {
    let catalog = ctx.load_catalog()?;
    let summaries: Vec<PatternSummary> = if args.all {
        catalog.list_all().iter().map(|p| p.summary()).collect()
    } else {
        catalog.list_active()?
    };

    if ctx.json() {
        serde_json::to_writer_pretty(&mut *out, &summaries)?;
        writeln!(out)?;
        return Ok(Status::Success);
    }

    if summaries.is_empty() {
        writeln!(out, "No patterns")?;
    }
    let width = summaries.iter().map(|s| s.code.len()).max().unwrap_or(0);
    for summary in &summaries {
        let marker = if summary.is_active { "" } else { "  (inactive)" };
        writeln!(out, "{:width$}  {}{marker}", summary.code, summary.name)?;
    }
    Ok(Status::Success)
}
