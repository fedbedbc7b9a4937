//! `jgen variables` - show the inputs a pattern needs.

use super::{Context, Status};
use crate::report;
use anyhow::Result;
use journalgen_engine::{InMemoryPoster, JournalGenerator, PatternRepository};
use std::io::Write;

/// Arguments for `jgen variables`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Pattern code
    #[arg(value_name = "CODE")]
    pub code: String,
}

/// Run the command.
pub fn run<W: Write>(ctx: &Context, args: &Args, out: &mut W) -> Result<Status> {
    let catalog = ctx.load_catalog()?;
    let pattern = catalog.find_by_code(&args.code)?;
    let generator =
        JournalGenerator::with_options(catalog, InMemoryPoster::new(), ctx.options.clone());

    match generator.required_variables(&args.code) {
        Ok(variables) => {
            if ctx.json() {
                serde_json::to_writer_pretty(&mut *out, &variables)?;
                writeln!(out)?;
            } else {
                for name in &variables {
                    writeln!(out, "{name}")?;
                }
            }
            Ok(Status::Success)
        }
        Err(e) => {
            if ctx.json() {
                let output = report::JsonOutput::new(report::generate_diagnostics(&args.code, &e));
                serde_json::to_writer_pretty(&mut *out, &output)?;
                writeln!(out)?;
            } else {
                let pattern = pattern.as_deref();
                report::report_generate_error(pattern, &args.code, &e, ctx.color, out)?;
            }
            Ok(Status::Failure)
        }
    }
}
