//! `jgen generate` - evaluate a pattern into a journal entry.

use super::{Context, Status};
use crate::report;
use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use journalgen_core::{DraftJournalEntry, GenerationRequest, JournalEntryId};
use journalgen_engine::{InMemoryPoster, JournalGenerator, PatternRepository};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Arguments for `jgen generate`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Pattern code
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Variable value (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Description placeholder value (repeatable)
    #[arg(long = "ctx", value_name = "TOKEN=VALUE", value_parser = parse_key_val)]
    pub context: Vec<(String, String)>,

    /// Journal date (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Description used for every line instead of the pattern's templates
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Post the entry and print its id. The poster lives only for this run,
    /// so this is a dry run: nothing is stored and ids start at JE-000001.
    #[arg(long)]
    pub post: bool,
}

impl Args {
    /// Build the generation request.
    pub fn request(&self) -> GenerationRequest {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut request = GenerationRequest::new(&self.code, date);
        for (name, value) in &self.vars {
            request = request.with_value(name, value);
        }
        for (token, value) in &self.context {
            request = request.with_context(token, value);
        }
        if let Some(description) = &self.description {
            request = request.with_override_description(description);
        }
        request
    }
}

/// Parse a `key=value` argument.
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let Some((key, value)) = s.split_once('=') else {
        bail!("expected NAME=VALUE, got `{s}`");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("missing name in `{s}`");
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(flatten)]
    entry: &'a DraftJournalEntry,
    total_debit: Option<Decimal>,
    total_credit: Option<Decimal>,
}

/// Run the command.
pub fn run<W: Write>(ctx: &Context, args: &Args, out: &mut W) -> Result<Status> {
    let catalog = ctx.load_catalog()?;
    let pattern = catalog.find_by_code(&args.code)?;
    let generator =
        JournalGenerator::with_options(catalog, InMemoryPoster::new(), ctx.options.clone());
    let request = args.request();

    let result = if args.post {
        generator.generate(&request).map(|id| {
            let entry = generator.poster().get(id);
            (Some(id), entry)
        })
    } else {
        generator.preview(&request).map(|entry| (None, Some(entry)))
    };

    match result {
        Ok((id, Some(entry))) => {
            if ctx.json() {
                write_json(id, &entry, out)?;
            } else {
                write_text(id, &entry, out)?;
            }
            Ok(Status::Success)
        }
        Ok((id, None)) => bail!("posted entry {id:?} could not be read back"),
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

fn write_json<W: Write>(
    id: Option<JournalEntryId>,
    entry: &DraftJournalEntry,
    out: &mut W,
) -> Result<()> {
    let json = JsonEntry {
        id: id.map(|id| id.to_string()),
        entry,
        total_debit: entry.total_debit(),
        total_credit: entry.total_credit(),
    };
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)?;
    Ok(())
}

fn write_text<W: Write>(
    id: Option<JournalEntryId>,
    entry: &DraftJournalEntry,
    out: &mut W,
) -> Result<()> {
    match id {
        Some(id) => writeln!(out, "{id} {} {}", entry.journal_date, entry.source_pattern)?,
        None => writeln!(out, "{} {}", entry.journal_date, entry.source_pattern)?,
    }

    let account_width = entry
        .lines
        .iter()
        .map(|l| l.account_code.len())
        .max()
        .unwrap_or(0);
    for line in &entry.lines {
        let (debit, credit) = if line.side.is_debit() {
            (line.amount.to_string(), String::new())
        } else {
            (String::new(), line.amount.to_string())
        };
        let row = format!(
            "  {:account_width$}  {debit:>12}  {credit:>12}  {}",
            line.account_code, line.description
        );
        writeln!(out, "{}", row.trim_end())?;
    }
    writeln!(
        out,
        "  {:account_width$}  {:>12}  {:>12}",
        "",
        format_total(entry.total_debit()),
        format_total(entry.total_credit())
    )?;
    Ok(())
}

fn format_total(total: Option<Decimal>) -> String {
    total.map_or_else(|| "overflow".to_string(), |t| t.to_string())
}
