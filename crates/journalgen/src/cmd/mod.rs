//! Command implementations for the `jgen` CLI.
//!
//! Each subcommand lives in its own module and writes to a caller-supplied
//! writer, so the thin `jgen` binary and the tests share one code path.
//!
//! Exit codes: 0 on success, 1 when a pattern or generation fails, 2 on
//! operational errors (unreadable files, bad settings).

pub mod check;
pub mod generate;
pub mod list;
pub mod variables;

use crate::settings::Settings;
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use journalgen_core::Pattern;
use journalgen_engine::{GeneratorOptions, PatternCatalog};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for operational errors.
pub const EXIT_ERROR: u8 = 2;

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Everything succeeded (exit code 0).
    Success,
    /// A pattern or generation failed (exit code 1).
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => Self::SUCCESS,
            Status::Failure => Self::from(1),
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling
    Json,
}

/// Generate balanced journal entries from reusable patterns.
#[derive(Parser, Debug)]
#[command(name = "jgen", author, version, about, long_about = None)]
pub struct Cli {
    /// Pattern catalog (JSON array of patterns)
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Settings file (defaults to ./jgen.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List patterns available for generation
    List(list::Args),
    /// Show the inputs a pattern requires
    Variables(variables::Args),
    /// Generate a journal entry from a pattern
    Generate(generate::Args),
    /// Check every pattern in the catalog for authoring defects
    Check(check::Args),
}

/// Resolved inputs shared by all subcommands.
#[derive(Debug)]
pub struct Context {
    /// Catalog file.
    pub catalog_path: PathBuf,
    /// Generator options.
    pub options: GeneratorOptions,
    /// Output format.
    pub format: OutputFormat,
    /// Colorize diagnostics.
    pub color: bool,
}

impl Context {
    /// Resolve settings and flags.
    pub fn new(cli: &Cli, color: bool) -> Result<Self> {
        let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
        Ok(Self {
            catalog_path: settings.catalog_path(cli.catalog.as_deref()),
            options: settings.generator_options()?,
            format: cli.format,
            color,
        })
    }

    /// Read the catalog file without validating the patterns.
    pub fn load_patterns(&self) -> Result<Vec<Pattern>> {
        load_patterns(&self.catalog_path)
    }

    /// Read the catalog file into a validated catalog.
    pub fn load_catalog(&self) -> Result<PatternCatalog> {
        PatternCatalog::from_patterns(self.load_patterns()?).with_context(|| {
            format!(
                "invalid pattern in {} (run `jgen check` for details)",
                self.catalog_path.display()
            )
        })
    }

    /// Check if JSON output was requested.
    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

/// Read a JSON array of patterns.
pub fn load_patterns(path: &Path) -> Result<Vec<Pattern>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let patterns: Vec<Pattern> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;
    tracing::debug!(path = %path.display(), patterns = patterns.len(), "catalog loaded");
    Ok(patterns)
}

/// Run a parsed command line, writing results to `out`.
pub fn run<W: Write>(cli: &Cli, color: bool, out: &mut W) -> Result<Status> {
    let ctx = Context::new(cli, color)?;
    match &cli.command {
        Command::List(args) => list::run(&ctx, args, out),
        Command::Variables(args) => variables::run(&ctx, args, out),
        Command::Generate(args) => generate::run(&ctx, args, out),
        Command::Check(args) => check::run(&ctx, args, out),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Main entry point for the `jgen` binary.
pub fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    match run(&cli, color, &mut out) {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
