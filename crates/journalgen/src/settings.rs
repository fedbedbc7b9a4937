//! CLI settings.
//!
//! Settings come from an optional TOML file (`jgen.toml` in the working
//! directory, or the file given with `--config`) overlaid with `JGEN_*`
//! environment variables:
//!
//! ```toml
//! catalog = "patterns.json"
//! tolerance = "0.01"
//! placeholder_policy = "error"   # or "blank"
//! require_active = false
//! ```

use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment, File};
use journalgen_engine::{GeneratorOptions, PlaceholderPolicy};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Settings file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "jgen.toml";

/// Catalog file used when neither the flag nor the settings name one.
pub const DEFAULT_CATALOG_FILE: &str = "patterns.json";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "JGEN";

/// Resolved CLI settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pattern catalog file.
    pub catalog: Option<PathBuf>,
    /// Balance tolerance as a decimal string.
    pub tolerance: Option<String>,
    /// Handling of unresolved description placeholders.
    pub placeholder_policy: PlaceholderPolicy,
    /// Reject inactive patterns.
    pub require_active: bool,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit `config_file` must exist; the default file is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// The catalog file, preferring `flag` over the settings.
    pub fn catalog_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.catalog.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
    }

    /// Generator options described by these settings.
    pub fn generator_options(&self) -> Result<GeneratorOptions> {
        let mut options = GeneratorOptions::default()
            .with_placeholder_policy(self.placeholder_policy)
            .with_require_active(self.require_active);
        if let Some(raw) = &self.tolerance {
            let tolerance = Decimal::from_str(raw.trim())
                .with_context(|| format!("invalid tolerance `{raw}`"))?;
            options = options.with_tolerance(tolerance);
        }
        Ok(options)
    }
}
