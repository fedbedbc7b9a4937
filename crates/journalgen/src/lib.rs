//! Journal generation CLI.
//!
//! This crate provides the `jgen` command-line tool:
//!
//! - `jgen list`: Show the active patterns (`--all` includes inactive ones)
//! - `jgen variables CODE`: Show the inputs a pattern requires
//! - `jgen generate CODE --var name=value`: Evaluate a pattern into an entry
//! - `jgen check`: Lint every pattern in the catalog
//!
//! # Example Usage
//!
//! ```bash
//! jgen --catalog patterns.json list
//! jgen --catalog patterns.json variables P001
//! jgen --catalog patterns.json generate P001 --var amount=1200 --ctx ref=T-77
//! jgen --catalog patterns.json check --format json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod report;
pub mod settings;
