//! Core types for journalgen
//!
//! This crate provides the data model shared by the formula evaluator, the
//! generation engine, and the CLI:
//!
//! - [`Pattern`] - A reusable template of debit/credit lines
//! - [`PatternLine`] - One line of a pattern with its amount formula
//! - [`Side`] - Debit or credit
//! - [`GenerationRequest`] - Concrete inputs for one generation call
//! - [`DraftJournalEntry`] - The balanced, evaluated result ready for posting
//!
//! # Example
//!
//! ```
//! use journalgen_core::{Pattern, PatternLine};
//!
//! let pattern = Pattern::new("P001", "Cash sale")
//!     .with_line(PatternLine::debit(1, "1100", "amount"))
//!     .with_line(PatternLine::credit(2, "4100", "amount"));
//!
//! assert_eq!(pattern.lines.len(), 2);
//! assert!(pattern.is_active);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod entry;
pub mod money;
pub mod pattern;
pub mod request;

pub use entry::{DraftJournalEntry, DraftJournalLine, JournalEntryId};
pub use pattern::{Pattern, PatternLine, PatternSummary, Side};
pub use request::GenerationRequest;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
