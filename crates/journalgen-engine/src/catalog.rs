//! Pattern repository and posting collaborators.
//!
//! Persistence lives outside this crate. Generation talks to it through
//! [`PatternRepository`] and [`JournalPoster`]; [`PatternCatalog`] and
//! [`InMemoryPoster`] are in-memory implementations for tests and the CLI.

use journalgen_core::{DraftJournalEntry, JournalEntryId, Pattern, PatternSummary};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::lint::{self, PatternIssue, Severity};

/// Error reported by a pattern repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store is unavailable.
    #[error("pattern repository unavailable: {0}")]
    Unavailable(String),
    /// Any other repository failure.
    #[error("pattern repository error: {0}")]
    Other(String),
}

/// Error reported by a posting collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingError {
    /// The entry was refused.
    #[error("posting rejected: {0}")]
    Rejected(String),
    /// The posting backend is unavailable.
    #[error("posting backend unavailable: {0}")]
    Unavailable(String),
}

/// Source of pattern snapshots.
pub trait PatternRepository: Send + Sync {
    /// Look up a pattern by code.
    ///
    /// The returned snapshot is immutable; later edits to the pattern do not
    /// affect it.
    fn find_by_code(&self, code: &str) -> Result<Option<Arc<Pattern>>, RepositoryError>;

    /// Summaries of all active patterns, ordered by code.
    fn list_active(&self) -> Result<Vec<PatternSummary>, RepositoryError>;
}

/// Receiver of balanced draft entries.
pub trait JournalPoster: Send + Sync {
    /// Persist a draft entry and return its identifier.
    fn post(&self, entry: &DraftJournalEntry) -> Result<JournalEntryId, PostingError>;

    /// Number of posted entries generated from `pattern_code`.
    fn reference_count(&self, pattern_code: &str) -> Result<usize, PostingError>;
}

impl<T: PatternRepository + ?Sized> PatternRepository for Arc<T> {
    fn find_by_code(&self, code: &str) -> Result<Option<Arc<Pattern>>, RepositoryError> {
        (**self).find_by_code(code)
    }

    fn list_active(&self) -> Result<Vec<PatternSummary>, RepositoryError> {
        (**self).list_active()
    }
}

impl<T: PatternRepository + ?Sized> PatternRepository for &T {
    fn find_by_code(&self, code: &str) -> Result<Option<Arc<Pattern>>, RepositoryError> {
        (**self).find_by_code(code)
    }

    fn list_active(&self) -> Result<Vec<PatternSummary>, RepositoryError> {
        (**self).list_active()
    }
}

impl<T: JournalPoster + ?Sized> JournalPoster for &T {
    fn post(&self, entry: &DraftJournalEntry) -> Result<JournalEntryId, PostingError> {
        (**self).post(entry)
    }

    fn reference_count(&self, pattern_code: &str) -> Result<usize, PostingError> {
        (**self).reference_count(pattern_code)
    }
}

impl<T: JournalPoster + ?Sized> JournalPoster for Arc<T> {
    fn post(&self, entry: &DraftJournalEntry) -> Result<JournalEntryId, PostingError> {
        (**self).post(entry)
    }

    fn reference_count(&self, pattern_code: &str) -> Result<usize, PostingError> {
        (**self).reference_count(pattern_code)
    }
}

/// Error returned by catalog maintenance operations.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// A pattern with this code already exists.
    #[error("pattern `{0}` already exists")]
    DuplicateCode(String),
    /// No pattern with this code.
    #[error("pattern `{0}` not found")]
    NotFound(String),
    /// An update tried to change the immutable code.
    #[error("pattern code cannot change from `{from}` to `{to}`")]
    CodeChange {
        /// Existing code.
        from: String,
        /// Code carried by the update.
        to: String,
    },
    /// The pattern has error-severity issues.
    #[error("pattern `{code}` is invalid: {}", join(.issues))]
    Invalid {
        /// The pattern code.
        code: String,
        /// Error-severity issues.
        issues: Vec<PatternIssue>,
    },
    /// Posted entries reference the pattern; deactivate it instead.
    #[error("pattern `{code}` is referenced by {count} posted entries")]
    InUse {
        /// The pattern code.
        code: String,
        /// Number of referencing entries.
        count: usize,
    },
    /// The posting collaborator failed while checking references.
    #[error(transparent)]
    Posting(#[from] PostingError),
}

fn join(issues: &[PatternIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn validate(pattern: &Pattern) -> Result<(), CatalogError> {
    let issues: Vec<PatternIssue> = lint::check_pattern(pattern)
        .into_iter()
        .filter(|i| i.severity() == Severity::Error)
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Invalid {
            code: pattern.code.clone(),
            issues,
        })
    }
}

/// In-memory pattern store.
///
/// Patterns are held behind `Arc`s. Every edit swaps in a new `Arc`, so
/// snapshots returned by [`find_by_code`](PatternRepository::find_by_code)
/// keep the content they had when they were taken.
#[derive(Debug, Default)]
pub struct PatternCatalog {
    patterns: RwLock<BTreeMap<String, Arc<Pattern>>>,
}

impl PatternCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from existing patterns.
    ///
    /// Each pattern is checked as by [`create`](Self::create).
    pub fn from_patterns(patterns: impl IntoIterator<Item = Pattern>) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for pattern in patterns {
            catalog.create(pattern)?;
        }
        Ok(catalog)
    }

    /// Add a new pattern.
    pub fn create(&self, pattern: Pattern) -> Result<Arc<Pattern>, CatalogError> {
        validate(&pattern)?;
        let mut patterns = self.patterns.write();
        if patterns.contains_key(&pattern.code) {
            return Err(CatalogError::DuplicateCode(pattern.code));
        }
        let pattern = Arc::new(pattern);
        patterns.insert(pattern.code.clone(), Arc::clone(&pattern));
        tracing::debug!(code = %pattern.code, lines = pattern.lines.len(), "pattern created");
        Ok(pattern)
    }

    /// Replace the pattern stored under `code`.
    ///
    /// Everything except the code may change.
    pub fn update(&self, code: &str, pattern: Pattern) -> Result<Arc<Pattern>, CatalogError> {
        if pattern.code != code {
            return Err(CatalogError::CodeChange {
                from: code.to_string(),
                to: pattern.code,
            });
        }
        validate(&pattern)?;
        let mut patterns = self.patterns.write();
        let slot = patterns
            .get_mut(code)
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))?;
        *slot = Arc::new(pattern);
        tracing::debug!(code, "pattern updated");
        Ok(Arc::clone(slot))
    }

    /// Mark a pattern active.
    pub fn activate(&self, code: &str) -> Result<(), CatalogError> {
        self.set_active(code, true)
    }

    /// Mark a pattern inactive. It stays retrievable by code.
    pub fn deactivate(&self, code: &str) -> Result<(), CatalogError> {
        self.set_active(code, false)
    }

    fn set_active(&self, code: &str, is_active: bool) -> Result<(), CatalogError> {
        let mut patterns = self.patterns.write();
        let slot = patterns
            .get_mut(code)
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))?;
        if slot.is_active != is_active {
            let mut pattern = (**slot).clone();
            pattern.is_active = is_active;
            *slot = Arc::new(pattern);
        }
        tracing::debug!(code, is_active, "pattern activation changed");
        Ok(())
    }

    /// Remove a pattern that no posted entry references.
    ///
    /// The reference count is read while the catalog is write-locked, so no
    /// new generation can look the pattern up between the check and the
    /// removal. A generation that took its snapshot earlier can still post
    /// afterwards; the poster has to reject such entries if it needs strict
    /// referential integrity. The poster must not call back into this catalog.
    pub fn delete(&self, code: &str, poster: &dyn JournalPoster) -> Result<(), CatalogError> {
        let mut patterns = self.patterns.write();
        if !patterns.contains_key(code) {
            return Err(CatalogError::NotFound(code.to_string()));
        }
        let count = poster.reference_count(code)?;
        if count > 0 {
            return Err(CatalogError::InUse {
                code: code.to_string(),
                count,
            });
        }
        patterns.remove(code);
        tracing::debug!(code, "pattern deleted");
        Ok(())
    }

    /// Get a snapshot of a pattern, active or not.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Arc<Pattern>> {
        self.patterns.read().get(code).cloned()
    }

    /// Snapshots of every pattern, ordered by code.
    #[must_use]
    pub fn list_all(&self) -> Vec<Arc<Pattern>> {
        self.patterns.read().values().cloned().collect()
    }

    /// Number of stored patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }
}

impl PatternRepository for PatternCatalog {
    fn find_by_code(&self, code: &str) -> Result<Option<Arc<Pattern>>, RepositoryError> {
        Ok(self.get(code))
    }

    fn list_active(&self) -> Result<Vec<PatternSummary>, RepositoryError> {
        Ok(self
            .patterns
            .read()
            .values()
            .filter(|p| p.is_active)
            .map(|p| p.summary())
            .collect())
    }
}

/// In-memory posting collaborator.
///
/// Assigns sequential identifiers starting at 1 and keeps every posted entry.
#[derive(Debug)]
pub struct InMemoryPoster {
    next_id: AtomicU64,
    entries: Mutex<Vec<(JournalEntryId, DraftJournalEntry)>>,
}

impl Default for InMemoryPoster {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl InMemoryPoster {
    /// Create an empty poster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All posted entries in posting order.
    #[must_use]
    pub fn entries(&self) -> Vec<(JournalEntryId, DraftJournalEntry)> {
        self.entries.lock().clone()
    }

    /// Look up a posted entry.
    #[must_use]
    pub fn get(&self, id: JournalEntryId) -> Option<DraftJournalEntry> {
        self.entries
            .lock()
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, entry)| entry.clone())
    }

    /// Number of posted entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing has been posted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl JournalPoster for InMemoryPoster {
    fn post(&self, entry: &DraftJournalEntry) -> Result<JournalEntryId, PostingError> {
        let mut entries = self.entries.lock();
        let id = JournalEntryId(self.next_id.fetch_add(1, Ordering::Relaxed));
        entries.push((id, entry.clone()));
        Ok(id)
    }

    fn reference_count(&self, pattern_code: &str) -> Result<usize, PostingError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|(_, entry)| entry.source_pattern == pattern_code)
            .count())
    }
}
