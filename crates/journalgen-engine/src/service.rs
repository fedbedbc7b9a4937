//! Generation service.

use journalgen_core::{DraftJournalEntry, GenerationRequest, JournalEntryId, Pattern, PatternSummary};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{info, info_span, warn};

use crate::binder;
use crate::catalog::{JournalPoster, PatternRepository};
use crate::error::GenerateError;
use crate::generate_entry;
use crate::options::GeneratorOptions;

/// Generates journal entries from stored patterns and hands them to a poster.
#[derive(Debug)]
pub struct JournalGenerator<R, P> {
    repository: R,
    poster: P,
    options: GeneratorOptions,
}

impl<R: PatternRepository, P: JournalPoster> JournalGenerator<R, P> {
    /// Create a generator with default options.
    pub fn new(repository: R, poster: P) -> Self {
        Self::with_options(repository, poster, GeneratorOptions::default())
    }

    /// Create a generator with explicit options.
    pub const fn with_options(repository: R, poster: P, options: GeneratorOptions) -> Self {
        Self {
            repository,
            poster,
            options,
        }
    }

    /// The options in effect.
    pub const fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// The pattern repository.
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// The posting collaborator.
    pub const fn poster(&self) -> &P {
        &self.poster
    }

    /// Patterns available for a pick-list.
    pub fn active_patterns(&self) -> Result<Vec<PatternSummary>, GenerateError> {
        Ok(self.repository.list_active()?)
    }

    /// Variables a caller must supply for `pattern_code`, in input order.
    pub fn required_variables(&self, pattern_code: &str) -> Result<Vec<String>, GenerateError> {
        let pattern = self.lookup(pattern_code)?;
        binder::derive_variables(&pattern).map_err(GenerateError::LineEvaluation)
    }

    /// Generate a draft entry without posting it.
    pub fn preview(&self, request: &GenerationRequest) -> Result<DraftJournalEntry, GenerateError> {
        let span = info_span!("generate", pattern = %request.pattern_code);
        let _enter = span.enter();

        let pattern = self.lookup(&request.pattern_code)?;
        let result = generate_entry(&pattern, request, &self.options);
        if let Err(GenerateError::Unbalanced(e)) = &result {
            warn!(difference = %e.difference, "pattern produced an unbalanced entry");
        }
        result
    }

    /// Generate an entry and post it.
    ///
    /// Nothing is posted unless generation succeeds. Posting failures are
    /// returned unchanged.
    pub fn generate(&self, request: &GenerationRequest) -> Result<JournalEntryId, GenerateError> {
        let entry = self.preview(request)?;
        let id = self.poster.post(&entry)?;
        info!(
            pattern = %entry.source_pattern,
            entry = %id,
            lines = entry.lines.len(),
            total = ?entry.total_debit(),
            "journal entry generated"
        );
        Ok(id)
    }

    /// Generate and post many entries in parallel.
    ///
    /// Results are in request order. Each request succeeds or fails on its
    /// own.
    pub fn generate_batch(
        &self,
        requests: &[GenerationRequest],
    ) -> Vec<Result<JournalEntryId, GenerateError>> {
        requests.par_iter().map(|r| self.generate(r)).collect()
    }

    fn lookup(&self, code: &str) -> Result<Arc<Pattern>, GenerateError> {
        let pattern = self
            .repository
            .find_by_code(code)?
            .ok_or_else(|| GenerateError::PatternNotFound {
                code: code.to_string(),
            })?;
        if self.options.require_active && !pattern.is_active {
            return Err(GenerateError::PatternInactive {
                code: code.to_string(),
            });
        }
        Ok(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryPoster, PatternCatalog, PostingError, RepositoryError};
    use crate::error::ErrorCategory;
    use journalgen_core::{NaiveDate, PatternLine};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    fn catalog() -> PatternCatalog {
        PatternCatalog::from_patterns([Pattern::new("P001", "Cash sale")
            .with_line(PatternLine::debit(1, "1100", "amount"))
            .with_line(PatternLine::credit(2, "4100", "amount"))])
        .unwrap()
    }

    struct FailingRepository;

    impl PatternRepository for FailingRepository {
        fn find_by_code(&self, _code: &str) -> Result<Option<Arc<Pattern>>, RepositoryError> {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        }

        fn list_active(&self) -> Result<Vec<PatternSummary>, RepositoryError> {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        }
    }

    struct RejectingPoster;

    impl JournalPoster for RejectingPoster {
        fn post(&self, _entry: &DraftJournalEntry) -> Result<JournalEntryId, PostingError> {
            Err(PostingError::Rejected("period closed".to_string()))
        }

        fn reference_count(&self, _pattern_code: &str) -> Result<usize, PostingError> {
            Ok(0)
        }
    }

    #[test]
    fn test_generate_posts() {
        let generator = JournalGenerator::new(catalog(), InMemoryPoster::new());
        let request = GenerationRequest::new("P001", date()).with_value("amount", "50");

        let id = generator.generate(&request).unwrap();
        assert_eq!(id, JournalEntryId(1));
        assert_eq!(generator.poster().len(), 1);
    }

    #[test]
    fn test_preview_does_not_post() {
        let generator = JournalGenerator::new(catalog(), InMemoryPoster::new());
        let request = GenerationRequest::new("P001", date()).with_value("amount", "50");

        generator.preview(&request).unwrap();
        assert!(generator.poster().is_empty());
    }

    #[test]
    fn test_failed_generation_posts_nothing() {
        let generator = JournalGenerator::new(catalog(), InMemoryPoster::new());
        let request = GenerationRequest::new("P001", date()).with_value("amount", "-5");

        assert!(generator.generate(&request).is_err());
        assert!(generator.poster().is_empty());
    }

    #[test]
    fn test_unknown_pattern() {
        let generator = JournalGenerator::new(catalog(), InMemoryPoster::new());
        let err = generator.required_variables("P404").unwrap_err();
        assert!(matches!(err, GenerateError::PatternNotFound { code } if code == "P404"));
    }

    #[test]
    fn test_require_active() {
        let catalog = catalog();
        catalog.deactivate("P001").unwrap();
        let request = GenerationRequest::new("P001", date()).with_value("amount", "50");

        let lenient = JournalGenerator::new(&catalog, InMemoryPoster::new());
        assert!(lenient.preview(&request).is_ok());

        let strict = JournalGenerator::with_options(
            &catalog,
            InMemoryPoster::new(),
            GeneratorOptions::default().with_require_active(true),
        );
        assert!(matches!(
            strict.preview(&request),
            Err(GenerateError::PatternInactive { .. })
        ));
    }

    #[test]
    fn test_collaborator_errors_propagate() {
        let generator = JournalGenerator::new(FailingRepository, InMemoryPoster::new());
        let err = generator.active_patterns().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Collaborator);

        let generator = JournalGenerator::new(catalog(), RejectingPoster);
        let request = GenerationRequest::new("P001", date()).with_value("amount", "50");
        let err = generator.generate(&request).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Posting(PostingError::Rejected(ref reason)) if reason == "period closed"
        ));
    }
}
