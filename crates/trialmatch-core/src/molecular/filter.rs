//! Recency and quality filtering of molecular tests.

use crate::molecular::MolecularTest;
use chrono::NaiveDate;

/// Keeps tests dated on or after `max_test_age`; undated tests always pass.
/// Insufficient-quality tests are dropped unless explicitly allowed.
///
/// The cutoff is strict: the most recent test is dropped too when it is older
/// than `max_test_age`, leaving the caller with the no-results verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MolecularTestFilter {
    max_test_age: Option<NaiveDate>,
    use_insufficient_quality: bool,
}

impl MolecularTestFilter {
    #[must_use]
    pub const fn new(max_test_age: Option<NaiveDate>, use_insufficient_quality: bool) -> Self {
        Self {
            max_test_age,
            use_insufficient_quality,
        }
    }

    #[must_use]
    pub const fn max_test_age(&self) -> Option<NaiveDate> {
        self.max_test_age
    }

    pub fn apply<'a>(&self, tests: &'a [MolecularTest]) -> Vec<&'a MolecularTest> {
        tests
            .iter()
            .filter(|t| self.use_insufficient_quality || t.has_sufficient_quality)
            .filter(|t| match (self.max_test_age, t.date) {
                (Some(cutoff), Some(date)) => date >= cutoff,
                _ => true,
            })
            .collect()
    }
}
