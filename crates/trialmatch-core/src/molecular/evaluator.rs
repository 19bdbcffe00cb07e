//! # Molecular Verdict Aggregator
//!
//! Runs a predicate body once per trusted molecular test and folds the
//! per-test verdicts.
//!
//! ## Algorithm
//!
//! 1. Filter by quality and maximum age ([`MolecularTestFilter`]).
//! 2. No tests left → UNDETERMINED "No molecular results of sufficient quality".
//! 3. Any whole-genome test → only the most recent one is evaluated
//!    (undated counts as oldest). Otherwise every panel is evaluated.
//! 4. If a gene is configured and no selected test covers it as required,
//!    short-circuit to UNDETERMINED with the missing-coverage flag set. The
//!    body is never invoked.
//! 5. Body returns `None` for every test → UNDETERMINED "Insufficient molecular data".
//! 6. Fold by `PASS > WARN > FAIL > UNDETERMINED > NOT_EVALUATED`. Winners
//!    are ranked by experiment type (whole-genome, targeted panel, panel) and
//!    then newest first. A leading whole-genome or targeted-panel verdict is
//!    returned alone; otherwise every winner's messages and events are merged.
//!
//! The panel precedence ranks FAIL above UNDETERMINED, unlike the general
//! [`Outcome`] order.

use crate::composite::Evaluator;
use crate::molecular::{MolecularTest, MolecularTestFilter, TargetCoveragePredicate, TestTarget};
use crate::primitives::{INSUFFICIENT_MOLECULAR_DATA, NO_MOLECULAR_RESULTS};
use crate::{Outcome, Verdict};
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Fold precedence across panel verdicts, best first.
pub const PANEL_PRECEDENCE: [Outcome; 5] = [
    Outcome::Pass,
    Outcome::Warn,
    Outcome::Fail,
    Outcome::Undetermined,
    Outcome::NotEvaluated,
];

/// Records that carry molecular tests.
pub trait MolecularRecord {
    fn molecular_tests(&self) -> &[MolecularTest];
}

impl MolecularRecord for [MolecularTest] {
    fn molecular_tests(&self) -> &[MolecularTest] {
        self
    }
}

impl MolecularRecord for Vec<MolecularTest> {
    fn molecular_tests(&self) -> &[MolecularTest] {
        self
    }
}

/// Aggregating wrapper around a per-test predicate body.
pub struct MolecularEvaluator<F> {
    filter: MolecularTestFilter,
    gene: Option<String>,
    coverage: TargetCoveragePredicate,
    no_tests_verdict: Option<Verdict>,
    body: F,
}

impl<F> MolecularEvaluator<F>
where
    F: Fn(&MolecularTest) -> Option<Verdict>,
{
    #[must_use]
    pub fn new(body: F) -> Self {
        Self {
            filter: MolecularTestFilter::default(),
            gene: None,
            coverage: TargetCoveragePredicate::default(),
            no_tests_verdict: None,
            body,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, max_test_age: Option<NaiveDate>, use_insufficient_quality: bool) -> Self {
        self.filter = MolecularTestFilter::new(max_test_age, use_insufficient_quality);
        self
    }

    /// Require `gene` to be covered as `coverage` demands before running the body.
    #[must_use]
    pub fn for_gene(mut self, gene: impl Into<String>, coverage: TargetCoveragePredicate) -> Self {
        self.gene = Some(gene.into());
        self.coverage = coverage;
        self
    }

    /// Replace the fixed no-data verdicts with a predicate-specific one.
    #[must_use]
    pub fn with_no_tests_verdict(mut self, verdict: Verdict) -> Self {
        self.no_tests_verdict = Some(verdict);
        self
    }

    fn no_data(&self, message: &str) -> Verdict {
        self.no_tests_verdict.clone().unwrap_or_else(|| {
            Verdict::undetermined(message).with_missing_coverage(true)
        })
    }

    /// Aggregate over `tests`.
    pub fn evaluate_tests(&self, tests: &[MolecularTest]) -> Verdict {
        let recent = self.filter.apply(tests);
        if recent.is_empty() {
            tracing::debug!(total = tests.len(), "no molecular test survived filtering");
            return self.no_data(NO_MOLECULAR_RESULTS);
        }

        let selected = select_trusted(recent);
        tracing::trace!(selected = selected.len(), "molecular tests selected");

        if let Some(gene) = &self.gene {
            if !selected.iter().any(|t| t.tests_gene(gene, &self.coverage)) {
                tracing::debug!(gene = %gene, "target coverage insufficient, skipping body");
                return self.coverage_shortfall(gene, &selected);
            }
        }

        let evaluations: Vec<(&MolecularTest, Verdict)> = selected
            .into_iter()
            .filter_map(|test| (self.body)(test).map(|verdict| (test, verdict)))
            .collect();

        fold_by_panel_precedence(evaluations)
            .unwrap_or_else(|| self.no_data(INSUFFICIENT_MOLECULAR_DATA))
    }

    fn coverage_shortfall(&self, gene: &str, selected: &[&MolecularTest]) -> Verdict {
        let mut missing: Vec<TestTarget> = Vec::new();
        for test in selected {
            for target in self.coverage.missing(&test.covered_targets(gene)) {
                if !missing.contains(&target) {
                    missing.push(target);
                }
            }
        }
        let order = self.coverage.required();
        missing.sort_by_key(|t| order.iter().position(|r| r == t));

        let genes = BTreeSet::from([gene.to_string()]);
        Verdict::undetermined(self.coverage.message(&genes, &missing)).with_missing_coverage(true)
    }
}

/// Latest whole-genome test if any exists, otherwise every panel.
fn select_trusted(tests: Vec<&MolecularTest>) -> Vec<&MolecularTest> {
    let latest_whole_genome = tests
        .iter()
        .filter(|t| t.experiment.is_whole_genome())
        .max_by_key(|t| t.date)
        .copied();

    match latest_whole_genome {
        Some(test) => vec![test],
        None => tests,
    }
}

/// Fold per-test verdicts; `None` when there is nothing to fold.
fn fold_by_panel_precedence(evaluations: Vec<(&MolecularTest, Verdict)>) -> Option<Verdict> {
    let outcome = PANEL_PRECEDENCE
        .into_iter()
        .find(|o| evaluations.iter().any(|(_, v)| v.outcome() == *o))?;

    let mut winners: Vec<(&MolecularTest, Verdict)> = evaluations
        .into_iter()
        .filter(|(_, v)| v.outcome() == outcome)
        .collect();
    winners.sort_by_key(|(test, _)| (test.experiment, Reverse(test.date)));

    if winners.first().is_some_and(|(test, _)| test.experiment.is_comprehensive()) {
        return winners.into_iter().next().map(|(_, v)| v);
    }

    let mut verdicts = winners.into_iter().map(|(_, v)| v);
    let first = verdicts.next()?;
    Some(verdicts.fold(first, |acc, v| acc.merge_with(&v)))
}

impl<R, F> Evaluator<R> for MolecularEvaluator<F>
where
    R: MolecularRecord + ?Sized,
    F: Fn(&MolecularTest) -> Option<Verdict>,
{
    fn evaluate(&self, record: &R) -> Verdict {
        self.evaluate_tests(record.molecular_tests())
    }
}

// =============================================================================
// TESTS
// =============================================================================
