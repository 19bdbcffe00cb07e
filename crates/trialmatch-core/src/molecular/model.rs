//! Molecular test records and their declared target coverage.

use crate::molecular::TargetCoveragePredicate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Analysis kind a test may perform on a gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestTarget {
    Mutation,
    Amplification,
    Deletion,
    Fusion,
}

impl TestTarget {
    pub const ALL: [TestTarget; 4] = [
        TestTarget::Mutation,
        TestTarget::Amplification,
        TestTarget::Deletion,
        TestTarget::Fusion,
    ];

    /// Lower-case plural used in coverage messages.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            TestTarget::Mutation => "mutations",
            TestTarget::Amplification => "amplifications",
            TestTarget::Deletion => "deletions",
            TestTarget::Fusion => "fusions",
        }
    }
}

impl fmt::Display for TestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestTarget::Mutation => "MUTATION",
            TestTarget::Amplification => "AMPLIFICATION",
            TestTarget::Deletion => "DELETION",
            TestTarget::Fusion => "FUSION",
        };
        f.write_str(name)
    }
}

/// Breadth class of a molecular test, broadest first.
///
/// The derived order is the preference order when per-test verdicts are
/// combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperimentType {
    WholeGenome,
    TargetedPanel,
    Panel,
}

impl ExperimentType {
    #[must_use]
    pub const fn is_whole_genome(self) -> bool {
        matches!(self, ExperimentType::WholeGenome)
    }

    /// Whole-genome or targeted panel. A verdict from either stands alone
    /// rather than being merged with the others in its tier.
    #[must_use]
    pub const fn is_comprehensive(self) -> bool {
        matches!(self, ExperimentType::WholeGenome | ExperimentType::TargetedPanel)
    }
}

/// Per-gene analysis kinds declared by a panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSpecification {
    genes: BTreeMap<String, BTreeSet<TestTarget>>,
}

impl TargetSpecification {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_gene<I>(mut self, gene: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = TestTarget>,
    {
        self.genes
            .entry(gene.into())
            .or_default()
            .extend(targets);
        self
    }

    /// Targets declared for `gene`; empty if the gene is not on the panel.
    #[must_use]
    pub fn targets_for(&self, gene: &str) -> BTreeSet<TestTarget> {
        self.genes.get(gene).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn tests_gene(&self, gene: &str, predicate: &TargetCoveragePredicate) -> bool {
        self.genes
            .get(gene)
            .is_some_and(|targets| predicate.is_satisfied(targets))
    }
}

/// One molecular test performed on the patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MolecularTest {
    pub date: Option<NaiveDate>,
    pub experiment: ExperimentType,
    #[serde(default = "default_quality")]
    pub has_sufficient_quality: bool,
    #[serde(default)]
    pub target_specification: Option<TargetSpecification>,
}

const fn default_quality() -> bool {
    true
}

impl MolecularTest {
    /// A whole-genome test, which covers every gene and target.
    #[must_use]
    pub const fn whole_genome(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            experiment: ExperimentType::WholeGenome,
            has_sufficient_quality: true,
            target_specification: None,
        }
    }

    /// A panel test restricted to `specification`.
    #[must_use]
    pub const fn panel(date: Option<NaiveDate>, specification: TargetSpecification) -> Self {
        Self {
            date,
            experiment: ExperimentType::Panel,
            has_sufficient_quality: true,
            target_specification: Some(specification),
        }
    }

    /// A broad targeted panel restricted to `specification`.
    #[must_use]
    pub const fn targeted_panel(date: Option<NaiveDate>, specification: TargetSpecification) -> Self {
        Self {
            date,
            experiment: ExperimentType::TargetedPanel,
            has_sufficient_quality: true,
            target_specification: Some(specification),
        }
    }

    #[must_use]
    pub const fn with_quality(mut self, sufficient: bool) -> Self {
        self.has_sufficient_quality = sufficient;
        self
    }

    /// Targets this test covers for `gene`.
    ///
    /// Whole-genome covers everything. A panel without a specification covers nothing.
    #[must_use]
    pub fn covered_targets(&self, gene: &str) -> BTreeSet<TestTarget> {
        if self.experiment.is_whole_genome() {
            return TestTarget::ALL.into_iter().collect();
        }
        self.target_specification
            .as_ref()
            .map(|spec| spec.targets_for(gene))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn tests_gene(&self, gene: &str, predicate: &TargetCoveragePredicate) -> bool {
        if self.experiment.is_whole_genome() {
            return true;
        }
        self.target_specification
            .as_ref()
            .is_some_and(|spec| spec.tests_gene(gene, predicate))
    }
}
