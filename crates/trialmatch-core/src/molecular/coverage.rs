//! # Target-Coverage Predicate
//!
//! Decides whether a test's declared targets for a gene support a claim.
//! An unsatisfied predicate turns an absent signal into UNDETERMINED rather
//! than FAIL, since the test never looked.
//!
//! | Mode | Satisfied when | Message join |
//! |------|----------------|--------------|
//! | `all` | every target kind covered | and |
//! | `any` | some target kind covered | or |
//! | `and(k..)` | every listed kind covered | and |
//! | `or(k..)` | some listed kind covered | or |
//! | `at_least(k)` / `specific(k)` | `k` covered | single kind |

use crate::format;
use crate::molecular::TestTarget;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CoverageMode {
    All,
    Any,
    And(Vec<TestTarget>),
    Or(Vec<TestTarget>),
    AtLeast(TestTarget),
    Specific(TestTarget),
}

/// Coverage requirement plus the prefix used in its undetermined message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCoveragePredicate {
    mode: CoverageMode,
    message_prefix: Option<String>,
}

fn dedup(targets: &[TestTarget]) -> Vec<TestTarget> {
    let mut unique = Vec::with_capacity(targets.len());
    for target in targets {
        if !unique.contains(target) {
            unique.push(*target);
        }
    }
    unique
}

fn prefix(message_prefix: impl Into<String>) -> Option<String> {
    let prefix = message_prefix.into();
    (!prefix.is_empty()).then_some(prefix)
}

/// `"a"`, `"a or b"`, `"a, b or c"`; argument order is kept.
fn join_with_conjunction(targets: &[TestTarget], conjunction: &str) -> String {
    let plurals: Vec<&str> = targets.iter().map(|t| t.plural()).collect();
    match plurals.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} {} {}", rest.join(", "), conjunction, last),
    }
}

impl TargetCoveragePredicate {
    /// Every target kind must be covered.
    #[must_use]
    pub fn all(message_prefix: impl Into<String>) -> Self {
        Self {
            mode: CoverageMode::All,
            message_prefix: prefix(message_prefix),
        }
    }

    /// At least one target kind must be covered.
    #[must_use]
    pub fn any(message_prefix: Option<String>) -> Self {
        Self {
            mode: CoverageMode::Any,
            message_prefix,
        }
    }

    #[must_use]
    pub fn and(targets: &[TestTarget], message_prefix: impl Into<String>) -> Self {
        Self {
            mode: CoverageMode::And(dedup(targets)),
            message_prefix: prefix(message_prefix),
        }
    }

    #[must_use]
    pub fn or(targets: &[TestTarget], message_prefix: Option<String>) -> Self {
        Self {
            mode: CoverageMode::Or(dedup(targets)),
            message_prefix,
        }
    }

    #[must_use]
    pub fn at_least(target: TestTarget, message_prefix: impl Into<String>) -> Self {
        Self {
            mode: CoverageMode::AtLeast(target),
            message_prefix: prefix(message_prefix),
        }
    }

    /// Same requirement as [`Self::at_least`]; the message names the kind only.
    #[must_use]
    pub fn specific(target: TestTarget, message_prefix: impl Into<String>) -> Self {
        Self {
            mode: CoverageMode::Specific(target),
            message_prefix: prefix(message_prefix),
        }
    }

    /// Required kinds in declaration order.
    #[must_use]
    pub fn required(&self) -> Vec<TestTarget> {
        match &self.mode {
            CoverageMode::All | CoverageMode::Any => TestTarget::ALL.to_vec(),
            CoverageMode::And(targets) | CoverageMode::Or(targets) => targets.clone(),
            CoverageMode::AtLeast(target) | CoverageMode::Specific(target) => vec![*target],
        }
    }

    const fn is_conjunctive(&self) -> bool {
        matches!(self.mode, CoverageMode::All | CoverageMode::And(_))
    }

    #[must_use]
    pub fn is_satisfied(&self, covered: &BTreeSet<TestTarget>) -> bool {
        let required = self.required();
        if self.is_conjunctive() {
            required.iter().all(|t| covered.contains(t))
        } else {
            required.iter().any(|t| covered.contains(t))
        }
    }

    /// Required kinds absent from `covered`, in declaration order.
    ///
    /// A disjunctive requirement is unmet only when every listed kind is
    /// absent, so all of them are reported.
    #[must_use]
    pub fn missing(&self, covered: &BTreeSet<TestTarget>) -> Vec<TestTarget> {
        if self.is_satisfied(covered) {
            return Vec::new();
        }
        self.required()
            .into_iter()
            .filter(|t| !covered.contains(t))
            .collect()
    }

    /// Describe `missing` kinds in this predicate's grammar.
    #[must_use]
    pub fn describe(&self, missing: &[TestTarget]) -> String {
        match &self.mode {
            CoverageMode::AtLeast(target) => format!("at least {}", target.plural()),
            CoverageMode::Specific(target) => target.plural().to_string(),
            CoverageMode::All | CoverageMode::And(_) => join_with_conjunction(missing, "and"),
            CoverageMode::Any | CoverageMode::Or(_) => join_with_conjunction(missing, "or"),
        }
    }

    /// `"<prefix> gene(s) <genes> undetermined (not tested for <kinds>)"`
    #[must_use]
    pub fn message(&self, genes: &BTreeSet<String>, missing: &[TestTarget]) -> String {
        let prefix = self
            .message_prefix
            .as_ref()
            .map(|p| format!("{} ", p))
            .unwrap_or_default();
        let noun = if genes.len() > 1 { "genes" } else { "gene" };
        format!(
            "{}{} {} undetermined (not tested for {})",
            prefix,
            noun,
            format::concat(genes),
            self.describe(missing)
        )
    }
}

impl Default for TargetCoveragePredicate {
    fn default() -> Self {
        Self::any(None)
    }
}
