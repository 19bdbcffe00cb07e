//! # Verdicts
//!
//! The graded result every eligibility predicate returns.
//!
//! ## Outcome ordering
//!
//! `Outcome` derives `Ord` in declaration order, which is the general severity
//! order used by composite folds and the stage-derivation fold:
//!
//! ```text
//! NotEvaluated < Fail < Undetermined < Warn < Pass
//! ```
//!
//! The molecular panel fold uses its own precedence (see `molecular`).
//!
//! ## Messages
//!
//! A verdict built by one of the factories carries [`Findings::Single`]: its
//! messages belong to its own tier. Folding produces [`Findings::Folded`],
//! where messages are keyed by tier and may span several tiers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

static NO_MESSAGES: BTreeSet<String> = BTreeSet::new();

// =============================================================================
// OUTCOME
// =============================================================================

/// Five-tier outcome of an eligibility check. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    NotEvaluated,
    Fail,
    Undetermined,
    Warn,
    Pass,
}

impl Outcome {
    /// All outcomes in ascending general order.
    pub const ALL: [Outcome; 5] = [
        Outcome::NotEvaluated,
        Outcome::Fail,
        Outcome::Undetermined,
        Outcome::Warn,
        Outcome::Pass,
    ];

    /// The message tier a freshly built verdict of this outcome writes to.
    ///
    /// `NotEvaluated` has no tier of its own and records under pass.
    #[must_use]
    pub const fn message_tier(self) -> MessageTier {
        match self {
            Outcome::Pass | Outcome::NotEvaluated => MessageTier::Pass,
            Outcome::Warn => MessageTier::Warn,
            Outcome::Undetermined => MessageTier::Undetermined,
            Outcome::Fail => MessageTier::Fail,
        }
    }

    /// Upper-case label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Outcome::NotEvaluated => "NOT_EVALUATED",
            Outcome::Fail => "FAIL",
            Outcome::Undetermined => "UNDETERMINED",
            Outcome::Warn => "WARN",
            Outcome::Pass => "PASS",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four message-bearing tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MessageTier {
    Pass,
    Warn,
    Undetermined,
    Fail,
}

impl MessageTier {
    pub const ALL: [MessageTier; 4] = [
        MessageTier::Pass,
        MessageTier::Warn,
        MessageTier::Undetermined,
        MessageTier::Fail,
    ];
}

// =============================================================================
// FINDINGS
// =============================================================================

/// Explanation strings carried by a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Findings {
    /// Messages of the verdict's own tier.
    Single(BTreeSet<String>),
    /// Messages keyed by tier, produced by folding. Empty sets are never stored.
    Folded(BTreeMap<MessageTier, BTreeSet<String>>),
}

impl Findings {
    fn to_tier_map(&self, outcome: Outcome) -> BTreeMap<MessageTier, BTreeSet<String>> {
        match self {
            Findings::Single(messages) if messages.is_empty() => BTreeMap::new(),
            Findings::Single(messages) => {
                BTreeMap::from([(outcome.message_tier(), messages.clone())])
            }
            Findings::Folded(map) => map.clone(),
        }
    }
}

// =============================================================================
// VERDICT
// =============================================================================

/// Immutable graded result of one eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    outcome: Outcome,
    recoverable: bool,
    findings: Findings,
    inclusion_events: BTreeSet<String>,
    exclusion_events: BTreeSet<String>,
    missing_coverage: bool,
}

impl Verdict {
    fn fresh(outcome: Outcome, message: impl Into<String>, recoverable: bool) -> Self {
        Self::from_messages(outcome, [message.into()], recoverable)
    }

    /// The patient meets the criterion.
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self::fresh(Outcome::Pass, message, false)
    }

    /// The criterion is met, with a caveat for the reviewer.
    #[must_use]
    pub fn warn(message: impl Into<String>) -> Self {
        Self::fresh(Outcome::Warn, message, false)
    }

    /// The available data cannot settle the criterion.
    #[must_use]
    pub fn undetermined(message: impl Into<String>) -> Self {
        Self::fresh(Outcome::Undetermined, message, false)
    }

    /// An UNDETERMINED that more data could resolve.
    #[must_use]
    pub fn recoverable_undetermined(message: impl Into<String>) -> Self {
        Self::fresh(Outcome::Undetermined, message, true)
    }

    /// The patient does not meet the criterion.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::fresh(Outcome::Fail, message, false)
    }

    /// A FAIL caused by missing rather than contradictory data.
    #[must_use]
    pub fn recoverable_fail(message: impl Into<String>) -> Self {
        Self::fresh(Outcome::Fail, message, true)
    }

    /// The criterion was not assessed. Messages record under the pass tier.
    #[must_use]
    pub fn not_evaluated(message: impl Into<String>) -> Self {
        Self::fresh(Outcome::NotEvaluated, message, false)
    }

    /// Build a single-tier verdict carrying several messages of its own tier.
    #[must_use]
    pub fn from_messages(
        outcome: Outcome,
        messages: impl IntoIterator<Item = String>,
        recoverable: bool,
    ) -> Self {
        Self {
            outcome,
            recoverable,
            findings: Findings::Single(messages.into_iter().collect()),
            inclusion_events: BTreeSet::new(),
            exclusion_events: BTreeSet::new(),
            missing_coverage: false,
        }
    }

    /// A folded verdict with no messages yet; the seed of a fold.
    #[must_use]
    pub fn seed(outcome: Outcome, recoverable: bool) -> Self {
        Self::from_tier_map(outcome, recoverable, BTreeMap::new())
    }

    pub(crate) fn from_tier_map(
        outcome: Outcome,
        recoverable: bool,
        mut messages: BTreeMap<MessageTier, BTreeSet<String>>,
    ) -> Self {
        messages.retain(|_, set| !set.is_empty());
        Self {
            outcome,
            recoverable,
            findings: Findings::Folded(messages),
            inclusion_events: BTreeSet::new(),
            exclusion_events: BTreeSet::new(),
            missing_coverage: false,
        }
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn with_inclusion_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inclusion_events = events.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_exclusion_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_events = events.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the verdict as caused by insufficient test coverage.
    #[must_use]
    pub const fn with_missing_coverage(mut self, missing: bool) -> Self {
        self.missing_coverage = missing;
        self
    }

    #[must_use]
    pub const fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    #[must_use]
    pub const fn findings(&self) -> &Findings {
        &self.findings
    }

    /// True when this verdict came from a fold.
    #[must_use]
    pub const fn is_folded(&self) -> bool {
        matches!(self.findings, Findings::Folded(_))
    }

    /// Messages recorded under `tier`.
    #[must_use]
    pub fn messages(&self, tier: MessageTier) -> &BTreeSet<String> {
        match &self.findings {
            Findings::Single(messages) if tier == self.outcome.message_tier() => messages,
            Findings::Single(_) => &NO_MESSAGES,
            Findings::Folded(map) => map.get(&tier).unwrap_or(&NO_MESSAGES),
        }
    }

    /// Every message, pass tier first.
    #[must_use]
    pub fn all_messages(&self) -> Vec<&str> {
        MessageTier::ALL
            .iter()
            .flat_map(|tier| self.messages(*tier).iter().map(String::as_str))
            .collect()
    }

    #[must_use]
    pub const fn inclusion_events(&self) -> &BTreeSet<String> {
        &self.inclusion_events
    }

    #[must_use]
    pub const fn exclusion_events(&self) -> &BTreeSet<String> {
        &self.exclusion_events
    }

    /// True if any inclusion or exclusion event is attached.
    #[must_use]
    pub fn has_molecular_events(&self) -> bool {
        !self.inclusion_events.is_empty() || !self.exclusion_events.is_empty()
    }

    #[must_use]
    pub const fn is_missing_coverage(&self) -> bool {
        self.missing_coverage
    }

    pub(crate) fn tier_map(&self) -> BTreeMap<MessageTier, BTreeSet<String>> {
        self.findings.to_tier_map(self.outcome)
    }

    // -------------------------------------------------------------------------
    // Folding
    // -------------------------------------------------------------------------

    /// Union messages and events of `other` into a copy of `self`.
    ///
    /// Outcome and recoverability stay those of `self`. The missing-coverage
    /// flag is cleared on PASS and otherwise ORed.
    #[must_use]
    pub fn merge_with(&self, other: &Verdict) -> Verdict {
        let mut messages = self.tier_map();
        for (tier, set) in other.tier_map() {
            messages.entry(tier).or_default().extend(set);
        }

        let mut merged = Self::from_tier_map(self.outcome, self.recoverable, messages);
        merged.inclusion_events = self
            .inclusion_events
            .union(&other.inclusion_events)
            .cloned()
            .collect();
        merged.exclusion_events = self
            .exclusion_events
            .union(&other.exclusion_events)
            .cloned()
            .collect();
        merged.missing_coverage = if self.outcome == Outcome::Pass {
            false
        } else {
            self.missing_coverage || other.missing_coverage
        };
        merged
    }

    /// Same verdict with the events of `other` added; messages untouched.
    #[must_use]
    pub fn with_events_of(mut self, other: &Verdict) -> Verdict {
        self.inclusion_events
            .extend(other.inclusion_events.iter().cloned());
        self.exclusion_events
            .extend(other.exclusion_events.iter().cloned());
        self
    }

    /// Same verdict with inclusion and exclusion events exchanged.
    #[must_use]
    pub fn with_swapped_events(mut self) -> Verdict {
        std::mem::swap(&mut self.inclusion_events, &mut self.exclusion_events);
        self
    }

    /// Same verdict with events removed.
    #[must_use]
    pub fn without_events(mut self) -> Verdict {
        self.inclusion_events.clear();
        self.exclusion_events.clear();
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
