//! # Derived Stage Evaluation
//!
//! When a record has no explicit stage but carries derived candidate
//! stages, the wrapped predicate runs once per candidate on a copy of the
//! record whose stage is set to that candidate.
//!
//! | Candidates | Result |
//! |------------|--------|
//! | explicit stage, none, or empty | inner predicate on the record |
//! | one | that candidate's verdict, re-wrapped |
//! | several, same outcome | worst verdict's messages under that outcome |
//! | several, mixed outcomes | UNDETERMINED "Undetermined if patient has ..." |

use crate::composite::Evaluator;
use crate::stage::TumorStage;
use crate::{Outcome, Verdict};
use std::collections::BTreeSet;

/// Records whose tumor stage can be read and substituted.
pub trait StagedRecord: Sized {
    fn tumor_stage(&self) -> Option<TumorStage>;

    fn derived_stages(&self) -> Option<&BTreeSet<TumorStage>>;

    /// A copy of the record with `stage` as its explicit stage.
    fn with_tumor_stage(&self, stage: TumorStage) -> Self;
}

/// Wraps a stage-reading predicate so it also judges derived stages.
pub struct DerivedStageEvaluator<E> {
    inner: E,
    message_end: String,
}

impl<E> DerivedStageEvaluator<E> {
    /// `message_end` completes "Undetermined if patient has ..." when the
    /// candidate stages disagree.
    #[must_use]
    pub fn new(inner: E, message_end: impl Into<String>) -> Self {
        Self {
            inner,
            message_end: message_end.into(),
        }
    }
}

/// Single-tier verdict under `outcome` carrying the messages of the worst
/// verdict in `verdicts` (first one on ties).
#[must_use]
pub fn fold_to_worst(verdicts: &[Verdict], outcome: Outcome) -> Verdict {
    let messages: Vec<String> = verdicts
        .iter()
        .min_by_key(|v| v.outcome())
        .map(|worst| worst.all_messages().into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    Verdict::from_messages(outcome, messages, false)
}

impl<R, E> Evaluator<R> for DerivedStageEvaluator<E>
where
    R: StagedRecord,
    E: Evaluator<R>,
{
    fn evaluate(&self, record: &R) -> Verdict {
        if record.tumor_stage().is_some() {
            return self.inner.evaluate(record);
        }
        let candidates = match record.derived_stages() {
            Some(stages) if !stages.is_empty() => stages,
            _ => return self.inner.evaluate(record),
        };

        let verdicts: Vec<Verdict> = candidates
            .iter()
            .map(|stage| self.inner.evaluate(&record.with_tumor_stage(*stage)))
            .collect();
        let outcomes: BTreeSet<Outcome> = verdicts.iter().map(Verdict::outcome).collect();
        tracing::debug!(
            candidates = candidates.len(),
            distinct_outcomes = outcomes.len(),
            "evaluated derived stages"
        );

        match (verdicts.as_slice(), outcomes.first()) {
            ([single], Some(&outcome)) if outcome != Outcome::NotEvaluated => {
                fold_to_worst(std::slice::from_ref(single), outcome)
            }
            ([single], _) => single.clone(),
            (_, Some(&outcome)) if outcomes.len() == 1 => fold_to_worst(&verdicts, outcome),
            _ => Verdict::undetermined(format!("Undetermined if patient has {}", self.message_end)),
        }
    }
}
