//! # Composite Evaluators
//!
//! Predicate bodies are anything implementing [`Evaluator`]; plain closures
//! `Fn(&R) -> Verdict` qualify through a blanket impl.
//!
//! Combinators over evaluators of the same record type:
//! - `Or`: best outcome under the general ordering
//! - `And`: worst outcome under the general ordering
//! - `Not`: PASS and FAIL exchanged
//! - `WarnIf`: a PASS becomes a WARN, anything weaker becomes a PASS

use crate::{Outcome, TrialMatchError, Verdict};
use std::collections::BTreeMap;

// =============================================================================
// EVALUATOR TRAIT
// =============================================================================

/// A single eligibility check over a record of type `R`.
pub trait Evaluator<R: ?Sized> {
    fn evaluate(&self, record: &R) -> Verdict;
}

impl<R: ?Sized, F> Evaluator<R> for F
where
    F: Fn(&R) -> Verdict,
{
    fn evaluate(&self, record: &R) -> Verdict {
        self(record)
    }
}

type BoxedEvaluator<R> = Box<dyn Evaluator<R>>;

fn evaluate_grouped<R: ?Sized>(
    functions: &[BoxedEvaluator<R>],
    record: &R,
) -> BTreeMap<Outcome, Vec<Verdict>> {
    let mut grouped: BTreeMap<Outcome, Vec<Verdict>> = BTreeMap::new();
    for function in functions {
        let verdict = function.evaluate(record);
        let group = grouped.entry(verdict.outcome()).or_default();
        if !group.contains(&verdict) {
            group.push(verdict);
        }
    }
    grouped
}

fn with_events<'a>(
    grouped: &'a BTreeMap<Outcome, Vec<Verdict>>,
    outcomes: &'a [Outcome],
) -> impl Iterator<Item = &'a Verdict> {
    outcomes
        .iter()
        .filter_map(|outcome| grouped.get(outcome))
        .flatten()
        .filter(|v| v.has_molecular_events())
}

fn require_functions<R: ?Sized>(
    functions: &[BoxedEvaluator<R>],
    name: &str,
) -> Result<(), TrialMatchError> {
    if functions.is_empty() {
        return Err(TrialMatchError::ConfigError(format!(
            "{} requires at least one function",
            name
        )));
    }
    Ok(())
}

// =============================================================================
// OR
// =============================================================================

pub struct Or<R: ?Sized> {
    functions: Vec<BoxedEvaluator<R>>,
}

impl<R: ?Sized> Or<R> {
    pub fn new(functions: Vec<BoxedEvaluator<R>>) -> Result<Self, TrialMatchError> {
        require_functions(&functions, "Or")?;
        Ok(Self { functions })
    }
}

impl<R: ?Sized> Evaluator<R> for Or<R> {
    fn evaluate(&self, record: &R) -> Verdict {
        let grouped = evaluate_grouped(&self.functions, record);
        let Some((&best, winners)) = grouped.iter().next_back() else {
            return Verdict::not_evaluated("No functions to combine");
        };

        let mut evaluations: Vec<&Verdict> = winners.iter().collect();
        evaluations.extend(with_events(
            &grouped,
            &[Outcome::Pass, Outcome::Warn, Outcome::Undetermined],
        ));

        let recoverable = evaluations.iter().any(|v| v.is_recoverable());
        if best == Outcome::Fail && recoverable {
            evaluations.retain(|v| v.is_recoverable());
        }

        evaluations
            .into_iter()
            .fold(Verdict::seed(best, recoverable), |acc, v| acc.merge_with(v))
    }
}

// =============================================================================
// AND
// =============================================================================

pub struct And<R: ?Sized> {
    functions: Vec<BoxedEvaluator<R>>,
}

impl<R: ?Sized> And<R> {
    pub fn new(functions: Vec<BoxedEvaluator<R>>) -> Result<Self, TrialMatchError> {
        require_functions(&functions, "And")?;
        Ok(Self { functions })
    }
}

impl<R: ?Sized> Evaluator<R> for And<R> {
    fn evaluate(&self, record: &R) -> Verdict {
        let grouped = evaluate_grouped(&self.functions, record);
        let Some((&worst, losers)) = grouped.iter().next() else {
            return Verdict::not_evaluated("No functions to combine");
        };

        let (recoverable_set, unrecoverable_set): (Vec<&Verdict>, Vec<&Verdict>) =
            losers.iter().partition(|v| v.is_recoverable());
        let recoverable = unrecoverable_set.is_empty();
        let evaluations = if recoverable {
            recoverable_set
        } else {
            unrecoverable_set
        };

        let folded = evaluations
            .into_iter()
            .fold(Verdict::seed(worst, recoverable), |acc, v| acc.merge_with(v));

        with_events(&grouped, &[Outcome::Pass, Outcome::Warn])
            .fold(folded, |acc, v| acc.with_events_of(v))
    }
}

// =============================================================================
// NOT
// =============================================================================

pub struct Not<E> {
    function: E,
}

impl<E> Not<E> {
    pub const fn new(function: E) -> Self {
        Self { function }
    }
}

fn negate(verdict: &Verdict, outcome: Outcome) -> Verdict {
    let mut messages = verdict.tier_map();
    let pass = messages.remove(&crate::MessageTier::Pass);
    let fail = messages.remove(&crate::MessageTier::Fail);
    if let Some(fail) = fail {
        messages.insert(crate::MessageTier::Pass, fail);
    }
    if let Some(pass) = pass {
        messages.insert(crate::MessageTier::Fail, pass);
    }

    Verdict::from_tier_map(outcome, verdict.is_recoverable(), messages)
        .with_inclusion_events(verdict.exclusion_events().iter().cloned())
        .with_exclusion_events(verdict.inclusion_events().iter().cloned())
        .with_missing_coverage(verdict.is_missing_coverage())
}

impl<R: ?Sized, E: Evaluator<R>> Evaluator<R> for Not<E> {
    fn evaluate(&self, record: &R) -> Verdict {
        let verdict = self.function.evaluate(record);
        match verdict.outcome() {
            Outcome::Pass => negate(&verdict, Outcome::Fail),
            Outcome::Fail => negate(&verdict, Outcome::Pass),
            Outcome::NotEvaluated => negate(&verdict, Outcome::NotEvaluated),
            Outcome::Warn | Outcome::Undetermined => verdict.with_swapped_events(),
        }
    }
}

// =============================================================================
// WARN IF
// =============================================================================

pub struct WarnIf<E> {
    function: E,
}

impl<E> WarnIf<E> {
    pub const fn new(function: E) -> Self {
        Self { function }
    }
}

impl<R: ?Sized, E: Evaluator<R>> Evaluator<R> for WarnIf<E> {
    fn evaluate(&self, record: &R) -> Verdict {
        let verdict = self.function.evaluate(record);
        match verdict.outcome() {
            Outcome::Pass => Verdict::from_messages(
                Outcome::Warn,
                verdict.messages(crate::MessageTier::Pass).iter().cloned(),
                verdict.is_recoverable(),
            ),
            Outcome::Warn => verdict.without_events(),
            Outcome::Undetermined | Outcome::Fail | Outcome::NotEvaluated => {
                Verdict::from_messages(
                    Outcome::Pass,
                    verdict.all_messages().into_iter().map(str::to_string),
                    verdict.is_recoverable(),
                )
                .with_missing_coverage(verdict.is_missing_coverage())
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
