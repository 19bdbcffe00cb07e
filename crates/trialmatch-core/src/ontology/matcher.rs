//! # Ontology Matcher
//!
//! Pure match semantics over an [`OntologyGraph`] and a patient's code set.
//!
//! | Operation | Semantics |
//! |-----------|-----------|
//! | `is_of_type` | target is in the patient's ancestor closure |
//! | `is_exact_type` | target is one of the patient's own codes |
//! | `is_of_combination_type` | every required code is present exactly |
//! | `is_of_exclusive_type` | every patient code descends from the target |
//! | `evaluate_with_fail_and_warn_tiers` | FAIL before WARN before PASS |
//!
//! Absent patient code sets are the caller's concern: check
//! [`OntologyMatcher::has_configured_codes`] first. Operations that accept
//! `Option` treat absence as "no match".

use crate::format;
use crate::ontology::OntologyGraph;
use crate::primitives::UNKNOWN_TUMOR_TYPE;
use crate::record::TumorDetails;
use crate::{Code, Outcome, Verdict};
use std::collections::BTreeSet;

/// Borrowing view of a graph that answers match queries.
#[derive(Debug, Clone, Copy)]
pub struct OntologyMatcher<'g> {
    graph: &'g OntologyGraph,
}

impl<'g> OntologyMatcher<'g> {
    #[must_use]
    pub const fn new(graph: &'g OntologyGraph) -> Self {
        Self { graph }
    }

    #[must_use]
    pub const fn graph(&self) -> &'g OntologyGraph {
        self.graph
    }

    // =========================================================================
    // PRESENCE & CLOSURE
    // =========================================================================

    /// False for an absent or empty code set.
    #[must_use]
    pub fn has_configured_codes(codes: Option<&BTreeSet<Code>>) -> bool {
        codes.is_some_and(|c| !c.is_empty())
    }

    #[must_use]
    pub fn ancestor_closure(&self, codes: &BTreeSet<Code>) -> BTreeSet<Code> {
        self.graph.ancestor_closure(codes)
    }

    // =========================================================================
    // SUBTYPE MATCHING
    // =========================================================================

    #[must_use]
    pub fn is_of_type(&self, patient: &BTreeSet<Code>, target: &str) -> bool {
        self.ancestor_closure(patient).contains(target)
    }

    #[must_use]
    pub fn is_of_any_type(&self, patient: &BTreeSet<Code>, targets: &BTreeSet<Code>) -> bool {
        !self.ancestor_closure(patient).is_disjoint(targets)
    }

    /// Some ancestor's term contains one of `terms`, ignoring case.
    #[must_use]
    pub fn is_of_any_term<S: AsRef<str>>(&self, patient: &BTreeSet<Code>, terms: &[S]) -> bool {
        let queries: Vec<String> = terms.iter().map(|t| t.as_ref().to_lowercase()).collect();
        self.ancestor_closure(patient)
            .iter()
            .filter_map(|code| self.graph.term(code.as_str()))
            .any(|term| {
                let term = term.to_lowercase();
                queries.iter().any(|q| term.contains(q.as_str()))
            })
    }

    // =========================================================================
    // EXACT MATCHING
    // =========================================================================

    #[must_use]
    pub fn is_exact_type(patient: &BTreeSet<Code>, target: &str) -> bool {
        patient.contains(target)
    }

    #[must_use]
    pub fn is_of_combination_type(patient: &BTreeSet<Code>, required: &BTreeSet<Code>) -> bool {
        required.is_subset(patient)
    }

    /// Any one of `combinations` is fully present.
    #[must_use]
    pub fn has_any_combination(
        patient: Option<&BTreeSet<Code>>,
        combinations: &[BTreeSet<Code>],
    ) -> bool {
        patient.is_some_and(|codes| {
            combinations
                .iter()
                .any(|combo| Self::is_of_combination_type(codes, combo))
        })
    }

    // =========================================================================
    // EXCLUSIVE MATCHING
    // =========================================================================

    /// Every patient code has `target` among its own ancestors.
    #[must_use]
    pub fn is_of_exclusive_type(&self, patient: Option<&BTreeSet<Code>>, target: &str) -> bool {
        let wanted = BTreeSet::from([Code::from(target)]);
        self.evaluate_all_codes_match_with_fail_and_warns(
            patient,
            &wanted,
            &BTreeSet::new(),
            &BTreeSet::new(),
        ) == Outcome::Pass
    }

    /// Per-code classification.
    ///
    /// FAIL if absent or empty, if any code misses `match_codes`, or if any
    /// code hits `fail_codes`. WARN if any code hits `warn_codes`. Else PASS.
    #[must_use]
    pub fn evaluate_all_codes_match_with_fail_and_warns(
        &self,
        patient: Option<&BTreeSet<Code>>,
        match_codes: &BTreeSet<Code>,
        fail_codes: &BTreeSet<Code>,
        warn_codes: &BTreeSet<Code>,
    ) -> Outcome {
        let Some(codes) = patient.filter(|c| !c.is_empty()) else {
            return Outcome::Fail;
        };

        let mut all_match = true;
        let mut has_fail = false;
        let mut has_warn = false;
        for code in codes {
            let closure = self.graph.code_closure(code.as_str());
            all_match &= !closure.is_disjoint(match_codes);
            has_fail |= !closure.is_disjoint(fail_codes);
            has_warn |= !closure.is_disjoint(warn_codes);
        }

        if !all_match || has_fail {
            Outcome::Fail
        } else if has_warn {
            Outcome::Warn
        } else {
            Outcome::Pass
        }
    }

    // =========================================================================
    // TIERED MATCHING
    // =========================================================================

    /// Closure-level three-tier classification.
    ///
    /// Checks run FAIL, WARN, PASS in that order. Only fail codes that are
    /// not also pass codes count, so a closure hitting a pass code and a
    /// distinct fail code is FAIL, and a code in both the fail and warn sets
    /// resolves to FAIL.
    #[must_use]
    pub fn evaluate_with_fail_and_warn_tiers(
        &self,
        patient: &BTreeSet<Code>,
        pass_codes: &BTreeSet<Code>,
        fail_codes: &BTreeSet<Code>,
        warn_codes: &BTreeSet<Code>,
    ) -> Outcome {
        let closure = self.ancestor_closure(patient);
        let hits_fail = fail_codes
            .difference(pass_codes)
            .any(|code| closure.contains(code));

        if hits_fail {
            Outcome::Fail
        } else if !closure.is_disjoint(warn_codes) {
            Outcome::Warn
        } else if !closure.is_disjoint(pass_codes) {
            Outcome::Pass
        } else {
            Outcome::Undetermined
        }
    }

    // =========================================================================
    // AMBIGUITY HELPERS
    // =========================================================================

    /// Targets for which the patient is of a combined adeno-squamous type
    /// whose adeno or squamous sibling is a descendant of the target.
    #[must_use]
    pub fn potential_adeno_squamous_matches(
        &self,
        patient: &BTreeSet<Code>,
        targets: &BTreeSet<Code>,
    ) -> BTreeSet<Code> {
        targets
            .iter()
            .filter(|target| {
                let combined: BTreeSet<Code> = self
                    .graph
                    .adeno_squamous_mappings_for(target.as_str())
                    .into_iter()
                    .map(|m| m.adeno_squamous.clone())
                    .collect();
                self.is_of_any_type(patient, &combined)
            })
            .cloned()
            .collect()
    }

    /// Targets the patient sits above within the same main cancer type.
    ///
    /// A patient code qualifies when it is an ancestor of the target, the
    /// target is not among its own ancestors, and it shares a main cancer type
    /// with the target. Suppressed when the patient carries a neuroendocrine
    /// marker that the target's tree lacks.
    #[must_use]
    pub fn undetermined_under_main_cancer_type(
        &self,
        patient: &BTreeSet<Code>,
        targets: &BTreeSet<Code>,
    ) -> BTreeSet<Code> {
        let neuroendocrine = self.graph.neuroendocrine_codes();
        let patient_is_neuroendocrine = !patient.is_disjoint(neuroendocrine);

        targets
            .iter()
            .filter(|target| {
                let target_tree = self.graph.code_closure(target.as_str());
                let target_main = self.graph.main_cancer_codes(target.as_str());
                let suppressed =
                    patient_is_neuroendocrine && target_tree.is_disjoint(neuroendocrine);

                !suppressed
                    && patient.iter().any(|code| {
                        let tree = self.graph.code_closure(code.as_str());
                        target_tree.contains(code)
                            && !tree.contains(*target)
                            && !tree.is_disjoint(&target_main)
                    })
            })
            .cloned()
            .collect()
    }

    fn terms(&self, codes: &BTreeSet<Code>) -> BTreeSet<String> {
        codes
            .iter()
            .filter_map(|c| self.graph.term(c.as_str()))
            .map(str::to_string)
            .collect()
    }

    // =========================================================================
    // PRIMARY TUMOR CLASSIFICATION
    // =========================================================================

    /// Full "primary tumor belongs to" check.
    ///
    /// 1. No codes → UNDETERMINED (unknown tumor type)
    /// 2. Closure hits a target → PASS, or WARN when `specific_query` is given
    ///    and the tumor name does not contain it
    /// 3. Adeno-squamous ambiguity → WARN
    /// 4. Same main cancer type, patient less specific → UNDETERMINED
    /// 5. Otherwise FAIL
    #[must_use]
    pub fn belongs_to(
        &self,
        tumor: &TumorDetails,
        targets: &BTreeSet<Code>,
        specific_query: Option<&str>,
    ) -> Verdict {
        let Some(codes) = tumor.codes.as_ref().filter(|c| !c.is_empty()) else {
            return Verdict::undetermined(UNKNOWN_TUMOR_TYPE);
        };

        let belongs: BTreeSet<Code> = self
            .ancestor_closure(codes)
            .intersection(targets)
            .cloned()
            .collect();

        if !belongs.is_empty() {
            let terms = format::concat(self.terms(&belongs));
            return match specific_query {
                Some(query) if tumor.name.to_lowercase().contains(&query.to_lowercase()) => {
                    Verdict::pass(format!(
                        "Tumor belongs to {} with specific request '{}'",
                        terms, query
                    ))
                }
                Some(query) => Verdict::warn(format!(
                    "Tumor belongs to {} but undetermined if '{}'",
                    terms, query
                )),
                None => Verdict::pass(format!("Tumor belongs to DOID term(s) {}", terms)),
            };
        }

        let adeno_squamous = self.potential_adeno_squamous_matches(codes, targets);
        if !adeno_squamous.is_empty() {
            return Verdict::warn(format!(
                "Unclear if tumor type is considered {}",
                format::concat_lowercase_with_comma_and_or(self.terms(&adeno_squamous))
            ));
        }

        let undetermined = self.undetermined_under_main_cancer_type(codes, targets);
        if !undetermined.is_empty() {
            return Verdict::undetermined(format!(
                "Undetermined if {}",
                format::concat_lowercase_with_comma_and_or(self.terms(&undetermined))
            ));
        }

        Verdict::fail(format!(
            "No {}",
            format::concat_lowercase_with_comma_and_or(self.terms(targets))
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
