//! # Evaluation Tier Tests (T0-T4)
//!
//! End-to-end checks of the behaviour predicates rely on.
//!
//! ## Tiers
//! - T0: Ontology closure and matching
//! - T1: Tier classification
//! - T2: Molecular aggregation
//! - T3: Derived stage folding
//! - T4: Composition and snapshots

use chrono::NaiveDate;
use std::collections::BTreeSet;
use trialmatch_core::{
    Code, Evaluator, ManualConfig, MessageTier, MolecularEvaluator, MolecularTest,
    OntologyGraph, OntologyMatcher, OntologyNode, Outcome, PatientRecord, TargetCoveragePredicate,
    TargetSpecification, TestTarget, TumorDetails, Verdict,
};

fn codes(list: &[&str]) -> BTreeSet<Code> {
    list.iter().map(|c| Code::from(*c)).collect()
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn lung_graph() -> OntologyGraph {
    OntologyGraph::from_nodes(
        [
            OntologyNode::new("162", "cancer", Vec::<Code>::new()),
            OntologyNode::new("1324", "lung cancer", ["162"]),
            OntologyNode::new("3905", "lung carcinoma", ["1324"]),
            OntologyNode::new("3908", "lung non-small cell carcinoma", ["3905"]),
            OntologyNode::new("3910", "lung adenocarcinoma", ["3908"]),
            OntologyNode::new("1612", "breast cancer", ["162"]),
            OntologyNode::new("2394", "ovarian cancer", ["162"]),
            OntologyNode::new("1909", "melanoma", ["162"]),
        ],
        ManualConfig::empty(),
    )
    .expect("valid graph")
}

// =============================================================================
// TIER T0: ONTOLOGY CLOSURE AND MATCHING
// =============================================================================

mod t0_ontology {
    use super::*;

    /// T0.1: A descendant is of its ancestor's type but not exactly it.
    #[test]
    fn nsclc_descendant_is_lung_cancer() {
        let graph = lung_graph();
        let matcher = OntologyMatcher::new(&graph);
        let patient = codes(&["3908"]);

        assert!(matcher.is_of_type(&patient, "1324"));
        assert!(!OntologyMatcher::is_exact_type(&patient, "1324"));
    }

    /// T0.2: The closure walks every ancestor up to the root.
    #[test]
    fn closure_reaches_root() {
        let graph = lung_graph();
        assert_eq!(
            graph.code_closure("3910"),
            codes(&["3910", "3908", "3905", "1324", "162"])
        );
    }

    /// T0.3: Empty input gives an empty closure.
    #[test]
    fn empty_closure() {
        let graph = lung_graph();
        assert!(graph.ancestor_closure(&BTreeSet::<Code>::new()).is_empty());
    }

    /// T0.4: Unknown codes are their own closure.
    #[test]
    fn unknown_code_closure() {
        let graph = lung_graph();
        assert_eq!(graph.code_closure("999999"), codes(&["999999"]));
    }

    /// T0.5: Combination types use exact codes only.
    #[test]
    fn combination_is_exact() {
        let required = codes(&["2394", "3910"]);
        assert!(OntologyMatcher::is_of_combination_type(
            &codes(&["2394", "3910", "1909"]),
            &required
        ));
        assert!(!OntologyMatcher::is_of_combination_type(
            &codes(&["2394", "3908"]),
            &required
        ));
    }

    /// T0.6: Unknown tumor type is undetermined, not an error.
    #[test]
    fn missing_codes_are_undetermined() {
        let graph = lung_graph();
        let matcher = OntologyMatcher::new(&graph);
        let verdict = matcher.belongs_to(&TumorDetails::default(), &codes(&["1324"]), None);
        assert_eq!(verdict.outcome(), Outcome::Undetermined);
    }
}

// =============================================================================
// TIER T1: TIER CLASSIFICATION
// =============================================================================

mod t1_tiers {
    use super::*;

    /// T1.1: Each tier wins on its own, fail dominates pass.
    #[test]
    fn tier_precedence() {
        let graph = lung_graph();
        let matcher = OntologyMatcher::new(&graph);
        let pass = codes(&["1324"]);
        let fail = codes(&["1612"]);
        let warn = codes(&["1909"]);
        let classify =
            |p: &[&str]| matcher.evaluate_with_fail_and_warn_tiers(&codes(p), &pass, &fail, &warn);

        assert_eq!(classify(&["3910"]), Outcome::Pass);
        assert_eq!(classify(&["1612"]), Outcome::Fail);
        assert_eq!(classify(&["1909"]), Outcome::Warn);
        assert_eq!(classify(&["2394"]), Outcome::Undetermined);
        assert_eq!(classify(&["3910", "1612"]), Outcome::Fail);
    }

    /// T1.1b: A code listed as both fail and warn resolves to FAIL.
    #[test]
    fn fail_outranks_warn_on_shared_code() {
        let graph = lung_graph();
        let matcher = OntologyMatcher::new(&graph);
        let shared = codes(&["1612"]);
        assert_eq!(
            matcher.evaluate_with_fail_and_warn_tiers(
                &codes(&["1612"]),
                &codes(&["1324"]),
                &shared,
                &shared
            ),
            Outcome::Fail
        );
    }

    /// T1.2: Repeated evaluation is stable.
    #[test]
    fn tiers_are_deterministic() {
        let graph = lung_graph();
        let matcher = OntologyMatcher::new(&graph);
        let patient = codes(&["3910", "1909"]);
        let first = matcher.evaluate_with_fail_and_warn_tiers(
            &patient,
            &codes(&["1324"]),
            &codes(&["1612"]),
            &codes(&["1909"]),
        );
        for _ in 0..10 {
            assert_eq!(
                matcher.evaluate_with_fail_and_warn_tiers(
                    &patient,
                    &codes(&["1324"]),
                    &codes(&["1612"]),
                    &codes(&["1909"]),
                ),
                first
            );
        }
    }

    /// T1.3: Every code must match for an all-codes check.
    #[test]
    fn all_codes_must_match() {
        let graph = lung_graph();
        let matcher = OntologyMatcher::new(&graph);
        let cancer = codes(&["162"]);
        let none = BTreeSet::new();
        assert_eq!(
            matcher.evaluate_all_codes_match_with_fail_and_warns(
                Some(&codes(&["3910", "1909"])),
                &codes(&["1324"]),
                &none,
                &none
            ),
            Outcome::Fail
        );
        assert_eq!(
            matcher.evaluate_all_codes_match_with_fail_and_warns(
                Some(&codes(&["3910", "1909"])),
                &cancer,
                &none,
                &codes(&["1909"])
            ),
            Outcome::Warn
        );
        assert_eq!(
            matcher.evaluate_all_codes_match_with_fail_and_warns(None, &cancer, &none, &none),
            Outcome::Fail
        );
    }
}

// =============================================================================
// TIER T2: MOLECULAR AGGREGATION
// =============================================================================

mod t2_molecular {
    use super::*;

    fn egfr_panel(day: u32) -> MolecularTest {
        MolecularTest::panel(
            date(2024, 3, day),
            TargetSpecification::new().with_gene("EGFR", TestTarget::ALL),
        )
    }

    /// T2.1: Only the most recent whole-genome test contributes events.
    #[test]
    fn latest_whole_genome_wins() {
        let tests = vec![
            MolecularTest::whole_genome(date(2022, 5, 1)),
            MolecularTest::whole_genome(date(2024, 5, 1)),
        ];
        let evaluator = MolecularEvaluator::new(|t: &MolecularTest| {
            let event = match t.date {
                Some(d) if d.format("%Y").to_string() == "2024" => "EGFR exon 19 del",
                _ => "EGFR L858R",
            };
            Some(Verdict::pass("EGFR activating mutation").with_inclusion_events([event]))
        });

        let verdict = evaluator.evaluate_tests(&tests);
        assert_eq!(verdict.outcome(), Outcome::Pass);
        assert_eq!(
            verdict.inclusion_events(),
            &BTreeSet::from(["EGFR exon 19 del".to_string()])
        );
    }

    /// T2.2: A definite panel FAIL beats undetermined panels.
    #[test]
    fn fail_beats_undetermined_across_panels() {
        let tests = vec![egfr_panel(1), egfr_panel(2), egfr_panel(3)];
        let evaluator = MolecularEvaluator::new(|t: &MolecularTest| {
            Some(if t.date == date(2024, 3, 2) {
                Verdict::fail("No EGFR mutation")
            } else {
                Verdict::undetermined("EGFR status unclear")
            })
        });
        assert_eq!(evaluator.evaluate_tests(&tests).outcome(), Outcome::Fail);
    }

    /// T2.3: Insufficient coverage short-circuits before the body runs.
    #[test]
    fn coverage_short_circuit() {
        let tests = vec![MolecularTest::panel(
            date(2024, 1, 1),
            TargetSpecification::new().with_gene("GENE_X", [TestTarget::Mutation]),
        )];
        let evaluator = MolecularEvaluator::new(|_: &MolecularTest| -> Option<Verdict> {
            unreachable!("body must not run when coverage is insufficient")
        })
        .for_gene(
            "GENE_X",
            TargetCoveragePredicate::and(&[TestTarget::Mutation, TestTarget::Fusion], "Fusion in"),
        );

        let verdict = evaluator.evaluate_tests(&tests);
        assert_eq!(verdict.outcome(), Outcome::Undetermined);
        assert!(verdict.is_missing_coverage());
    }

    /// T2.4: Tests older than the cutoff are ignored.
    #[test]
    fn stale_tests_ignored() {
        let tests = vec![MolecularTest::whole_genome(date(2019, 1, 1))];
        let evaluator = MolecularEvaluator::new(|_: &MolecularTest| Some(Verdict::pass("found")))
            .with_filter(date(2023, 1, 1), false);
        let verdict = evaluator.evaluate_tests(&tests);
        assert_eq!(verdict.outcome(), Outcome::Undetermined);
        assert!(verdict
            .messages(MessageTier::Undetermined)
            .contains("No molecular results of sufficient quality"));
    }

    /// T2.5: The aggregator evaluates patient records directly.
    #[test]
    fn evaluates_patient_record() {
        let record = PatientRecord {
            molecular_tests: vec![egfr_panel(1)],
            ..PatientRecord::default()
        };
        let evaluator = MolecularEvaluator::new(|_: &MolecularTest| Some(Verdict::pass("found")));
        assert_eq!(evaluator.evaluate(&record).outcome(), Outcome::Pass);
    }
}

// =============================================================================
// TIER T3: DERIVED STAGE FOLDING
// =============================================================================

mod t3_stages {
    use super::*;
    use trialmatch_core::{DerivedStageEvaluator, StagedRecord, TumorStage};

    fn advanced(record: &PatientRecord) -> Verdict {
        match record.tumor.stage {
            Some(TumorStage::IV) => Verdict::pass("Stage IV"),
            Some(TumorStage::IIIC) => Verdict::warn("Stage IIIC may qualify as advanced"),
            Some(_) => Verdict::fail("Not advanced"),
            None => Verdict::undetermined("Stage unknown"),
        }
    }

    fn staged(derived: &[TumorStage]) -> PatientRecord {
        PatientRecord {
            tumor: TumorDetails {
                derived_stages: Some(derived.iter().copied().collect()),
                ..TumorDetails::default()
            },
            ..PatientRecord::default()
        }
    }

    /// T3.1: A single WARN candidate passes through with identical messages.
    #[test]
    fn single_warn_passthrough() {
        let record = staged(&[TumorStage::IIIC]);
        let direct = advanced(&record.with_tumor_stage(TumorStage::IIIC));
        let verdict = DerivedStageEvaluator::new(advanced, "advanced disease").evaluate(&record);

        assert_eq!(verdict.outcome(), Outcome::Warn);
        assert_eq!(verdict.all_messages(), direct.all_messages());
    }

    /// T3.2: Mixed candidate outcomes are undetermined.
    #[test]
    fn mixed_candidates_undetermined() {
        let record = staged(&[TumorStage::II, TumorStage::IV]);
        let verdict = DerivedStageEvaluator::new(advanced, "advanced disease").evaluate(&record);
        assert_eq!(verdict.outcome(), Outcome::Undetermined);
        assert_eq!(
            verdict.all_messages(),
            vec!["Undetermined if patient has advanced disease"]
        );
    }
}

// =============================================================================
// TIER T4: COMPOSITION AND SNAPSHOTS
// =============================================================================

mod t4_composition {
    use super::*;
    use trialmatch_core::{And, Not, Or, TrialMatchError, ontology_from_bytes, ontology_to_bytes};

    /// T4.1: Or picks the best outcome, And the worst.
    #[test]
    fn or_and_extremes() {
        let or = Or::<PatientRecord>::new(vec![
            Box::new(|_: &PatientRecord| Verdict::fail("no")),
            Box::new(|_: &PatientRecord| Verdict::warn("maybe")),
        ])
        .expect("non-empty");
        let and = And::<PatientRecord>::new(vec![
            Box::new(|_: &PatientRecord| Verdict::pass("yes")),
            Box::new(|_: &PatientRecord| Verdict::undetermined("unclear")),
        ])
        .expect("non-empty");

        let record = PatientRecord::default();
        assert_eq!(or.evaluate(&record).outcome(), Outcome::Warn);
        assert_eq!(and.evaluate(&record).outcome(), Outcome::Undetermined);
    }

    /// T4.2: Not exchanges PASS and FAIL.
    #[test]
    fn not_inverts() {
        let not = Not::new(|_: &PatientRecord| Verdict::pass("has brain metastases"));
        let verdict = not.evaluate(&PatientRecord::default());
        assert_eq!(verdict.outcome(), Outcome::Fail);
        assert!(verdict.messages(MessageTier::Fail).contains("has brain metastases"));
    }

    /// T4.3: Empty composites are configuration errors.
    #[test]
    fn empty_composite_rejected() {
        assert!(matches!(
            Or::<PatientRecord>::new(Vec::new()),
            Err(TrialMatchError::ConfigError(_))
        ));
    }

    /// T4.4: A snapshot rebuilds the same closures.
    #[test]
    fn snapshot_preserves_closures() {
        let graph = lung_graph();
        let restored = ontology_from_bytes(&ontology_to_bytes(&graph).expect("encode"))
            .expect("decode");
        assert_eq!(restored.node_count(), graph.node_count());
        for node in graph.nodes() {
            assert_eq!(
                restored.code_closure(node.code.as_str()),
                graph.code_closure(node.code.as_str())
            );
        }
    }
}
