//! # Property-Based Tests
//!
//! Closure and classification invariants over generated ontologies.

use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use std::collections::BTreeSet;
use trialmatch_core::{
    Code, ManualConfig, OntologyGraph, OntologyMatcher, OntologyNode, ontology_from_bytes,
    ontology_to_bytes,
};

/// Builds a graph over codes "0".."n" where each node's parents are drawn
/// from the generated index lists. Cycles are allowed.
fn graph_from(parent_lists: &[Vec<usize>]) -> OntologyGraph {
    let n = parent_lists.len();
    let nodes = parent_lists.iter().enumerate().map(|(i, parents)| {
        let parents: BTreeSet<String> = parents.iter().map(|p| (p % n).to_string()).collect();
        OntologyNode::new(i.to_string(), format!("term {}", i), parents)
    });
    OntologyGraph::from_nodes(nodes, ManualConfig::empty()).expect("generated graph is valid")
}

fn code_set(indices: &BTreeSet<usize>, n: usize) -> BTreeSet<Code> {
    indices.iter().map(|i| Code::from((i % n).to_string())).collect()
}

fn arb_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    vec(vec(0usize..40, 0..3), 1..40)
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every code is in its own closure.
    #[test]
    fn closure_contains_self(parents in arb_graph(), pick in 0usize..40) {
        let graph = graph_from(&parents);
        let code = (pick % parents.len()).to_string();
        prop_assert!(graph.code_closure(&code).contains(code.as_str()));
    }

    /// The closure of a union is the union of closures.
    #[test]
    fn closure_distributes_over_union(
        parents in arb_graph(),
        a in btree_set(0usize..40, 0..6),
        b in btree_set(0usize..40, 0..6),
    ) {
        let graph = graph_from(&parents);
        let n = parents.len();
        let (a, b) = (code_set(&a, n), code_set(&b, n));
        let union: BTreeSet<Code> = a.union(&b).cloned().collect();

        let mut expected = graph.ancestor_closure(&a);
        expected.extend(graph.ancestor_closure(&b));
        prop_assert_eq!(graph.ancestor_closure(&union), expected);
    }

    /// Closures are closed: ancestors of ancestors add nothing.
    #[test]
    fn closure_is_idempotent(parents in arb_graph(), pick in btree_set(0usize..40, 1..5)) {
        let graph = graph_from(&parents);
        let once = graph.ancestor_closure(&code_set(&pick, parents.len()));
        prop_assert_eq!(graph.ancestor_closure(&once), once);
    }

    /// Identical input gives identical classification.
    #[test]
    fn classification_is_deterministic(
        parents in arb_graph(),
        patient in btree_set(0usize..40, 0..5),
        pass in btree_set(0usize..40, 0..3),
        fail in btree_set(0usize..40, 0..3),
        warn in btree_set(0usize..40, 0..3),
    ) {
        let n = parents.len();
        let first = graph_from(&parents);
        let second = graph_from(&parents);
        let (patient, pass, fail, warn) =
            (code_set(&patient, n), code_set(&pass, n), code_set(&fail, n), code_set(&warn, n));

        let a = OntologyMatcher::new(&first);
        let b = OntologyMatcher::new(&second);
        prop_assert_eq!(
            a.evaluate_with_fail_and_warn_tiers(&patient, &pass, &fail, &warn),
            b.evaluate_with_fail_and_warn_tiers(&patient, &pass, &fail, &warn)
        );
        prop_assert_eq!(a.is_of_any_type(&patient, &pass), b.is_of_any_type(&patient, &pass));
    }

    /// Snapshots re-encode to the same bytes.
    #[test]
    fn snapshot_bytes_are_stable(parents in arb_graph()) {
        let graph = graph_from(&parents);
        let bytes = ontology_to_bytes(&graph).expect("encode");
        let restored = ontology_from_bytes(&bytes).expect("decode");
        prop_assert_eq!(ontology_to_bytes(&restored).expect("re-encode"), bytes);
    }
}
