//! # trialmatch-core
//!
//! Deterministic decision core shared by clinical trial eligibility predicates.
//!
//! Every predicate inspects a patient record and returns a graded [`Verdict`].
//! This crate holds the two pieces nearly all of them lean on:
//!
//! - **Ontology matching**: expanding disease classification codes into their
//!   ancestor closure and matching it against target codes (`ontology`).
//! - **Verdict aggregation**: folding per-test and per-stage verdicts into one
//!   result under fixed precedence rules (`molecular`, `stage`, `composite`).
//!
//! ## Architectural Constraints
//!
//! - No I/O. Reference data arrives as an explicitly built [`OntologyGraph`].
//! - No global state; the graph is immutable and `Send + Sync`.
//! - Missing patient data is an `Undetermined` verdict, never an error.

// =============================================================================
// MODULES
// =============================================================================

pub mod composite;
pub mod format;
pub mod formats;
pub mod molecular;
pub mod ontology;
pub mod primitives;
pub mod record;
pub mod stage;
pub mod types;
pub mod verdict;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Code, TrialMatchError};

// =============================================================================
// RE-EXPORTS: Ontology
// =============================================================================

pub use ontology::{
    AdenoSquamousMapping, ExcludedRelationship, ManualConfig, OntologyGraph, OntologyGraphBuilder,
    OntologyMatcher, OntologyNode,
};

// =============================================================================
// RE-EXPORTS: Verdicts & Aggregation
// =============================================================================

pub use composite::{And, Evaluator, Not, Or, WarnIf};
pub use molecular::{
    ExperimentType, MolecularEvaluator, MolecularRecord, MolecularTest, MolecularTestFilter,
    TargetCoveragePredicate, TargetSpecification, TestTarget,
};
pub use record::{PatientRecord, TumorDetails};
pub use stage::{DerivedStageEvaluator, StagedRecord, TumorStage};
pub use verdict::{Findings, MessageTier, Outcome, Verdict};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{SnapshotHeader, ontology_from_bytes, ontology_to_bytes};
