//! # Molecular Module
//!
//! Molecular test records, target coverage, recency filtering, and the
//! per-test verdict aggregator.

mod coverage;
mod evaluator;
mod filter;
mod model;

pub use coverage::TargetCoveragePredicate;
pub use evaluator::{MolecularEvaluator, MolecularRecord, PANEL_PRECEDENCE};
pub use filter::MolecularTestFilter;
pub use model::{ExperimentType, MolecularTest, TargetSpecification, TestTarget};
