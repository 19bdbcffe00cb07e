//! # Stage Module
//!
//! Tumor stages, stage matching, and evaluation over derived stages when
//! the record carries no explicit stage.

mod derived;
mod tumor_stage;

pub use derived::{DerivedStageEvaluator, StagedRecord, fold_to_worst};
pub use tumor_stage::{StageMatch, TumorStage};
