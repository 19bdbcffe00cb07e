//! # Patient Record
//!
//! The slice of a patient record the core reads. Record loading is the
//! caller's job; these types only fix the shape.

use crate::molecular::{MolecularRecord, MolecularTest};
use crate::stage::{StagedRecord, TumorStage};
use crate::Code;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tumor classification and staging.
///
/// `codes == None` means the classification is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TumorDetails {
    pub name: String,
    pub codes: Option<BTreeSet<Code>>,
    pub stage: Option<TumorStage>,
    pub derived_stages: Option<BTreeSet<TumorStage>>,
}

impl TumorDetails {
    #[must_use]
    pub fn with_codes(codes: BTreeSet<Code>) -> Self {
        Self {
            codes: Some(codes),
            ..Self::default()
        }
    }
}

/// A patient as seen by eligibility predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    pub tumor: TumorDetails,
    pub molecular_tests: Vec<MolecularTest>,
}

impl StagedRecord for PatientRecord {
    fn tumor_stage(&self) -> Option<TumorStage> {
        self.tumor.stage
    }

    fn derived_stages(&self) -> Option<&BTreeSet<TumorStage>> {
        self.tumor.derived_stages.as_ref()
    }

    fn with_tumor_stage(&self, stage: TumorStage) -> Self {
        let mut copy = self.clone();
        copy.tumor.stage = Some(stage);
        copy
    }
}

impl MolecularRecord for PatientRecord {
    fn molecular_tests(&self) -> &[MolecularTest] {
        &self.molecular_tests
    }
}
