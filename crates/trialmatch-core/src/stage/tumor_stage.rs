use crate::TrialMatchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Tumor stage. Sub-stages (IIA, IIIB, ...) carry their category.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TumorStage {
    #[serde(rename = "0")]
    Zero,
    I,
    II,
    IIA,
    IIB,
    IIC,
    III,
    IIIA,
    IIIB,
    IIIC,
    IIID,
    IV,
}

/// Result of a sub-stage aware match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageMatch {
    /// The stage or its category is in the requested set.
    pub certain: bool,
    /// The requested set holds a sub-stage of this stage.
    pub potential: bool,
}

impl TumorStage {
    pub const ALL: [TumorStage; 12] = [
        TumorStage::Zero,
        TumorStage::I,
        TumorStage::II,
        TumorStage::IIA,
        TumorStage::IIB,
        TumorStage::IIC,
        TumorStage::III,
        TumorStage::IIIA,
        TumorStage::IIIB,
        TumorStage::IIIC,
        TumorStage::IIID,
        TumorStage::IV,
    ];

    /// The categorical stage this sub-stage belongs to.
    #[must_use]
    pub const fn category(self) -> Option<TumorStage> {
        match self {
            TumorStage::IIA | TumorStage::IIB | TumorStage::IIC => Some(TumorStage::II),
            TumorStage::IIIA | TumorStage::IIIB | TumorStage::IIIC | TumorStage::IIID => {
                Some(TumorStage::III)
            }
            TumorStage::Zero | TumorStage::I | TumorStage::II | TumorStage::III | TumorStage::IV => {
                None
            }
        }
    }

    #[must_use]
    pub const fn is_categorical(self) -> bool {
        self.category().is_none()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TumorStage::Zero => "0",
            TumorStage::I => "I",
            TumorStage::II => "II",
            TumorStage::IIA => "IIA",
            TumorStage::IIB => "IIB",
            TumorStage::IIC => "IIC",
            TumorStage::III => "III",
            TumorStage::IIIA => "IIIA",
            TumorStage::IIIB => "IIIB",
            TumorStage::IIIC => "IIIC",
            TumorStage::IIID => "IIID",
            TumorStage::IV => "IV",
        }
    }

    /// `self` or its category is in `stages_to_match`.
    ///
    /// The set must hold categorical stages only; a sub-stage in it is a
    /// caller error.
    pub fn is_stage_match(self, stages_to_match: &BTreeSet<TumorStage>) -> Result<bool, TrialMatchError> {
        if let Some(sub_stage) = stages_to_match.iter().find(|s| !s.is_categorical()) {
            return Err(TrialMatchError::NonCategoricalStage(*sub_stage));
        }
        Ok(stages_to_match.contains(&self)
            || self.category().is_some_and(|c| stages_to_match.contains(&c)))
    }

    /// Like [`Self::is_stage_match`] but accepts sub-stages, reporting a
    /// potential match when only a sub-stage of `self` was requested.
    #[must_use]
    pub fn specific_stage_match(self, stages_to_match: &BTreeSet<TumorStage>) -> StageMatch {
        let certain = stages_to_match.contains(&self)
            || self.category().is_some_and(|c| stages_to_match.contains(&c));
        let potential = stages_to_match
            .iter()
            .any(|s| s.category() == Some(self));
        StageMatch { certain, potential }
    }
}

impl fmt::Display for TumorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
