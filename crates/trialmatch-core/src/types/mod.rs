//! # Core Type Definitions
//!
//! - Classification codes (`Code`)
//! - Error types (`TrialMatchError`)
//!
//! ## Determinism Guarantees
//!
//! `Code` orders exactly like its underlying string, so sets of codes and
//! `str` lookups agree.

use crate::stage::TumorStage;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

// =============================================================================
// CLASSIFICATION CODE
// =============================================================================

/// Identifier of a disease in the ontology, e.g. `"1324"` for lung cancer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(pub String);

impl Code {
    /// Create a new code from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Code {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Code {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Code {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the trialmatch core.
///
/// Missing patient data is never an error; it is an `Undetermined` verdict.
/// These variants cover programming errors and reference-data faults only.
#[derive(Debug, Error)]
pub enum TrialMatchError {
    /// A stage match was requested against a set holding sub-stages.
    #[error("Stages to match must be categorical, got {0}")]
    NonCategoricalStage(TumorStage),

    /// Ontology reference data is structurally invalid.
    #[error("Invalid reference data: {0}")]
    InvalidReferenceData(String),

    /// Configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
