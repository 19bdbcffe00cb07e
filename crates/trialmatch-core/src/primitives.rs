//! # Fixed Constants
//!
//! Message texts and format constants compiled into the core.
//!
//! Predicates depend on these exact strings when they override or compare
//! aggregator output, so they live in one place.

/// Magic bytes for the ontology snapshot header.
///
/// - File Header = Magic Bytes ("TMON") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"TMON";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot payload.
pub const FORMAT_VERSION: u8 = 1;

// =============================================================================
// AGGREGATOR MESSAGES
// =============================================================================

/// Undetermined message when no molecular test survives filtering.
pub const NO_MOLECULAR_RESULTS: &str = "No molecular results of sufficient quality";

/// Undetermined message when no evaluated test produced a verdict.
pub const INSUFFICIENT_MOLECULAR_DATA: &str = "Insufficient molecular data";

/// Undetermined message when a patient has no classification codes.
pub const UNKNOWN_TUMOR_TYPE: &str = "Unknown tumor type";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length of a classification code.
///
/// Codes longer than this are rejected by the graph builder.
pub const MAX_CODE_LENGTH: usize = 64;

/// Maximum length of a display term.
pub const MAX_TERM_LENGTH: usize = 1024;

/// Maximum number of nodes accepted into a single ontology graph.
pub const MAX_ONTOLOGY_NODES: usize = 1_000_000;
