//! # Formats Module
//!
//! Byte-level encodings of reference data. File I/O stays in the app layer.

mod snapshot;

pub use snapshot::{MAX_SNAPSHOT_PAYLOAD_SIZE, SnapshotHeader, ontology_from_bytes, ontology_to_bytes};
