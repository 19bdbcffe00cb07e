//! # Ontology Reference Loading
//!
//! Reads reference data from disk. Two encodings are accepted and told
//! apart by the leading magic bytes:
//!
//! - JSON: `{"nodes": [{"code": "3908", "term": "...", "parents": ["3905"]}]}`
//! - Binary snapshot written by the `snapshot` command
//!
//! A snapshot carries its own manual configuration; an explicit
//! configuration passed here replaces it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use trialmatch_core::{
    ManualConfig, OntologyGraph, OntologyNode, SnapshotHeader, TrialMatchError,
    formats::MAX_SNAPSHOT_PAYLOAD_SIZE, ontology_from_bytes,
};

/// JSON reference file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceFile {
    pub nodes: Vec<OntologyNode>,
}

/// Build a graph from raw file contents.
pub fn ontology_from_reference_bytes(
    bytes: &[u8],
    config: Option<ManualConfig>,
) -> Result<OntologyGraph, TrialMatchError> {
    if SnapshotHeader::is_snapshot(bytes) {
        let graph = ontology_from_bytes(bytes)?;
        return match config {
            Some(config) => OntologyGraph::from_nodes(graph.nodes().cloned(), config),
            None => Ok(graph),
        };
    }

    let reference: ReferenceFile = serde_json::from_slice(bytes)
        .map_err(|e| TrialMatchError::DeserializationError(format!("Invalid reference JSON: {}", e)))?;
    OntologyGraph::from_nodes(reference.nodes, config.unwrap_or_default())
}

/// Read and build the ontology at `path`.
pub fn load_ontology(
    path: &Path,
    config: Option<ManualConfig>,
) -> Result<OntologyGraph, TrialMatchError> {
    let canonical = crate::cli::validate_file_path(path)?;
    crate::cli::validate_file_size(&canonical, MAX_SNAPSHOT_PAYLOAD_SIZE as u64)?;
    let bytes = std::fs::read(&canonical)
        .map_err(|e| TrialMatchError::IoError(format!("Cannot read {}: {}", path.display(), e)))?;

    let graph = ontology_from_reference_bytes(&bytes, config)?;
    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        snapshot = SnapshotHeader::is_snapshot(&bytes),
        "loaded ontology"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialmatch_core::ontology_to_bytes;

    const REFERENCE: &str = r#"{
        "nodes": [
            {"code": "162", "term": "cancer"},
            {"code": "1324", "term": "lung cancer", "parents": ["162"]},
            {"code": "3908", "term": "lung non-small cell carcinoma", "parents": ["1324"]}
        ]
    }"#;

    #[test]
    fn json_reference_builds_graph() {
        let graph = ontology_from_reference_bytes(REFERENCE.as_bytes(), None).expect("load");
        assert_eq!(graph.node_count(), 3);
        assert!(graph.code_closure("3908").contains("162"));
    }

    #[test]
    fn snapshot_is_detected() {
        let graph = ontology_from_reference_bytes(REFERENCE.as_bytes(), Some(ManualConfig::empty()))
            .expect("load");
        let bytes = ontology_to_bytes(&graph).expect("encode");
        let restored = ontology_from_reference_bytes(&bytes, None).expect("reload");
        assert_eq!(restored.config(), &ManualConfig::empty());
        assert_eq!(restored.code_closure("3908"), graph.code_closure("3908"));
    }

    #[test]
    fn explicit_config_replaces_snapshot_config() {
        let graph = ontology_from_reference_bytes(REFERENCE.as_bytes(), Some(ManualConfig::empty()))
            .expect("load");
        let bytes = ontology_to_bytes(&graph).expect("encode");
        let restored =
            ontology_from_reference_bytes(&bytes, Some(ManualConfig::default())).expect("reload");
        assert_eq!(restored.config(), &ManualConfig::default());
    }

    #[test]
    fn duplicate_codes_rejected() {
        let json = r#"{"nodes": [{"code": "1", "term": "a"}, {"code": "1", "term": "b"}]}"#;
        assert!(matches!(
            ontology_from_reference_bytes(json.as_bytes(), None),
            Err(TrialMatchError::InvalidReferenceData(_))
        ));
    }

    #[test]
    fn garbage_rejected() {
        assert!(matches!(
            ontology_from_reference_bytes(b"not json", None),
            Err(TrialMatchError::DeserializationError(_))
        ));
    }
}
