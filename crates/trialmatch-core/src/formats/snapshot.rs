//! # Ontology Snapshot
//!
//! Header (5 bytes) + postcard payload.
//! - 4 bytes: Magic ("TMON")
//! - 1 byte: Version
//!
//! The payload holds the nodes as supplied plus the manual configuration.
//! Closures are not stored; loading rebuilds them through the graph builder,
//! so a snapshot is validated exactly like fresh reference data.
//!
//! Size and header are checked before the payload is parsed.

use crate::ontology::{ManualConfig, OntologyGraph, OntologyNode};
use crate::{TrialMatchError, primitives};
use serde::{Deserialize, Serialize};

/// Upper bound on an encoded snapshot.
pub const MAX_SNAPSHOT_PAYLOAD_SIZE: usize = 256 * 1024 * 1024; // 256 MB

const HEADER_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), TrialMatchError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(TrialMatchError::DeserializationError(
                "not an ontology snapshot (bad magic bytes)".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(TrialMatchError::DeserializationError(format!(
                "unsupported snapshot version {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let [a, b, c, d] = self.magic;
        [a, b, c, d, self.version]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrialMatchError> {
        match bytes {
            [a, b, c, d, version, ..] => Ok(Self {
                magic: [*a, *b, *c, *d],
                version: *version,
            }),
            _ => Err(TrialMatchError::DeserializationError(
                "snapshot header too short".to_string(),
            )),
        }
    }

    /// True when `bytes` starts with the snapshot magic.
    #[must_use]
    pub fn is_snapshot(bytes: &[u8]) -> bool {
        bytes.starts_with(primitives::MAGIC_BYTES)
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize)]
struct SnapshotPayload {
    nodes: Vec<OntologyNode>,
    config: ManualConfig,
}

/// Encode `graph` as header + payload.
pub fn ontology_to_bytes(graph: &OntologyGraph) -> Result<Vec<u8>, TrialMatchError> {
    let payload = SnapshotPayload {
        nodes: graph.nodes().cloned().collect(),
        config: graph.config().clone(),
    };
    let body = postcard::to_stdvec(&payload)
        .map_err(|e| TrialMatchError::SerializationError(e.to_string()))?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&SnapshotHeader::new().to_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a snapshot and rebuild the graph.
pub fn ontology_from_bytes(bytes: &[u8]) -> Result<OntologyGraph, TrialMatchError> {
    if bytes.len() > MAX_SNAPSHOT_PAYLOAD_SIZE {
        return Err(TrialMatchError::DeserializationError(format!(
            "snapshot of {} bytes exceeds limit of {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_PAYLOAD_SIZE
        )));
    }
    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    let body = bytes.get(HEADER_LEN..).unwrap_or_default();
    let payload: SnapshotPayload = postcard::from_bytes(body).map_err(|e| {
        TrialMatchError::DeserializationError(format!("corrupt snapshot payload: {}", e))
    })?;
    tracing::debug!(nodes = payload.nodes.len(), "decoded ontology snapshot");
    OntologyGraph::from_nodes(payload.nodes, payload.config)
}
