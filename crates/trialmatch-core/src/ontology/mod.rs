//! # Ontology Module
//!
//! Disease taxonomy graph, its manual corrections, and the matcher.

mod config;
mod graph;
mod matcher;

pub use config::{AdenoSquamousMapping, ExcludedRelationship, ManualConfig};
pub use graph::{OntologyGraph, OntologyGraphBuilder, OntologyNode};
pub use matcher::OntologyMatcher;
