//! # Ontology Graph
//!
//! Immutable in-memory disease taxonomy.
//!
//! Each node has a display term and zero or more parent codes. The effective
//! parent edges are the source edges minus configured exclusions, plus the
//! configured additional parents. The corrected edges are resolved once in
//! [`OntologyGraphBuilder::build`]; closures are walked on lookup, so memory
//! stays linear in the edge count and lookups never mutate. The graph can be
//! shared across threads without locking.

use crate::ontology::config::{AdenoSquamousMapping, ManualConfig};
use crate::primitives::{MAX_CODE_LENGTH, MAX_ONTOLOGY_NODES, MAX_TERM_LENGTH};
use crate::{Code, TrialMatchError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// NODE
// =============================================================================

/// One ontology entry as supplied by reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyNode {
    pub code: Code,
    pub term: String,
    #[serde(default)]
    pub parents: BTreeSet<Code>,
}

impl OntologyNode {
    #[must_use]
    pub fn new<I, C>(code: impl Into<Code>, term: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Code>,
    {
        Self {
            code: code.into(),
            term: term.into(),
            parents: parents.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Collects and validates nodes, then freezes them into an [`OntologyGraph`].
#[derive(Debug, Clone)]
pub struct OntologyGraphBuilder {
    config: ManualConfig,
    nodes: BTreeMap<Code, OntologyNode>,
}

impl OntologyGraphBuilder {
    #[must_use]
    pub fn new(config: ManualConfig) -> Self {
        Self {
            config,
            nodes: BTreeMap::new(),
        }
    }

    /// Add a node. Rejects blank or oversized codes and duplicates.
    pub fn add_node(&mut self, node: OntologyNode) -> Result<&mut Self, TrialMatchError> {
        validate_code(&node.code)?;
        for parent in &node.parents {
            validate_code(parent)?;
        }
        if node.term.len() > MAX_TERM_LENGTH {
            return Err(TrialMatchError::InvalidReferenceData(format!(
                "Term for {} exceeds {} bytes",
                node.code, MAX_TERM_LENGTH
            )));
        }
        if self.nodes.len() >= MAX_ONTOLOGY_NODES {
            return Err(TrialMatchError::InvalidReferenceData(format!(
                "Ontology exceeds {} nodes",
                MAX_ONTOLOGY_NODES
            )));
        }
        if self.nodes.contains_key(&node.code) {
            return Err(TrialMatchError::InvalidReferenceData(format!(
                "Duplicate code: {}",
                node.code
            )));
        }
        self.nodes.insert(node.code.clone(), node);
        Ok(self)
    }

    /// Freeze the graph with its corrected parent edges.
    #[must_use]
    pub fn build(self) -> OntologyGraph {
        let Self { config, nodes } = self;

        let mut parents: BTreeMap<Code, BTreeSet<Code>> = BTreeMap::new();
        for node in nodes.values() {
            let kept = node
                .parents
                .iter()
                .filter(|p| !config.is_excluded(node.code.as_str(), p.as_str()))
                .cloned();
            parents.entry(node.code.clone()).or_default().extend(kept);
        }
        for (child, extra) in &config.additional_parents {
            parents
                .entry(child.clone())
                .or_default()
                .extend(extra.iter().cloned());
        }

        let mut code_by_term: BTreeMap<String, Code> = BTreeMap::new();
        for node in nodes.values() {
            code_by_term
                .entry(node.term.to_lowercase())
                .or_insert_with(|| node.code.clone());
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = parents.values().map(BTreeSet::len).sum::<usize>(),
            "ontology graph built"
        );

        OntologyGraph {
            nodes,
            parents,
            code_by_term,
            config,
        }
    }
}

fn validate_code(code: &Code) -> Result<(), TrialMatchError> {
    if code.as_str().trim().is_empty() {
        return Err(TrialMatchError::InvalidReferenceData(
            "Empty classification code".to_string(),
        ));
    }
    if code.as_str().len() > MAX_CODE_LENGTH {
        return Err(TrialMatchError::InvalidReferenceData(format!(
            "Code exceeds {} bytes: {}",
            MAX_CODE_LENGTH, code
        )));
    }
    Ok(())
}

/// Iterative upward walk from every start code. Tolerates cycles: each code
/// is expanded once.
fn walk_ancestors<'a, I>(parents: &BTreeMap<Code, BTreeSet<Code>>, starts: I) -> BTreeSet<Code>
where
    I: IntoIterator<Item = &'a Code>,
{
    let mut visited = BTreeSet::new();
    let mut pending: Vec<Code> = starts.into_iter().cloned().collect();

    while let Some(code) = pending.pop() {
        if visited.contains(&code) {
            continue;
        }
        if let Some(next) = parents.get(&code) {
            pending.extend(next.iter().filter(|p| !visited.contains(*p)).cloned());
        }
        visited.insert(code);
    }
    visited
}

// =============================================================================
// GRAPH
// =============================================================================

/// Read-only ontology over corrected parent edges.
#[derive(Debug, Clone)]
pub struct OntologyGraph {
    nodes: BTreeMap<Code, OntologyNode>,
    parents: BTreeMap<Code, BTreeSet<Code>>,
    code_by_term: BTreeMap<String, Code>,
    config: ManualConfig,
}

impl OntologyGraph {
    /// Build a graph from a full node list.
    pub fn from_nodes<I>(nodes: I, config: ManualConfig) -> Result<Self, TrialMatchError>
    where
        I: IntoIterator<Item = OntologyNode>,
    {
        let mut builder = OntologyGraphBuilder::new(config);
        for node in nodes {
            builder.add_node(node)?;
        }
        Ok(builder.build())
    }

    /// Number of nodes supplied by reference data.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes in code order, as supplied (before corrections).
    pub fn nodes(&self) -> impl Iterator<Item = &OntologyNode> {
        self.nodes.values()
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }

    #[must_use]
    pub const fn config(&self) -> &ManualConfig {
        &self.config
    }

    /// Display term of a code.
    #[must_use]
    pub fn term(&self, code: &str) -> Option<&str> {
        self.nodes.get(code).map(|n| n.term.as_str())
    }

    /// Code whose term equals `term`, ignoring case.
    #[must_use]
    pub fn code_for_term(&self, term: &str) -> Option<&Code> {
        self.code_by_term.get(&term.to_lowercase())
    }

    /// `code` plus every code reachable through parent edges.
    ///
    /// A code unknown to the graph is its own closure.
    #[must_use]
    pub fn code_closure(&self, code: &str) -> BTreeSet<Code> {
        walk_ancestors(&self.parents, [&Code::from(code)])
    }

    /// Union of [`Self::code_closure`] over `codes`. Empty input gives an empty set.
    #[must_use]
    pub fn ancestor_closure<'a, I>(&self, codes: I) -> BTreeSet<Code>
    where
        I: IntoIterator<Item = &'a Code>,
    {
        walk_ancestors(&self.parents, codes)
    }

    /// Main cancer types among the ancestors of `code`.
    #[must_use]
    pub fn main_cancer_codes(&self, code: &str) -> BTreeSet<Code> {
        self.code_closure(code)
            .intersection(&self.config.main_cancer_codes)
            .cloned()
            .collect()
    }

    /// Mappings whose adeno or squamous sibling is an ancestor of `code`.
    #[must_use]
    pub fn adeno_squamous_mappings_for(&self, code: &str) -> Vec<&AdenoSquamousMapping> {
        let closure = self.code_closure(code);
        self.config
            .adeno_squamous_mappings
            .iter()
            .filter(|m| closure.contains(&m.adeno) || closure.contains(&m.squamous))
            .collect()
    }

    #[must_use]
    pub const fn neuroendocrine_codes(&self) -> &BTreeSet<Code> {
        &self.config.neuroendocrine_codes
    }
}

// =============================================================================
// TESTS
// =============================================================================
