//! # CLI Command Implementations

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use trialmatch_core::{
    Code, MessageTier, OntologyGraph, OntologyMatcher, Outcome, TrialMatchError, TumorDetails,
    Verdict, ontology_to_bytes,
};

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json_mode: bool,
    pub verbose: bool,
    pub quiet: bool,
}

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Reject files larger than `max_size` before reading them.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TrialMatchError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TrialMatchError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(TrialMatchError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and require a regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, TrialMatchError> {
    let canonical = path.canonicalize().map_err(|e| {
        TrialMatchError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(TrialMatchError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }
    Ok(canonical)
}

/// Canonicalize the parent of an output path, keeping the file name.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, TrialMatchError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        TrialMatchError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;
    if !canonical_parent.is_dir() {
        return Err(TrialMatchError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| TrialMatchError::IoError("Output path has no filename".to_string()))?;
    Ok(canonical_parent.join(filename))
}

fn code_set(codes: &[String]) -> BTreeSet<Code> {
    codes
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(Code::from)
        .collect()
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn describe(graph: &OntologyGraph, code: &Code) -> String {
    match graph.term(code.as_str()) {
        Some(term) => format!("{} ({})", code, term),
        None => format!("{} (unknown)", code),
    }
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

pub fn cmd_status(graph: &OntologyGraph, output: Output, source: &Path) -> Result<(), TrialMatchError> {
    let config = graph.config();
    if output.json_mode {
        print_json(&serde_json::json!({
            "ontology": source.to_string_lossy(),
            "node_count": graph.node_count(),
            "main_cancer_codes": config.main_cancer_codes.len(),
            "adeno_squamous_mappings": config.adeno_squamous_mappings.len(),
            "additional_parents": config.additional_parents.len(),
            "excluded_relationships": config.excluded_relationships.len(),
            "neuroendocrine_codes": config.neuroendocrine_codes,
        }));
        return Ok(());
    }

    if !output.quiet {
        println!("trialmatch Ontology Status");
        println!("==========================");
    }
    println!("Ontology:               {}", source.display());
    println!("Nodes:                  {}", graph.node_count());
    println!("Main cancer types:      {}", config.main_cancer_codes.len());
    println!("Adeno-squamous mappings: {}", config.adeno_squamous_mappings.len());
    println!("Additional parents:     {}", config.additional_parents.len());
    println!("Excluded relationships: {}", config.excluded_relationships.len());
    Ok(())
}

// =============================================================================
// CLOSURE COMMAND
// =============================================================================

pub fn cmd_closure(
    graph: &OntologyGraph,
    output: Output,
    codes: &[String],
) -> Result<(), TrialMatchError> {
    let input = code_set(codes);
    let unknown: Vec<&Code> = input.iter().filter(|c| !graph.contains(c.as_str())).collect();
    if !unknown.is_empty() {
        tracing::warn!(?unknown, "codes not present in the ontology");
    }
    let closure = graph.ancestor_closure(&input);

    if output.json_mode {
        let entries: Vec<serde_json::Value> = closure
            .iter()
            .map(|c| serde_json::json!({ "code": c, "term": graph.term(c.as_str()) }))
            .collect();
        print_json(&serde_json::json!({ "codes": input, "closure": entries }));
        return Ok(());
    }

    if !output.quiet {
        println!("Closure of {} code(s): {} code(s)", input.len(), closure.len());
    }
    for code in &closure {
        println!("  {}", describe(graph, code));
    }
    Ok(())
}

// =============================================================================
// CLASSIFY COMMAND
// =============================================================================

fn print_verdict(verdict: &Verdict, output: Output) {
    println!("Outcome: {}", verdict.outcome());
    for tier in MessageTier::ALL {
        for message in verdict.messages(tier) {
            println!("  [{:?}] {}", tier, message);
        }
    }
    if output.verbose {
        println!("Recoverable:      {}", verdict.is_recoverable());
        println!("Missing coverage: {}", verdict.is_missing_coverage());
    }
}

pub fn cmd_classify(
    graph: &OntologyGraph,
    output: Output,
    codes: &[String],
    targets: &[String],
    name: &str,
    query: Option<&str>,
) -> Result<(), TrialMatchError> {
    let targets = code_set(targets);
    if targets.is_empty() {
        return Err(TrialMatchError::ConfigError("No target codes given".to_string()));
    }
    let tumor = TumorDetails {
        name: name.to_string(),
        ..TumorDetails::with_codes(code_set(codes))
    };

    let verdict = OntologyMatcher::new(graph).belongs_to(&tumor, &targets, query);
    tracing::debug!(outcome = %verdict.outcome(), "classified tumor");

    if output.json_mode {
        let value = serde_json::to_value(&verdict)
            .map_err(|e| TrialMatchError::SerializationError(e.to_string()))?;
        print_json(&value);
        return Ok(());
    }
    print_verdict(&verdict, output);
    Ok(())
}

// =============================================================================
// TIERS COMMAND
// =============================================================================

pub fn cmd_tiers(
    graph: &OntologyGraph,
    output: Output,
    codes: &[String],
    pass: &[String],
    fail: &[String],
    warn: &[String],
) -> Result<(), TrialMatchError> {
    let outcome: Outcome = OntologyMatcher::new(graph).evaluate_with_fail_and_warn_tiers(
        &code_set(codes),
        &code_set(pass),
        &code_set(fail),
        &code_set(warn),
    );

    if output.json_mode {
        print_json(&serde_json::json!({ "outcome": outcome }));
    } else {
        println!("{}", outcome);
    }
    Ok(())
}

// =============================================================================
// SNAPSHOT COMMAND
// =============================================================================

pub fn cmd_snapshot(graph: &OntologyGraph, output: Output, path: &Path) -> Result<(), TrialMatchError> {
    let target = validate_output_path(path)?;
    let bytes = ontology_to_bytes(graph)?;
    std::fs::write(&target, &bytes)
        .map_err(|e| TrialMatchError::IoError(format!("Cannot write {}: {}", path.display(), e)))?;

    tracing::info!(path = %target.display(), bytes = bytes.len(), "wrote ontology snapshot");
    if output.json_mode {
        print_json(&serde_json::json!({
            "output": target.to_string_lossy(),
            "bytes": bytes.len(),
            "nodes": graph.node_count(),
        }));
    } else if !output.quiet {
        println!("Wrote {} bytes ({} nodes) to {}", bytes.len(), graph.node_count(), target.display());
    }
    Ok(())
}
