//! File processing logic for doccop

use anyhow::{Context, Result};
use std::path::Path;

use doccop_core::{apply_edit_groups, Cancellation, Cancelled};
use doccop_rules::{analyze, compute_fix_all, RuleRegistry};

use crate::output::DiagnosticInfo;

/// Result of processing a single file
pub struct ProcessResult {
    /// Diagnostics found, in source order
    pub diagnostics: Vec<DiagnosticInfo>,
    /// Original source code
    pub old_source: String,
    /// Source with every diagnostic fixed (only if diagnostics were found)
    pub new_source: Option<String>,
}

/// Analyze a single C# file and compute its fixed text
///
/// Returns `Ok(None)` when the analysis was cancelled; nothing about the
/// file is reported in that case.
pub fn process_file(
    path: &Path,
    registry: &RuleRegistry,
    cancellation: &Cancellation,
) -> Result<Option<ProcessResult>> {
    let source_code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let diagnostics = match analyze(&source_code, registry, cancellation) {
        Ok(diagnostics) => diagnostics,
        Err(Cancelled) => return Ok(None),
    };

    if diagnostics.is_empty() {
        return Ok(Some(ProcessResult {
            diagnostics: vec![],
            old_source: source_code,
            new_source: None,
        }));
    }

    let group = compute_fix_all(&source_code, &diagnostics)
        .with_context(|| format!("Failed to compute fixes for {}", path.display()))?;
    let fixed = apply_edit_groups(&source_code, &[group])
        .with_context(|| format!("Failed to apply fixes to {}", path.display()))?;

    Ok(Some(ProcessResult {
        diagnostics: diagnostics.iter().map(DiagnosticInfo::from).collect(),
        old_source: source_code,
        new_source: Some(fixed.source),
    }))
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
