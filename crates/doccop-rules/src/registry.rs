//! Rule trait and registry for doccop documentation rules

use std::collections::HashSet;

use doccop_core::{Cancellation, Cancelled, Diagnostic, Edit, EditError, LineIndex, Severity};
use doccop_syntax::SyntaxTree;
use thiserror::Error;

use crate::void_return_value::VoidReturnValueRule;

/// Errors that can occur while computing a fix
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixError {
    #[error("Diagnostic at {line}:{column} no longer matches the source")]
    StaleDiagnostic { line: usize, column: usize },

    #[error("No rule registered for '{0}'")]
    UnknownRule(String),

    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Everything a rule needs to inspect one file
pub struct CheckContext<'a> {
    pub source: &'a str,
    pub tree: &'a SyntaxTree,
    pub lines: LineIndex<'a>,
    pub cancellation: &'a Cancellation,
}

impl<'a> CheckContext<'a> {
    pub fn new(source: &'a str, tree: &'a SyntaxTree, cancellation: &'a Cancellation) -> Self {
        Self {
            source,
            tree,
            lines: LineIndex::new(source),
            cancellation,
        }
    }
}

/// A documentation rule that reports diagnostics and knows how to fix them
pub trait Rule: Send + Sync {
    /// The unique identifier for this rule (e.g., "SA1617")
    fn id(&self) -> &'static str;

    /// Short readable name (e.g., "void_return_value")
    fn name(&self) -> &'static str;

    /// A short description of what this rule checks
    fn description(&self) -> &'static str;

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    /// Check a parsed file and return its diagnostics in source order
    ///
    /// Returns `Err(Cancelled)` without partial results once the context's
    /// cancellation token fires.
    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Diagnostic>, Cancelled>;

    /// Compute the edit resolving one of this rule's diagnostics
    fn fix(&self, source: &str, diagnostic: &Diagnostic) -> Result<Edit, FixError>;

    /// Compute edits resolving several diagnostics of one file at once
    ///
    /// The edits are planned against the same original text and never overlap.
    fn fix_all(&self, source: &str, diagnostics: &[&Diagnostic]) -> Result<Vec<Edit>, FixError> {
        diagnostics.iter().map(|d| self.fix(source, d)).collect()
    }
}

static BUILTIN_RULES: &[&dyn Rule] = &[&VoidReturnValueRule];

/// Look up a built-in rule by id
pub fn builtin_rule(id: &str) -> Option<&'static dyn Rule> {
    BUILTIN_RULES.iter().copied().find(|r| r.id() == id)
}

/// Registry of the rules an analysis runs
///
/// Built once, then passed by reference into every analysis.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: Vec<&'static dyn Rule>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_RULES.to_vec(),
        }
    }

    /// Create a registry with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Get all rule ids
    pub fn all_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Find a rule by id or readable name
    pub fn resolve(&self, id_or_name: &str) -> Option<&'static dyn Rule> {
        self.rules
            .iter()
            .copied()
            .find(|r| r.id() == id_or_name || r.name() == id_or_name)
    }

    pub fn rules(&self) -> &[&'static dyn Rule] {
        &self.rules
    }

    /// Keep only rules whose id or name is in `enabled`
    pub fn with_enabled(&self, enabled: &HashSet<String>) -> Self {
        Self {
            rules: self
                .rules
                .iter()
                .copied()
                .filter(|r| enabled.contains(r.id()) || enabled.contains(r.name()))
                .collect(),
        }
    }

    /// Get all rules with their descriptions (for --list-rules)
    pub fn list_rules(&self) -> Vec<(&'static str, &'static str, &'static str)> {
        self.rules
            .iter()
            .map(|r| (r.id(), r.name(), r.description()))
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
