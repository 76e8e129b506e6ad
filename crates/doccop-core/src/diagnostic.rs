//! Diagnostic types for rule results

use mago_span::Span;

use crate::line_index::LineIndex;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Error - must be fixed
    Error,
    /// Warning - should be reviewed
    Warning,
    /// Info - advisory only
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A single rule violation found during analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// The rule that found this issue (e.g., "SA1617")
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Source span of the offending text
    pub span: Span,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
    /// Optional link to the rule documentation
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic, resolving its position through the line index
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        span: Span,
        lines: &LineIndex<'_>,
    ) -> Self {
        let (line, column) = lines.line_column(span.start.offset as usize);
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            span,
            line,
            column,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        span: Span,
        lines: &LineIndex<'_>,
    ) -> Self {
        Self::new(rule_id, Severity::Warning, message, span, lines)
    }

    /// Add a documentation link
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }
}

/// Sort diagnostics by position, then rule id
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.start_offset()
            .cmp(&b.start_offset())
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
}
