//! Output formatting for doccop
//!
//! Supports text (colored terminal), JSON, unified diff and GitHub
//! Actions annotation output.

use anyhow::Result;
use colored::*;
use doccop_core::Diagnostic;
use serde::Serialize;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
    Github,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "diff" => Some(OutputFormat::Diff),
            "github" => Some(OutputFormat::Github),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Diff => "diff",
            OutputFormat::Github => "github",
        }
    }
}

/// Information about a single diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticInfo {
    pub rule: String,
    pub severity: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl From<&Diagnostic> for DiagnosticInfo {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            rule: diagnostic.rule_id.clone(),
            severity: diagnostic.severity.to_string(),
            line: diagnostic.line,
            column: diagnostic.column,
            message: diagnostic.message.clone(),
            help: diagnostic.help.clone(),
        }
    }
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticInfo>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fixed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(path: &Path, diagnostics: Vec<DiagnosticInfo>, fixed: bool) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics,
            fixed,
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: Vec::new(),
            fixed: false,
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_diagnostics: usize,
    pub total_diagnostics: usize,
    pub files_fixed: usize,
    pub errors: usize,
    pub cancelled: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report diagnostics found in check mode, with the fix that would apply
    pub fn report_check(
        &mut self,
        path: &Path,
        diagnostics: Vec<DiagnosticInfo>,
        old_source: &str,
        new_source: &str,
    ) {
        self.summary.files_processed += 1;

        if diagnostics.is_empty() {
            self.report_clean(path);
            return;
        }

        self.summary.files_with_diagnostics += 1;
        self.summary.total_diagnostics += diagnostics.len();

        match self.format {
            OutputFormat::Text => {
                println!("{}", path.display().to_string().bold());
                for diagnostic in &diagnostics {
                    print_diagnostic(diagnostic);
                }
                if self.verbose {
                    println!();
                    print_diff(old_source, new_source);
                }
                println!();
            }
            OutputFormat::Diff => {
                print_unified_diff(path, old_source, new_source);
            }
            OutputFormat::Github => {
                for diagnostic in &diagnostics {
                    println!("{}", github_annotation(path, diagnostic));
                }
            }
            OutputFormat::Json => {
                // JSON output is handled in finish()
            }
        }

        self.results.push(FileResult::success(path, diagnostics, false));
    }

    /// Report a file after applying fixes
    pub fn report_fix(&mut self, path: &Path, diagnostics: Vec<DiagnosticInfo>) {
        self.summary.files_processed += 1;

        if diagnostics.is_empty() {
            self.report_clean(path);
            return;
        }

        self.summary.files_with_diagnostics += 1;
        self.summary.total_diagnostics += diagnostics.len();
        self.summary.files_fixed += 1;

        if self.format == OutputFormat::Text {
            println!("{}", path.display().to_string().bold());
            println!("  {} Fixed {} diagnostic(s)", "OK".green(), diagnostics.len());
            println!();
        }

        self.results.push(FileResult::success(path, diagnostics, true));
    }

    /// Report a file with nothing to report
    pub fn report_skipped(&mut self, path: &Path) {
        self.summary.files_processed += 1;
        self.report_clean(path);
    }

    fn report_clean(&mut self, path: &Path) {
        if self.verbose && self.format == OutputFormat::Text {
            println!("{}: No issues found", path.display());
        }
        self.results.push(FileResult::success(path, vec![], false));
    }

    /// Report a file whose analysis was abandoned
    pub fn report_cancelled(&mut self, path: &Path) {
        self.summary.files_processed += 1;
        self.summary.cancelled += 1;

        if self.format == OutputFormat::Text {
            eprintln!("{}: {} - analysis cancelled", "Warning".yellow(), path.display());
        }

        self.results
            .push(FileResult::error(path, "Analysis cancelled".to_string()));
    }

    /// Report an error processing a file
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.errors += 1;

        match self.format {
            OutputFormat::Text => {
                eprintln!("{}: {} - {}", "Warning".yellow(), path.display(), error);
            }
            OutputFormat::Github => {
                println!("::error file={}::{}", path.display(), escape_github(error));
            }
            _ => {}
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Print final summary/output
    pub fn finish(self, check_mode: bool) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!();
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", self.summary.files_processed);
                println!(
                    "  Files with diagnostics: {}",
                    self.summary.files_with_diagnostics
                );
                println!("  Total diagnostics: {}", self.summary.total_diagnostics);
                if self.summary.files_fixed > 0 {
                    println!("  Files fixed: {}", self.summary.files_fixed);
                }
                if self.summary.errors > 0 {
                    println!("  Errors: {}", self.summary.errors);
                }
                if self.summary.cancelled > 0 {
                    println!("  Cancelled: {}", self.summary.cancelled);
                }

                if check_mode && self.summary.total_diagnostics > 0 {
                    println!();
                    println!("{}", "Run with --fix to apply fixes".yellow());
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    summary: self.summary,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Diff | OutputFormat::Github => {
                // Per-file output only, so the stream stays machine readable
            }
        }
        Ok(())
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

fn print_diagnostic(diagnostic: &DiagnosticInfo) {
    let severity = match diagnostic.severity.as_str() {
        "error" => diagnostic.severity.red(),
        "warning" => diagnostic.severity.yellow(),
        _ => diagnostic.severity.blue(),
    };
    println!(
        "  {}:{} {} [{}] {}",
        diagnostic.line,
        diagnostic.column,
        severity,
        diagnostic.rule.cyan(),
        diagnostic.message
    );
}

/// Format a GitHub Actions workflow command for a diagnostic
fn github_annotation(path: &Path, diagnostic: &DiagnosticInfo) -> String {
    let level = match diagnostic.severity.as_str() {
        "error" => "error",
        "warning" => "warning",
        _ => "notice",
    };
    format!(
        "::{} file={},line={},col={},title={}::{}",
        level,
        path.display(),
        diagnostic.line,
        diagnostic.column,
        diagnostic.rule,
        escape_github(&diagnostic.message)
    )
}

fn escape_github(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Print a colored diff between old and new content
fn print_diff(old: &str, new: &str) {
    for diff_result in diff::lines(old, new) {
        match diff_result {
            diff::Result::Left(l) => {
                println!("  {}", format!("- {}", l).red());
            }
            diff::Result::Right(r) => {
                println!("  {}", format!("+ {}", r).green());
            }
            diff::Result::Both(_, _) => {}
        }
    }
}

/// Print unified diff format (standard diff -u compatible)
fn print_unified_diff(path: &Path, old: &str, new: &str) {
    print!("{}", unified_diff(path, old, new));
}

fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(old, new);
    let path_str = path.display().to_string();

    let mut out = format!("--- a/{}\n+++ b/{}\n", path_str, path_str);
    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        out.push_str(&format!("{}\n", hunk.header()));
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            out.push_str(&format!("{}{}", sign, change));
            if change.missing_newline() {
                out.push('\n');
            }
        }
    }
    out
}
