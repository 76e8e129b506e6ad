//! doccop CLI - C# documentation comment checker
//!
//! Available rules:
//! - SA1617 (void_return_value): `<returns>` must not document a member
//!   without a return value

mod config;
mod logging;
mod output;
mod process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use config::Config;
use doccop_core::Cancellation;
use doccop_rules::RuleRegistry;
use output::{DiagnosticInfo, OutputFormat, Reporter};
use process::{process_file, write_file};

#[derive(Parser)]
#[command(name = "doccop")]
#[command(version)]
#[command(about = "Checks and fixes C# documentation comments")]
struct Cli {
    /// Files or directories to process
    #[arg(required_unless_present = "list_rules")]
    paths: Vec<PathBuf>,

    /// Report diagnostics without changing files (default mode)
    #[arg(long, conflicts_with = "fix")]
    check: bool,

    /// Apply fixes to files
    #[arg(long, conflicts_with = "check")]
    fix: bool,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Rules to run by id or name (can be specified multiple times). Overrides config file.
    #[arg(long, short = 'r', value_name = "RULE")]
    rule: Vec<String>,

    /// Output format: text, json, diff, github
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Path to config file (default: auto-detect .doccop.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Abandon analysis still running after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write a run log (to a temp file when no path is given)
    #[arg(long, value_name = "PATH")]
    log_file: Option<Option<PathBuf>>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Constructed once and shared by every file
    let registry = RuleRegistry::new();

    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        for (id, name, description) in registry.list_rules() {
            println!("  {} ({}) - {}", id.green(), name, description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(log_path) = &cli.log_file {
        let path = logging::init_logger(log_path.as_deref())
            .context("Failed to open log file")?;
        if cli.verbose {
            eprintln!("{}: {}", "Logging to".bold(), path.display());
        }
    }

    // Load config file
    let (config, config_path) = if cli.no_config {
        (Config::default(), None)
    } else if let Some(config_path) = &cli.config {
        (Config::load_path(config_path)?, Some(config_path.clone()))
    } else {
        match Config::load()? {
            Some((cfg, path)) => (cfg, Some(path)),
            None => (Config::default(), None),
        }
    };
    if let Some(path) = &config_path {
        logging::log_config_load(path);
    }

    // --json, then --format, then the config file
    let output_format = if cli.json {
        OutputFormat::Json
    } else {
        let requested = cli
            .format
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("text");
        OutputFormat::from_str(requested).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid output format '{}'. Valid options: text, json, diff, github",
                requested
            )
        })?
    };
    let text_output = output_format == OutputFormat::Text;

    if cli.verbose && text_output {
        if let Some(path) = &config_path {
            println!("{}: {}", "Using config".bold(), path.display());
        }
    }

    // Validate rule names from CLI
    for rule in &cli.rule {
        if registry.resolve(rule).is_none() {
            eprintln!(
                "{}: Unknown rule '{}'. Use --list-rules to see available rules.",
                "Error".red(),
                rule
            );
            return Ok(ExitCode::from(1));
        }
    }
    for rule in config.unknown_rules(&registry) {
        eprintln!("{}: Unknown rule '{}' in config", "Warning".yellow(), rule);
    }

    let enabled_rules = config.effective_rules(&registry, &cli.rule);
    if enabled_rules.is_empty() {
        eprintln!("{}: No rules enabled", "Error".red());
        return Ok(ExitCode::from(1));
    }
    let registry = registry.with_enabled(&enabled_rules);

    // Determine mode: fix or check (check is default)
    let fix_mode = cli.fix;
    let check_mode = !fix_mode;

    let mut rule_ids: Vec<String> = enabled_rules.into_iter().collect();
    rule_ids.sort();
    let mode = if fix_mode { "fix" } else { "check" };
    logging::log_run_settings(mode, &rule_ids, output_format.as_str(), cli.timeout);

    if cli.verbose && text_output {
        println!("{}: {}", "Mode".bold(), mode);
        println!("{}: {}", "Rules".bold(), rule_ids.join(", "));
        println!();
    }

    let excludes = config.paths.excludes()?;

    // Collect all file paths first
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();
    let mut excluded = 0;

    for path in &cli.paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "cs"))
            {
                let file_path = entry.path();
                if excludes.is_excluded(file_path) {
                    excluded += 1;
                } else {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }
    file_paths.sort();
    file_paths.dedup();

    logging::log_analysis_start(file_paths.len(), excluded);

    let cancellation = Cancellation::new();
    if let Some(secs) = cli.timeout {
        let token = cancellation.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            token.cancel();
        });
    }

    // Process files in parallel; results keep the sorted path order
    let results: Vec<FileOutcome> = file_paths
        .par_iter()
        .map(|path| process_file_to_outcome(path, &registry, &cancellation))
        .collect();

    let mut reporter = Reporter::new(output_format, cli.verbose);

    for path in &missing_paths {
        if text_output {
            eprintln!(
                "{}: Path does not exist: {}",
                "Warning".yellow(),
                path.display()
            );
        }
        logging::log_file_result(path, "missing");
    }

    logging::subsection("FILE RESULTS");
    for (outcome, path) in results.into_iter().zip(file_paths.iter()) {
        report_outcome(path, outcome, fix_mode, &mut reporter)?;
    }

    let summary = reporter.summary().clone();
    logging::log_analysis_complete(
        summary.files_processed,
        summary.total_diagnostics,
        summary.errors,
        summary.cancelled,
    );

    let exit_code = if summary.errors > 0 || summary.cancelled > 0 {
        ExitCode::from(1)
    } else if check_mode && summary.files_with_diagnostics > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(check_mode)?;

    Ok(exit_code)
}

/// Outcome of processing a single file (for parallel processing)
enum FileOutcome {
    /// Nothing to report
    Clean,
    /// Diagnostics found, with the fully fixed text
    HasDiagnostics {
        diagnostics: Vec<DiagnosticInfo>,
        old_source: String,
        new_source: String,
    },
    /// Analysis abandoned after cancellation
    Cancelled,
    Error(String),
}

/// Process a file and return its outcome (no output, suitable for parallel execution)
fn process_file_to_outcome(
    path: &PathBuf,
    registry: &RuleRegistry,
    cancellation: &Cancellation,
) -> FileOutcome {
    match process_file(path, registry, cancellation) {
        Ok(Some(result)) => {
            if result.diagnostics.is_empty() {
                FileOutcome::Clean
            } else {
                FileOutcome::HasDiagnostics {
                    diagnostics: result.diagnostics,
                    new_source: result.new_source.unwrap_or_else(|| result.old_source.clone()),
                    old_source: result.old_source,
                }
            }
        }
        Ok(None) => FileOutcome::Cancelled,
        Err(e) => FileOutcome::Error(format!("{:#}", e)),
    }
}

/// Report a file outcome and optionally apply fixes
fn report_outcome(
    path: &PathBuf,
    outcome: FileOutcome,
    fix_mode: bool,
    reporter: &mut Reporter,
) -> Result<()> {
    match outcome {
        FileOutcome::Clean => {
            logging::log_file_result(path, "clean");
            reporter.report_skipped(path);
        }
        FileOutcome::HasDiagnostics {
            diagnostics,
            old_source,
            new_source,
        } => {
            logging::log_file_result(path, &format!("{} diagnostic(s)", diagnostics.len()));
            for d in &diagnostics {
                logging::log_diagnostic(path, d.line, d.column, &d.rule, &d.message);
            }

            if fix_mode {
                if new_source != old_source {
                    write_file(path, &new_source)?;
                    logging::log_file_result(path, "fixed");
                }
                reporter.report_fix(path, diagnostics);
            } else {
                reporter.report_check(path, diagnostics, &old_source, &new_source);
            }
        }
        FileOutcome::Cancelled => {
            logging::log_file_result(path, "cancelled");
            reporter.report_cancelled(path);
        }
        FileOutcome::Error(msg) => {
            logging::log_file_result(path, &format!("error: {}", msg));
            reporter.report_error(path, &msg);
        }
    }
    Ok(())
}
