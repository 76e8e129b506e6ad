//! Run log for doccop
//!
//! Records the resolved configuration, the outcome of every file and the
//! final summary to a timestamped file, for checking what a run actually did.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<RunLogger>> = Mutex::new(None);

/// Logger for one doccop run
pub struct RunLogger {
    file: File,
}

impl RunLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self { file })
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }

    pub fn subsection(&mut self, title: &str) {
        let separator = "-".repeat(40);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
///
/// Without a path the log goes to the temp directory under a timestamped name.
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(Path::to_path_buf).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        std::env::temp_dir().join(format!("doccop-{}.log", timestamp))
    });

    let logger = RunLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

fn with_logger(f: impl FnOnce(&mut RunLogger)) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            f(logger);
        }
    }
}

/// Log a message to the global logger
pub fn log(message: &str) {
    with_logger(|logger| logger.log(message));
}

pub fn section(title: &str) {
    with_logger(|logger| logger.section(title));
}

pub fn subsection(title: &str) {
    with_logger(|logger| logger.subsection(title));
}

/// Log configuration loading
pub fn log_config_load(path: &Path) {
    section("CONFIGURATION LOADING");
    log(&format!("Loading config from: {}", path.display()));
}

/// Log the settings the run resolved to
pub fn log_run_settings(mode: &str, rules: &[String], format: &str, timeout_secs: Option<u64>) {
    section("RUN SETTINGS");
    log(&format!("Mode: {}", mode));
    log(&format!("Rules: {}", rules.join(", ")));
    log(&format!("Output format: {}", format));
    match timeout_secs {
        Some(secs) => log(&format!("Timeout: {}s", secs)),
        None => log("Timeout: none"),
    }
}

/// Log analysis start
pub fn log_analysis_start(files_count: usize, excluded_count: usize) {
    section("ANALYSIS START");
    log(&format!("Analyzing {} files", files_count));
    log(&format!("Excluded by config: {}", excluded_count));
}

/// Log the outcome of one file
pub fn log_file_result(path: &Path, outcome: &str) {
    log(&format!("{}: {}", path.display(), outcome));
}

/// Log a single diagnostic
pub fn log_diagnostic(path: &Path, line: usize, column: usize, rule: &str, message: &str) {
    log(&format!(
        "  {}:{}:{} [{}] {}",
        path.display(),
        line,
        column,
        rule,
        message
    ));
}

/// Log analysis complete
pub fn log_analysis_complete(files: usize, diagnostics: usize, errors: usize, cancelled: usize) {
    section("ANALYSIS COMPLETE");
    log(&format!("Files processed: {}", files));
    log(&format!("Diagnostics found: {}", diagnostics));
    log(&format!("Errors: {}", errors));
    log(&format!("Cancelled: {}", cancelled));
}
