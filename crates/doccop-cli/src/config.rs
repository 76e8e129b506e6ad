//! Configuration file support for doccop
//!
//! Loads `.doccop.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use doccop_rules::RuleRegistry;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

pub const CONFIG_FILE: &str = ".doccop.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// If set, only these rules will run (ids or names)
    pub enabled: Option<Vec<String>>,
    /// Rules to exclude (applied after enabled)
    pub disabled: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json", "diff" or "github"
    pub format: Option<String>,
}

impl Config {
    /// Load config from `.doccop.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Compute the ids of the rules to run
    ///
    /// Rules may be named by id (`SA1617`) or name (`void_return_value`).
    /// Unknown entries are dropped; callers validate them separately.
    pub fn effective_rules(&self, registry: &RuleRegistry, cli_rules: &[String]) -> HashSet<String> {
        let canonical = |rule: &String| registry.resolve(rule).map(|r| r.id().to_string());

        // CLI rules override config completely
        if !cli_rules.is_empty() {
            return cli_rules.iter().filter_map(canonical).collect();
        }

        let mut rules: HashSet<String> = match &self.rules.enabled {
            Some(enabled) => enabled.iter().filter_map(canonical).collect(),
            None => registry.all_ids().into_iter().map(String::from).collect(),
        };

        for disabled in self.rules.disabled.iter().filter_map(canonical) {
            rules.remove(&disabled);
        }

        rules
    }

    /// Rule entries in the config that match no registered rule
    pub fn unknown_rules(&self, registry: &RuleRegistry) -> Vec<String> {
        self.rules
            .enabled
            .iter()
            .flatten()
            .chain(self.rules.disabled.iter())
            .filter(|rule| registry.resolve(rule).is_none())
            .cloned()
            .collect()
    }
}

impl PathsConfig {
    /// Compile the exclude patterns, rejecting malformed ones
    pub fn excludes(&self) -> Result<ExcludeSet> {
        let patterns = self
            .exclude
            .iter()
            .map(|pattern| {
                let normalized = match pattern.strip_suffix('/') {
                    Some(dir) => format!("{}/**/*", dir),
                    None => pattern.clone(),
                };
                glob::Pattern::new(&normalized)
                    .with_context(|| format!("Invalid exclude pattern '{}'", pattern))
            })
            .collect::<Result<_>>()?;
        Ok(ExcludeSet { patterns })
    }
}

/// Compiled `[paths] exclude` patterns
///
/// A pattern matches a path when it matches any trailing run of the
/// path's components, so `*.Designer.cs` and `obj/` apply at any depth.
/// A trailing `/` selects everything below that directory.
#[derive(Debug, Default)]
pub struct ExcludeSet {
    patterns: Vec<glob::Pattern>,
}

impl ExcludeSet {
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..Default::default()
        };
        let components: Vec<_> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();

        (0..components.len()).any(|skip| {
            let tail: PathBuf = components[skip..].iter().collect();
            self.patterns
                .iter()
                .any(|pattern| pattern.matches_path_with(&tail, options))
        })
    }
}
