//! Settings persistence: categories, rules and scan-time ignore rules.
//!
//! Settings are stored in TOML. Category order in the file is the
//! classification order, so round-tripping must not reorder entries.
//! Ignore rules support several matching strategies:
//! - Exact filename matching
//! - Glob pattern matching against the file name
//! - File extension matching
//! - Regex pattern matching against the file name
//! - Include (whitelist) globs that override every exclude rule
//!
//! # Settings File Format
//!
//! ```toml
//! [[categories]]
//! name = "Images"
//! extensions = [".png", ".jpg"]
//!
//! [[rules]]
//! contains = "invoice"
//! target = "Documents"
//!
//! [scan]
//! skip_hidden = false
//!
//! [scan.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp"]
//! extensions = ["bak"]
//! regex = []
//!
//! [scan.include]
//! patterns = []
//! ```

use crate::category::{CategoryEntry, CategoryRegistry};
use crate::rules::{Rule, RuleSet};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file looked for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".dirsift.toml";

/// Errors that can occur while loading, saving or compiling settings.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Settings file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax, or contents that fail validation.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading or writing settings.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Settings file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid settings: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}': expected *.ext or name?", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error accessing settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// On-disk settings, mirroring the TOML layout.
///
/// This is the raw, unvalidated form. [`Settings::compile`] turns it
/// into the runtime structures the scanner and classifier use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Categories in classification order.
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryEntry>,

    /// Override rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Scan-time ignore rules.
    #[serde(default)]
    pub scan: ScanRules,
}

fn default_categories() -> Vec<CategoryEntry> {
    CategoryRegistry::with_defaults().entries().to_vec()
}

/// Raw scan ignore rules as they appear in the settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanRules {
    /// Whether to skip hidden files (starting with "."). Defaults to
    /// false: hidden files are scanned like any other.
    #[serde(default)]
    pub skip_hidden: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for excluding files from a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Settings {
    /// Load settings from a file, with fallback to defaults.
    ///
    /// Attempts to load settings in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.dirsift.toml` in the current directory
    /// 3. Look for `~/.config/dirsift/config.toml` in the home directory
    /// 4. Fall back to default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file is explicitly provided but
    /// cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(home_config) = home_config_path()
            && home_config.exists()
        {
            return Self::load_from_file(&home_config);
        }

        Ok(Self::default())
    }

    /// Returns the path edits should be written back to: the explicit
    /// path if given, otherwise whichever file [`Settings::load`] would
    /// read, otherwise `.dirsift.toml` in the current directory.
    pub fn resolve_path(config_path: Option<&Path>) -> PathBuf {
        if let Some(path) = config_path {
            return path.to_path_buf();
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return local_config;
        }

        if let Some(home_config) = home_config_path()
            && home_config.exists()
        {
            return home_config;
        }

        local_config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Write settings to `path` as TOML, creating parent directories as
    /// needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Validate and compile settings into runtime structures.
    ///
    /// # Errors
    ///
    /// Returns an error if categories or rules fail validation, or if
    /// any glob or regex patterns are invalid.
    pub fn compile(self) -> Result<CompiledSettings, ConfigError> {
        let registry = CategoryRegistry::from_entries(self.categories)
            .map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        let rules =
            RuleSet::from_rules(self.rules).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        let filters = ScanFilters::new(self.scan)?;
        Ok(CompiledSettings {
            registry,
            rules,
            filters,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            rules: Vec::new(),
            scan: ScanRules::default(),
        }
    }
}

fn home_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("dirsift")
            .join("config.toml")
    })
}

/// Validated runtime form of [`Settings`].
pub struct CompiledSettings {
    pub registry: CategoryRegistry,
    pub rules: RuleSet,
    pub filters: ScanFilters,
}

/// Compiled ignore rules for efficient matching during a scan.
///
/// Glob and regex patterns are compiled once here so matching never
/// reparses them per file.
pub struct ScanFilters {
    skip_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl ScanFilters {
    fn new(rules: ScanRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let include_patterns = rules
            .include
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: rules.skip_hidden,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Filters that keep every file. Equivalent to compiling empty
    /// [`ScanRules`].
    pub fn allow_all() -> Self {
        Self {
            skip_hidden: false,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    /// Check if a file should be included in the scan (not excluded).
    ///
    /// Checks run in this order, with early termination:
    /// 1. Include patterns (whitelist) on the file name - if matched, always include
    /// 2. Hidden file filter - if hidden and skipping is on, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match on the file name - if matched, exclude
    /// 6. Regex pattern match on the file name - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.matches_include_patterns(&file_name) {
            return true;
        }

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.matches_exclude_patterns(&file_name) {
            return false;
        }

        if self.matches_exclude_regex(&file_name) {
            return false;
        }

        true
    }

    fn matches_include_patterns(&self, file_name: &str) -> bool {
        self.include_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
    }

    fn matches_exclude_patterns(&self, file_name: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
    }

    fn matches_exclude_regex(&self, file_name: &str) -> bool {
        self.exclude_regexes
            .iter()
            .any(|regex| regex.is_match(file_name))
    }
}

impl Default for ScanFilters {
    fn default() -> Self {
        Self::allow_all()
    }
}
