//! dirsift - browse a folder through classified, filterable file views
//!
//! This library provides utilities for scanning a directory into typed
//! file records, classifying them through an editable category registry
//! and filename rules, filtering and sorting the results, and persisting
//! the configuration as a TOML settings file.

pub mod category;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod output;
pub mod query;
pub mod rules;
pub mod scanner;

pub use category::{
    BUILTIN_CATEGORIES, CategoryEntry, CategoryRegistry, FALLBACK_CATEGORY, RegistryError,
};
pub use classifier::{classify, reclassify};
pub use config::{CompiledSettings, ConfigError, ScanFilters, ScanRules, Settings};
pub use query::{
    DateFilter, FilterSpec, SizeFilter, SortColumn, SortSpec, SortToggle, TypeFilter, query,
    query_at,
};
pub use rules::{Rule, RuleError, RuleSet};
pub use scanner::{FileRecord, ScanError, ScanReport, scan_dir, scan_dir_with_progress};

pub use cli::{Command, run_cli};
