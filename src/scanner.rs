//! Non-recursive directory scanning into classified file records.
//!
//! A scan reads the immediate children of one directory, keeps the
//! regular files, and captures name, size, modification time and
//! category for each. Unreadable files never abort the scan; they are
//! reported alongside the results.

use crate::category::CategoryRegistry;
use crate::classifier;
use crate::config::ScanFilters;
use crate::rules::RuleSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that abort a scan before any entry is read.
#[derive(Debug)]
pub enum ScanError {
    /// The scan path does not exist or is not a directory.
    DirectoryNotFound { path: PathBuf },
    /// The directory exists but could not be read.
    PermissionDenied { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::DirectoryNotFound { path } => {
                write!(f, "Directory not found: {}", path.display())
            }
            ScanError::PermissionDenied { path, source } => {
                write!(f, "Cannot read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// One scanned file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Final path component, used for display and rule matching.
    pub name: String,
    /// Scan path joined with the file name.
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Lowercase extension with leading dot, or empty when the name has
    /// no extension.
    pub extension: String,
    pub modified_at: DateTime<Utc>,
    /// Category assigned at scan time.
    pub category: String,
}

/// Result of scanning one directory.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Records for every regular file that could be read, in directory
    /// iteration order.
    pub records: Vec<FileRecord>,
    /// Files that could not be read, with the reason each was skipped.
    pub skipped: Vec<(PathBuf, String)>,
}

impl ScanReport {
    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Returns true if every readable entry made it into the records.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size_bytes).sum()
    }
}

/// Scans the immediate children of `path`.
///
/// Subdirectories are not descended into. Symlinks are followed: a link
/// to a regular file is recorded, anything else is skipped. Each record
/// is classified through `rules` and `registry` as it is read.
///
/// Fails with [`ScanError::DirectoryNotFound`] when `path` is missing or
/// not a directory, and [`ScanError::PermissionDenied`] when the
/// directory itself cannot be opened. Per-file read failures do not fail
/// the scan; they land in [`ScanReport::skipped`].
pub fn scan_dir(
    path: &Path,
    rules: &RuleSet,
    registry: &CategoryRegistry,
    filters: &ScanFilters,
) -> Result<ScanReport, ScanError> {
    scan_dir_with_progress(path, rules, registry, filters, None)
}

/// Same as [`scan_dir`], invoking `progress` once per directory entry.
///
/// The callback fires for every entry examined, including ones that end
/// up filtered out or skipped, so it can drive a progress indicator.
pub fn scan_dir_with_progress(
    path: &Path,
    rules: &RuleSet,
    registry: &CategoryRegistry,
    filters: &ScanFilters,
    progress: Option<&dyn Fn(&Path)>,
) -> Result<ScanReport, ScanError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::DirectoryNotFound {
            path: path.to_path_buf(),
        },
        _ => ScanError::PermissionDenied {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::DirectoryNotFound {
            path: path.to_path_buf(),
        });
    }

    let entries = fs::read_dir(path).map_err(|e| ScanError::PermissionDenied {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut report = ScanReport::default();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.skipped.push((path.to_path_buf(), e.to_string()));
                continue;
            }
        };
        let entry_path = entry.path();
        if let Some(callback) = progress {
            callback(&entry_path);
        }
        if !filters.should_include(&entry_path) {
            continue;
        }

        // fs::metadata follows symlinks, so links to regular files are
        // scanned like the files themselves.
        let metadata = match fs::metadata(&entry_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                if entry_path.is_symlink() {
                    // Dangling symlink, not a regular file.
                    continue;
                }
                report.skipped.push((entry_path, e.to_string()));
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let modified_at = match metadata.modified() {
            Ok(time) => DateTime::<Utc>::from(time),
            Err(e) => {
                report.skipped.push((entry_path, e.to_string()));
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let extension = extension_of(&entry_path);
        let category = classifier::classify(&name, &extension, rules, registry).to_string();

        report.records.push(FileRecord {
            name,
            path: entry_path,
            size_bytes: metadata.len(),
            extension,
            modified_at,
            category,
        });
    }

    Ok(report)
}

/// Extracts the extension the way classification expects it: lowercase,
/// with its leading dot. Names without an extension, including dotfiles
/// like ".env" and trailing-dot names like "notes.", yield an empty
/// string.
fn extension_of(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => String::new(),
    }
}
