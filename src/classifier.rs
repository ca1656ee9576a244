//! Deterministic category assignment for scanned files.
//!
//! Classification is a pure decision over a filename, its normalized
//! extension, the rule set and the category registry:
//!
//! 1. The first rule whose substring occurs in the filename wins.
//! 2. Otherwise the first registry category claiming the extension wins.
//! 3. Otherwise the file falls back to the "Other" category.

use crate::category::{CategoryRegistry, FALLBACK_CATEGORY};
use crate::rules::RuleSet;
use crate::scanner::FileRecord;

/// Picks the category for a file.
///
/// `extension` must already be normalized the way the scanner produces
/// it: lowercase with a leading dot, or empty for files without one.
/// Rule targets are returned as-is even when no registry category with
/// that name exists.
///
/// # Examples
///
/// ```
/// use dirsift::category::CategoryRegistry;
/// use dirsift::classifier::classify;
/// use dirsift::rules::RuleSet;
///
/// let registry = CategoryRegistry::with_defaults();
/// let mut rules = RuleSet::new();
/// rules.add_rule("invoice", "Documents").unwrap();
///
/// assert_eq!(classify("invoice.png", ".png", &rules, &registry), "Documents");
/// assert_eq!(classify("photo.png", ".png", &rules, &registry), "Images");
/// assert_eq!(classify("notes", "", &rules, &registry), "Other");
/// ```
pub fn classify<'a>(
    name: &str,
    extension: &str,
    rules: &'a RuleSet,
    registry: &'a CategoryRegistry,
) -> &'a str {
    if let Some(rule) = rules.first_match(name) {
        return &rule.target;
    }
    if !extension.is_empty() {
        for entry in registry.entries() {
            if entry.extensions.iter().any(|e| e == extension) {
                return &entry.name;
            }
        }
    }
    FALLBACK_CATEGORY
}

/// Recomputes the category of every record in place.
///
/// Used after registry or rule edits so an already scanned listing
/// reflects the new configuration without touching the filesystem.
pub fn reclassify(records: &mut [FileRecord], rules: &RuleSet, registry: &CategoryRegistry) {
    for record in records {
        record.category = classify(&record.name, &record.extension, rules, registry).to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    fn record(name: &str, extension: &str) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            path: PathBuf::from(name),
            size_bytes: 0,
            extension: extension.to_string(),
            modified_at: Utc::now(),
            category: String::new(),
        }
    }

    #[test]
    fn test_rules_beat_extension_map() {
        let registry = CategoryRegistry::with_defaults();
        let mut rules = RuleSet::new();
        rules.add_rule("invoice", "Documents").unwrap();

        assert_eq!(classify("invoice.png", ".png", &rules, &registry), "Documents");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let registry = CategoryRegistry::with_defaults();
        let mut rules = RuleSet::new();
        rules.add_rule("tax", "Documents").unwrap();
        rules.add_rule("tax_photo", "Images").unwrap();

        assert_eq!(classify("tax_photo.png", ".png", &rules, &registry), "Documents");
    }

    #[test]
    fn test_earlier_category_claims_shared_extension() {
        let mut registry = CategoryRegistry::new();
        registry.add_extension("Documents", ".dat").unwrap();
        registry.add_extension("Archives", ".dat").unwrap();
        let rules = RuleSet::new();

        assert_eq!(classify("blob.dat", ".dat", &rules, &registry), "Documents");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        let registry = CategoryRegistry::with_defaults();
        let rules = RuleSet::new();

        assert_eq!(classify("blob.xyz", ".xyz", &rules, &registry), "Other");
    }

    #[test]
    fn test_missing_extension_falls_back() {
        let registry = CategoryRegistry::with_defaults();
        let rules = RuleSet::new();

        assert_eq!(classify("README", "", &rules, &registry), "Other");
    }

    #[test]
    fn test_rule_match_is_case_sensitive() {
        let registry = CategoryRegistry::with_defaults();
        let mut rules = RuleSet::new();
        rules.add_rule("Invoice", "Documents").unwrap();

        assert_eq!(classify("invoice.png", ".png", &rules, &registry), "Images");
    }

    #[test]
    fn test_rule_target_outside_registry_is_kept() {
        let registry = CategoryRegistry::with_defaults();
        let mut rules = RuleSet::new();
        rules.add_rule("backup", "Cold Storage").unwrap();

        assert_eq!(
            classify("backup_2023.tar", ".tar", &rules, &registry),
            "Cold Storage"
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let registry = CategoryRegistry::with_defaults();
        let mut rules = RuleSet::new();
        rules.add_rule("invoice", "Documents").unwrap();

        let first = classify("invoice_photo.png", ".png", &rules, &registry);
        let second = classify("invoice_photo.png", ".png", &rules, &registry);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reclassify_updates_records_in_place() {
        let registry = CategoryRegistry::with_defaults();
        let mut rules = RuleSet::new();
        let mut records = vec![record("invoice.png", ".png"), record("photo.png", ".png")];

        reclassify(&mut records, &rules, &registry);
        assert_eq!(records[0].category, "Images");
        assert_eq!(records[1].category, "Images");

        rules.add_rule("invoice", "Documents").unwrap();
        reclassify(&mut records, &rules, &registry);
        assert_eq!(records[0].category, "Documents");
        assert_eq!(records[1].category, "Images");
    }

    #[test]
    fn test_reclassify_twice_is_idempotent() {
        let registry = CategoryRegistry::with_defaults();
        let mut rules = RuleSet::new();
        rules.add_rule("invoice", "Documents").unwrap();
        let mut records = vec![record("invoice.png", ".png"), record("notes.txt", ".txt")];

        reclassify(&mut records, &rules, &registry);
        let snapshot: Vec<String> = records.iter().map(|r| r.category.clone()).collect();

        reclassify(&mut records, &rules, &registry);
        let again: Vec<String> = records.iter().map(|r| r.category.clone()).collect();
        assert_eq!(snapshot, again);
    }
}
