//! Ordered filename rules that override extension-based classification.
//!
//! A rule pairs a filename substring with a target category. Rules are
//! checked before the extension map, in the order they were added, and
//! the first match wins.

use serde::{Deserialize, Serialize};

/// Errors returned by rule edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Rules need a non-empty substring and a non-empty target category.
    InvalidRule,
    /// The rule index does not point at an existing rule.
    IndexOutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleError::InvalidRule => {
                write!(f, "Rules need both a filename substring and a target category")
            }
            RuleError::IndexOutOfRange { index, len } => {
                write!(f, "No rule at index {} ({} rules defined)", index, len)
            }
        }
    }
}

impl std::error::Error for RuleError {}

/// A single override: files whose name contains `contains` are classified
/// as `target`.
///
/// The substring match is case-sensitive and the target does not have to
/// be a registered category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub contains: String,
    pub target: String,
}

impl Rule {
    /// Returns true if `name` contains this rule's substring.
    pub fn matches(&self, name: &str) -> bool {
        name.contains(&self.contains)
    }
}

/// Ordered list of override rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from explicit rules, e.g. loaded from a settings
    /// file. Order is preserved; rules with a blank substring or target
    /// are rejected.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, RuleError> {
        let mut set = Self::new();
        for rule in rules {
            set.add_rule(&rule.contains, &rule.target)?;
        }
        Ok(set)
    }

    /// Appends a rule at the end of the list.
    ///
    /// Both parts are trimmed of surrounding whitespace before storage.
    pub fn add_rule(&mut self, contains: &str, target: &str) -> Result<(), RuleError> {
        let contains = contains.trim();
        let target = target.trim();
        if contains.is_empty() || target.is_empty() {
            return Err(RuleError::InvalidRule);
        }
        self.rules.push(Rule {
            contains: contains.to_string(),
            target: target.to_string(),
        });
        Ok(())
    }

    /// Removes and returns the rule at `index` (0-based). Later rules
    /// shift down one position.
    pub fn remove_rule_at(&mut self, index: usize) -> Result<Rule, RuleError> {
        if index >= self.rules.len() {
            return Err(RuleError::IndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        Ok(self.rules.remove(index))
    }

    /// Returns the first rule whose substring occurs in `name`.
    pub fn first_match(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(name))
    }

    /// Returns all rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rule_trims_parts() {
        let mut rules = RuleSet::new();
        rules.add_rule("  invoice ", " Documents  ").unwrap();
        assert_eq!(
            rules.rules(),
            &[Rule {
                contains: "invoice".to_string(),
                target: "Documents".to_string()
            }]
        );
    }

    #[test]
    fn test_add_rule_rejects_blank_parts() {
        let mut rules = RuleSet::new();
        assert_eq!(rules.add_rule("", "Documents"), Err(RuleError::InvalidRule));
        assert_eq!(rules.add_rule("invoice", "   "), Err(RuleError::InvalidRule));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_first_match_respects_order() {
        let mut rules = RuleSet::new();
        rules.add_rule("report", "Documents").unwrap();
        rules.add_rule("port", "Code").unwrap();

        let hit = rules.first_match("report_2024.txt").unwrap();
        assert_eq!(hit.target, "Documents");
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let mut rules = RuleSet::new();
        rules.add_rule("Invoice", "Documents").unwrap();

        assert!(rules.first_match("Invoice_march.pdf").is_some());
        assert!(rules.first_match("invoice_march.pdf").is_none());
    }

    #[test]
    fn test_remove_rule_shifts_later_rules() {
        let mut rules = RuleSet::new();
        rules.add_rule("a", "One").unwrap();
        rules.add_rule("b", "Two").unwrap();
        rules.add_rule("c", "Three").unwrap();

        let removed = rules.remove_rule_at(1).unwrap();
        assert_eq!(removed.target, "Two");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[1].target, "Three");
    }

    #[test]
    fn test_remove_rule_out_of_range() {
        let mut rules = RuleSet::new();
        rules.add_rule("a", "One").unwrap();

        let result = rules.remove_rule_at(1);
        assert_eq!(result, Err(RuleError::IndexOutOfRange { index: 1, len: 1 }));

        let result = RuleSet::new().remove_rule_at(0);
        assert_eq!(result, Err(RuleError::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_from_rules_preserves_order() {
        let rules = RuleSet::from_rules(vec![
            Rule {
                contains: "draft".to_string(),
                target: "Documents".to_string(),
            },
            Rule {
                contains: "draft_old".to_string(),
                target: "Archives".to_string(),
            },
        ])
        .unwrap();

        assert_eq!(rules.first_match("draft_old.txt").unwrap().target, "Documents");
    }

    #[test]
    fn test_from_rules_rejects_blank_rule() {
        let result = RuleSet::from_rules(vec![Rule {
            contains: String::new(),
            target: "Documents".to_string(),
        }]);
        assert_eq!(result, Err(RuleError::InvalidRule));
    }
}
