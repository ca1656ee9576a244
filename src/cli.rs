//! Command-line interface module for dirsift.
//!
//! This module handles all CLI-related functionality including:
//! - Listing orchestration (load settings, scan, query, print)
//! - Category and rule edits persisted back to the settings file
//! - Parsing of filter and sort tokens from the command line

use crate::category::CategoryRegistry;
use crate::config::Settings;
use crate::output::OutputFormatter;
use crate::query::{self, DateFilter, FilterSpec, SizeFilter, SortColumn, SortSpec, TypeFilter};
use crate::rules::RuleSet;
use crate::scanner;
use std::path::{Path, PathBuf};

/// Options for the listing command.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub type_filter: TypeFilter,
    pub size: SizeFilter,
    pub modified: DateFilter,
    pub sort: SortColumn,
    pub descending: bool,
    /// Print records as JSON instead of the table view.
    pub json: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            type_filter: TypeFilter::All,
            size: SizeFilter::All,
            modified: DateFilter::All,
            sort: SortColumn::Name,
            descending: false,
            json: false,
        }
    }
}

/// An edit or inspection of the category registry.
#[derive(Debug, Clone)]
pub enum CategoryAction {
    /// Print all categories and their extensions.
    Show,
    Add { name: String },
    Remove { name: String },
    AddExtension { category: String, extension: String },
    RemoveExtension { category: String, extension: String },
}

/// An edit or inspection of the rule list.
#[derive(Debug, Clone)]
pub enum RuleAction {
    /// Print rules in evaluation order.
    Show,
    Add { contains: String, target: String },
    /// Remove by the 1-based number `RuleAction::Show` displays.
    Remove { number: usize },
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone)]
pub enum Command {
    /// Scan a directory and print the classified, filtered listing.
    List { dir: PathBuf, options: ListOptions },
    /// Inspect or edit categories.
    Category(CategoryAction),
    /// Inspect or edit rules.
    Rule(RuleAction),
}

/// Runs the CLI application with the given command.
///
/// This is the main entry point for CLI operations, using the default
/// settings lookup chain.
///
/// # Examples
///
/// ```no_run
/// use dirsift::cli::{run_cli, Command, ListOptions};
/// use std::path::PathBuf;
///
/// let command = Command::List {
///     dir: PathBuf::from("/home/user/Downloads"),
///     options: ListOptions::default(),
/// };
/// match run_cli(command) {
///     Ok(()) => println!("Listing printed"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: Command) -> Result<(), String> {
    run_cli_with_config(command, None)
}

/// Runs the CLI application with an optional settings file path.
pub fn run_cli_with_config(command: Command, config_path: Option<&Path>) -> Result<(), String> {
    match command {
        Command::List { dir, options } => list_directory(&dir, &options, config_path),
        Command::Category(action) => edit_categories(&action, config_path),
        Command::Rule(action) => edit_rules(&action, config_path),
    }
}

/// Scans a directory and prints the filtered, sorted listing.
///
/// This function:
/// 1. Loads and compiles the settings (categories, rules, ignore rules)
/// 2. Scans the directory, classifying each file as it is read
/// 3. Sorts the full record set, then applies the filters
/// 4. Prints the table and summary, or JSON when requested
/// 5. Reports files the scan had to skip
fn list_directory(
    dir_path: &Path,
    options: &ListOptions,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let settings =
        Settings::load(config_path).map_err(|e| format!("Error loading settings: {}", e))?;
    let compiled = settings
        .compile()
        .map_err(|e| format!("Error compiling settings: {}", e))?;

    let report = if options.json {
        scanner::scan_dir(dir_path, &compiled.rules, &compiled.registry, &compiled.filters)
            .map_err(|e| e.to_string())?
    } else {
        OutputFormatter::info(&format!("Scanning contents of: {}", dir_path.display()));
        let spinner = OutputFormatter::create_scan_spinner();
        let progress: &dyn Fn(&Path) = &|_| spinner.inc(1);
        let report = scanner::scan_dir_with_progress(
            dir_path,
            &compiled.rules,
            &compiled.registry,
            &compiled.filters,
            Some(progress),
        )
        .map_err(|e| e.to_string())?;
        spinner.finish_and_clear();
        report
    };

    let filter = FilterSpec {
        type_filter: options.type_filter.clone(),
        size: options.size,
        modified: options.modified,
    };
    let sort = SortSpec {
        column: options.sort,
        descending: options.descending,
    };
    let view = query::query(&report.records, &filter, sort);

    if options.json {
        let json = serde_json::to_string_pretty(&view)
            .map_err(|e| format!("Error serializing listing: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    OutputFormatter::record_table(&view);
    OutputFormatter::listing_summary(&view);

    if !report.is_clean() {
        let file_word = if report.skipped_count() == 1 {
            "file"
        } else {
            "files"
        };
        OutputFormatter::warning(&format!(
            "{} {} could not be read:",
            report.skipped_count(),
            file_word
        ));
        for (path, reason) in &report.skipped {
            OutputFormatter::plain(&format!("  - {}: {}", path.display(), reason));
        }
    }

    Ok(())
}

/// Applies a category action, writing edits back to the settings file.
fn edit_categories(action: &CategoryAction, config_path: Option<&Path>) -> Result<(), String> {
    let mut settings =
        Settings::load(config_path).map_err(|e| format!("Error loading settings: {}", e))?;
    let compiled = settings
        .clone()
        .compile()
        .map_err(|e| format!("Error compiling settings: {}", e))?;
    let mut registry = compiled.registry;
    let rules = compiled.rules;

    match action {
        CategoryAction::Show => {
            show_categories(&registry);
            return Ok(());
        }
        CategoryAction::Add { name } => {
            registry.add_category(name).map_err(|e| e.to_string())?;
            let path = persist(&mut settings, &registry, &rules, config_path)?;
            OutputFormatter::success(&format!("Added category '{}'", name.trim()));
            OutputFormatter::info(&format!("Settings written to {}", path.display()));
        }
        CategoryAction::Remove { name } => {
            registry.remove_category(name).map_err(|e| e.to_string())?;
            let path = persist(&mut settings, &registry, &rules, config_path)?;
            OutputFormatter::success(&format!("Removed category '{}'", name));
            OutputFormatter::info(&format!("Settings written to {}", path.display()));
        }
        CategoryAction::AddExtension {
            category,
            extension,
        } => {
            registry
                .add_extension(category, extension)
                .map_err(|e| e.to_string())?;
            let path = persist(&mut settings, &registry, &rules, config_path)?;
            OutputFormatter::success(&format!(
                "Added {} to '{}'",
                extension.trim().to_lowercase(),
                category
            ));
            OutputFormatter::info(&format!("Settings written to {}", path.display()));
        }
        CategoryAction::RemoveExtension {
            category,
            extension,
        } => {
            registry
                .remove_extension(category, extension)
                .map_err(|e| e.to_string())?;
            let path = persist(&mut settings, &registry, &rules, config_path)?;
            OutputFormatter::success(&format!(
                "Removed {} from '{}'",
                extension.trim().to_lowercase(),
                category
            ));
            OutputFormatter::info(&format!("Settings written to {}", path.display()));
        }
    }

    Ok(())
}

/// Applies a rule action, writing edits back to the settings file.
fn edit_rules(action: &RuleAction, config_path: Option<&Path>) -> Result<(), String> {
    let mut settings =
        Settings::load(config_path).map_err(|e| format!("Error loading settings: {}", e))?;
    let compiled = settings
        .clone()
        .compile()
        .map_err(|e| format!("Error compiling settings: {}", e))?;
    let registry = compiled.registry;
    let mut rules = compiled.rules;

    match action {
        RuleAction::Show => {
            show_rules(&rules);
            return Ok(());
        }
        RuleAction::Add { contains, target } => {
            rules.add_rule(contains, target).map_err(|e| e.to_string())?;
            let path = persist(&mut settings, &registry, &rules, config_path)?;
            OutputFormatter::success(&format!(
                "Added rule: names containing '{}' → {}",
                contains.trim(),
                target.trim()
            ));
            OutputFormatter::info(&format!("Settings written to {}", path.display()));
        }
        RuleAction::Remove { number } => {
            let defined = rules.len();
            let index = number
                .checked_sub(1)
                .ok_or_else(|| no_such_rule(*number, defined))?;
            let removed = rules
                .remove_rule_at(index)
                .map_err(|_| no_such_rule(*number, defined))?;
            let path = persist(&mut settings, &registry, &rules, config_path)?;
            OutputFormatter::success(&format!(
                "Removed rule: names containing '{}' → {}",
                removed.contains, removed.target
            ));
            OutputFormatter::info(&format!("Settings written to {}", path.display()));
        }
    }

    Ok(())
}

fn no_such_rule(number: usize, defined: usize) -> String {
    let rule_word = if defined == 1 { "rule" } else { "rules" };
    format!("No rule number {} ({} {} defined)", number, defined, rule_word)
}

fn show_categories(registry: &CategoryRegistry) {
    OutputFormatter::header("CATEGORIES");
    let width = registry
        .entries()
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0);
    for entry in registry.entries() {
        let extensions = if entry.extensions.is_empty() {
            "(no extensions)".to_string()
        } else {
            entry.extensions.join(" ")
        };
        OutputFormatter::plain(&format!("{:<width$}  {}", entry.name, extensions));
    }
}

fn show_rules(rules: &RuleSet) {
    OutputFormatter::header("RULES");
    if rules.is_empty() {
        OutputFormatter::plain("No rules defined.");
        return;
    }
    for (number, rule) in rules.rules().iter().enumerate() {
        OutputFormatter::plain(&format!(
            "{:>2}) names containing '{}' → {}",
            number + 1,
            rule.contains,
            rule.target
        ));
    }
}

/// Writes the edited registry and rules back into `settings` and saves
/// it, returning the path written.
fn persist(
    settings: &mut Settings,
    registry: &CategoryRegistry,
    rules: &RuleSet,
    config_path: Option<&Path>,
) -> Result<PathBuf, String> {
    settings.categories = registry.entries().to_vec();
    settings.rules = rules.rules().to_vec();
    let path = Settings::resolve_path(config_path);
    settings
        .save(&path)
        .map_err(|e| format!("Error saving settings: {}", e))?;
    Ok(path)
}

/// Parses the `--type` token: "all" keeps every category, anything else
/// names one.
pub fn parse_type_filter(value: &str) -> TypeFilter {
    if value.eq_ignore_ascii_case("all") {
        TypeFilter::All
    } else {
        TypeFilter::Category(value.to_string())
    }
}

/// Parses the `--size` token.
pub fn parse_size_filter(value: &str) -> Result<SizeFilter, String> {
    match value.to_lowercase().as_str() {
        "all" => Ok(SizeFilter::All),
        "under-10" | "<10" => Ok(SizeFilter::Under10Mb),
        "10-100" => Ok(SizeFilter::From10To100Mb),
        "over-100" | ">100" => Ok(SizeFilter::Over100Mb),
        other => Err(format!(
            "unknown size bucket '{}' (expected all, under-10, 10-100 or over-100)",
            other
        )),
    }
}

/// Parses the `--modified` token.
pub fn parse_date_filter(value: &str) -> Result<DateFilter, String> {
    match value.to_lowercase().as_str() {
        "all" => Ok(DateFilter::All),
        "today" => Ok(DateFilter::Today),
        "week" | "last-week" => Ok(DateFilter::LastWeek),
        "month" | "last-month" => Ok(DateFilter::LastMonth),
        "older" => Ok(DateFilter::Older),
        other => Err(format!(
            "unknown date bucket '{}' (expected all, today, week, month or older)",
            other
        )),
    }
}

/// Parses the `--sort` token.
pub fn parse_sort_column(value: &str) -> Result<SortColumn, String> {
    match value.to_lowercase().as_str() {
        "name" => Ok(SortColumn::Name),
        "size" => Ok(SortColumn::Size),
        "type" => Ok(SortColumn::Type),
        "modified" => Ok(SortColumn::Modified),
        other => Err(format!(
            "unknown sort column '{}' (expected name, size, type or modified)",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_default_keeps_everything() {
        let options = ListOptions::default();
        assert_eq!(options.type_filter, TypeFilter::All);
        assert_eq!(options.size, SizeFilter::All);
        assert_eq!(options.modified, DateFilter::All);
        assert_eq!(options.sort, SortColumn::Name);
        assert!(!options.descending);
        assert!(!options.json);
    }

    #[test]
    fn test_parse_type_filter() {
        assert_eq!(parse_type_filter("all"), TypeFilter::All);
        assert_eq!(parse_type_filter("All"), TypeFilter::All);
        assert_eq!(
            parse_type_filter("Images"),
            TypeFilter::Category("Images".to_string())
        );
    }

    #[test]
    fn test_parse_size_filter_tokens() {
        assert_eq!(parse_size_filter("all"), Ok(SizeFilter::All));
        assert_eq!(parse_size_filter("under-10"), Ok(SizeFilter::Under10Mb));
        assert_eq!(parse_size_filter("<10"), Ok(SizeFilter::Under10Mb));
        assert_eq!(parse_size_filter("10-100"), Ok(SizeFilter::From10To100Mb));
        assert_eq!(parse_size_filter(">100"), Ok(SizeFilter::Over100Mb));
        assert!(parse_size_filter("big").is_err());
    }

    #[test]
    fn test_parse_date_filter_tokens() {
        assert_eq!(parse_date_filter("today"), Ok(DateFilter::Today));
        assert_eq!(parse_date_filter("week"), Ok(DateFilter::LastWeek));
        assert_eq!(parse_date_filter("last-month"), Ok(DateFilter::LastMonth));
        assert_eq!(parse_date_filter("older"), Ok(DateFilter::Older));
        assert!(parse_date_filter("yesterday").is_err());
    }

    #[test]
    fn test_parse_sort_column_tokens() {
        assert_eq!(parse_sort_column("name"), Ok(SortColumn::Name));
        assert_eq!(parse_sort_column("SIZE"), Ok(SortColumn::Size));
        assert_eq!(parse_sort_column("type"), Ok(SortColumn::Type));
        assert_eq!(parse_sort_column("modified"), Ok(SortColumn::Modified));
        assert!(parse_sort_column("path").is_err());
    }
}
