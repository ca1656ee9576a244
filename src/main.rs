use clap::{Parser, Subcommand};
use dirsift::cli::{self, CategoryAction, Command, ListOptions, RuleAction};
use dirsift::output::OutputFormatter;
use dirsift::query::{DateFilter, SizeFilter, SortColumn};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "dirsift",
    version,
    about = "Scan a folder and browse it through classified, filterable views"
)]
struct Args {
    /// Path to a settings file (default: .dirsift.toml, then
    /// ~/.config/dirsift/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Scan a directory and print the classified listing
    List {
        /// Directory to scan (not recursed into)
        dir: PathBuf,

        /// Keep only this category ("all" keeps everything)
        #[arg(long = "type", value_name = "CATEGORY", default_value = "all")]
        type_filter: String,

        /// Size bucket: all, under-10, 10-100, over-100 (binary MB)
        #[arg(long, value_name = "BUCKET", default_value = "all", value_parser = cli::parse_size_filter)]
        size: SizeFilter,

        /// Modified bucket: all, today, week, month, older
        #[arg(long, value_name = "BUCKET", default_value = "all", value_parser = cli::parse_date_filter)]
        modified: DateFilter,

        /// Column to sort by: name, size, type, modified
        #[arg(long, value_name = "COLUMN", default_value = "name", value_parser = cli::parse_sort_column)]
        sort: SortColumn,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Inspect or edit categories and their extensions
    Category {
        #[command(subcommand)]
        action: CategoryCli,
    },

    /// Inspect or edit filename rules
    Rule {
        #[command(subcommand)]
        action: RuleCli,
    },
}

#[derive(Subcommand)]
enum CategoryCli {
    /// Print all categories and their extensions
    Show,
    /// Add a new category with an empty extension set
    Add { name: String },
    /// Remove a user-defined category (built-ins are protected)
    Remove { name: String },
    /// Attach an extension (e.g. ".webp") to a category
    AddExt { category: String, extension: String },
    /// Detach an extension from a category
    RemoveExt { category: String, extension: String },
}

#[derive(Subcommand)]
enum RuleCli {
    /// Print rules in evaluation order
    Show,
    /// Append a rule: files whose name contains SUBSTRING go to CATEGORY
    Add {
        substring: String,
        category: String,
    },
    /// Remove the rule with this number (as shown by 'rule show')
    Remove { number: usize },
}

fn main() {
    let args = Args::parse();

    let command = match args.command {
        CliCommand::List {
            dir,
            type_filter,
            size,
            modified,
            sort,
            desc,
            json,
        } => Command::List {
            dir,
            options: ListOptions {
                type_filter: cli::parse_type_filter(&type_filter),
                size,
                modified,
                sort,
                descending: desc,
                json,
            },
        },
        CliCommand::Category { action } => Command::Category(match action {
            CategoryCli::Show => CategoryAction::Show,
            CategoryCli::Add { name } => CategoryAction::Add { name },
            CategoryCli::Remove { name } => CategoryAction::Remove { name },
            CategoryCli::AddExt {
                category,
                extension,
            } => CategoryAction::AddExtension {
                category,
                extension,
            },
            CategoryCli::RemoveExt {
                category,
                extension,
            } => CategoryAction::RemoveExtension {
                category,
                extension,
            },
        }),
        CliCommand::Rule { action } => Command::Rule(match action {
            RuleCli::Show => RuleAction::Show,
            RuleCli::Add {
                substring,
                category,
            } => RuleAction::Add {
                contains: substring,
                target: category,
            },
            RuleCli::Remove { number } => RuleAction::Remove { number },
        }),
    };

    if let Err(e) = cli::run_cli_with_config(command, args.config.as_deref()) {
        OutputFormatter::error(&e);
        process::exit(1);
    }
}
