//! Command line argument parsing for the coursefind CLI using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::criteria::SearchParams;

/// coursefind - search and autocomplete over a course catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "coursefind")]
#[command(about = "Search and autocomplete over a course catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CourseFindArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "COURSEFIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CourseFindArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search courses in a catalog file
    Search(SearchArgs),

    /// Suggest completions for a prefix
    Suggest(SuggestArgs),

    /// Print the index request a search would send, without running it
    Explain(ExplainArgs),
}

/// Search criteria flags, named after the HTTP query parameters.
///
/// Values stay strings here so that parsing and validation happen in one
/// place for every entry point.
#[derive(Args, Debug, Clone, Default)]
pub struct CriteriaArgs {
    /// Free-text query matched fuzzily against title and description
    #[arg(long = "q", value_name = "TEXT")]
    pub query: Option<String>,

    /// Youngest age the course must accept
    #[arg(long)]
    pub min_age: Option<String>,

    /// Oldest age the course must accept
    #[arg(long)]
    pub max_age: Option<String>,

    /// Exact category
    #[arg(long)]
    pub category: Option<String>,

    /// Exact course type
    #[arg(long = "type", value_name = "TYPE")]
    pub course_type: Option<String>,

    /// Lowest price
    #[arg(long)]
    pub min_price: Option<String>,

    /// Highest price
    #[arg(long)]
    pub max_price: Option<String>,

    /// Earliest next session (YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or RFC 3339)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Sort keyword: price:asc, price:desc or upcoming
    #[arg(long)]
    pub sort: Option<String>,

    /// Zero-based page number
    #[arg(long)]
    pub page: Option<String>,

    /// Page size
    #[arg(long)]
    pub size: Option<String>,
}

impl CriteriaArgs {
    /// Convert into transport parameters.
    pub fn to_params(&self) -> SearchParams {
        SearchParams {
            q: self.query.clone(),
            min_age: self.min_age.clone(),
            max_age: self.max_age.clone(),
            category: self.category.clone(),
            course_type: self.course_type.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            start_date: self.start_date.clone(),
            sort: self.sort.clone(),
            page: self.page.clone(),
            size: self.size.clone(),
        }
    }
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Catalog file: a JSON array of course documents
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    #[command(flatten)]
    pub criteria: CriteriaArgs,
}

/// Arguments for suggestions
#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    /// Catalog file: a JSON array of course documents
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Text typed so far
    #[arg(value_name = "PREFIX")]
    pub prefix: String,

    /// Maximum number of suggestions (default from configuration)
    #[arg(long)]
    pub cap: Option<usize>,
}

/// Arguments for explaining a search
#[derive(Parser, Debug, Clone)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command() {
        let args = CourseFindArgs::try_parse_from([
            "coursefind",
            "search",
            "courses.json",
            "--q",
            "robot",
            "--category",
            "Programming",
            "--min-age",
            "8",
            "--type",
            "CLUB",
            "--sort",
            "price:asc",
            "--size",
            "2",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.data_file, PathBuf::from("courses.json"));
            let params = search_args.criteria.to_params();
            assert_eq!(params.q.as_deref(), Some("robot"));
            assert_eq!(params.category.as_deref(), Some("Programming"));
            assert_eq!(params.min_age.as_deref(), Some("8"));
            assert_eq!(params.course_type.as_deref(), Some("CLUB"));
            assert_eq!(params.sort.as_deref(), Some("price:asc"));
            assert_eq!(params.size.as_deref(), Some("2"));
            assert_eq!(params.page, None);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_suggest_command() {
        let args = CourseFindArgs::try_parse_from([
            "coursefind",
            "suggest",
            "courses.json",
            "pyt",
            "--cap",
            "5",
        ])
        .unwrap();

        if let Command::Suggest(suggest_args) = args.command {
            assert_eq!(suggest_args.prefix, "pyt");
            assert_eq!(suggest_args.cap, Some(5));
        } else {
            panic!("Expected Suggest command");
        }
    }

    #[test]
    fn test_explain_command_takes_no_data_file() {
        let args =
            CourseFindArgs::try_parse_from(["coursefind", "explain", "--max-price", "20"]).unwrap();

        if let Command::Explain(explain_args) = args.command {
            assert_eq!(explain_args.criteria.max_price.as_deref(), Some("20"));
        } else {
            panic!("Expected Explain command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = CourseFindArgs::try_parse_from(["coursefind", "explain"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = CourseFindArgs::try_parse_from(["coursefind", "-vv", "explain"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = CourseFindArgs::try_parse_from(["coursefind", "explain", "-vvv"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = CourseFindArgs::try_parse_from(["coursefind", "--quiet", "explain"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            CourseFindArgs::try_parse_from(["coursefind", "--format", "json", "explain"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(!args.pretty);
    }
}
