//! Command implementations for the coursefind CLI.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use log::info;
use serde_json::Value;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::CourseSearchConfig;
use crate::index::MemoryCourseIndex;
use crate::search::{CourseSearchService, SearchResponse};
use crate::suggest::SuggestionEngine;

/// Execute a CLI command.
pub fn execute_command(args: CourseFindArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Search(search_args) => {
            let response = run_search(search_args, &config)?;
            output_search_response(&response, &args)
        }
        Command::Suggest(suggest_args) => {
            let suggestions = run_suggest(suggest_args, &config)?;
            output_suggestions(&suggestions, &args)
        }
        Command::Explain(explain_args) => {
            let body = run_explain(explain_args, &config)?;
            output_request_body(&body, &args)
        }
    }
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CourseSearchConfig> {
    match path {
        Some(path) => CourseSearchConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(CourseSearchConfig::default()),
    }
}

/// Load a catalog file into an in-memory index.
pub fn load_index(path: &Path) -> anyhow::Result<Arc<MemoryCourseIndex>> {
    let index = MemoryCourseIndex::from_json_file(path)
        .with_context(|| format!("failed to load courses from {}", path.display()))?;
    info!("Loaded {} courses from {}", index.len(), path.display());
    Ok(Arc::new(index))
}

/// Run a search over a catalog file.
pub fn run_search(args: &SearchArgs, config: &CourseSearchConfig) -> anyhow::Result<SearchResponse> {
    let index = load_index(&args.data_file)?;
    let service = CourseSearchService::new(index, config);
    let response = service.search_params(args.criteria.to_params())?;
    Ok(response)
}

/// Suggest completions from a catalog file.
pub fn run_suggest(args: &SuggestArgs, config: &CourseSearchConfig) -> anyhow::Result<Vec<String>> {
    let index = load_index(&args.data_file)?;
    let engine = SuggestionEngine::new(index, config);
    let suggestions = match args.cap {
        Some(cap) => engine.suggest_with_cap(&args.prefix, cap)?,
        None => engine.suggest(&args.prefix)?,
    };
    Ok(suggestions)
}

/// Render the request body a search would send.
pub fn run_explain(args: &ExplainArgs, config: &CourseSearchConfig) -> anyhow::Result<Value> {
    let service = CourseSearchService::new(Arc::new(MemoryCourseIndex::new()), config);
    let criteria = args.criteria.to_params().into_criteria()?;
    let plan = service.plan(&criteria)?;
    Ok(plan.to_request_body())
}
