//! Type-ahead suggestions backed by the index completion suggester.

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashSet;
use log::{Level, debug, log_enabled, trace};
use serde_json::Value;

use crate::config::CourseSearchConfig;
use crate::error::Result;
use crate::index::{self, CompletionRequest, CourseIndex};
use crate::query::CourseField;
use crate::query::dsl::completion_body;

/// Produces ordered, de-duplicated suggestions for a typed prefix.
///
/// Prefix matching is done by the index; this layer short-circuits blank
/// input, removes duplicate strings and applies the cap. Backend rank order
/// is preserved.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    index: Arc<dyn CourseIndex>,
    index_name: String,
    cap: usize,
    timeout: Duration,
}

impl SuggestionEngine {
    pub fn new(index: Arc<dyn CourseIndex>, config: &CourseSearchConfig) -> Self {
        SuggestionEngine {
            index,
            index_name: config.index_name.clone(),
            cap: config.suggestion_cap,
            timeout: config.request_timeout(),
        }
    }

    /// Suggestions for `prefix`, at most the configured cap.
    pub fn suggest(&self, prefix: &str) -> Result<Vec<String>> {
        self.suggest_with_cap(prefix, self.cap)
    }

    /// The completion request body sent for `prefix`, or `None` when the
    /// prefix is blank and the index would not be called.
    pub fn request_body(&self, prefix: &str, cap: usize) -> Option<Value> {
        let prefix = prefix.trim_start();
        if prefix.trim().is_empty() || cap == 0 {
            return None;
        }
        Some(completion_body(prefix, cap))
    }

    /// Suggestions for `prefix`, at most `cap`.
    ///
    /// A blank prefix returns an empty list without contacting the index.
    pub fn suggest_with_cap(&self, prefix: &str, cap: usize) -> Result<Vec<String>> {
        let prefix = prefix.trim_start();
        if prefix.trim().is_empty() || cap == 0 {
            return Ok(Vec::new());
        }

        if log_enabled!(Level::Trace)
            && let Some(body) = self.request_body(prefix, cap)
        {
            trace!("Completion body: {body}");
        }

        let request = CompletionRequest {
            index_name: &self.index_name,
            field: CourseField::Suggest,
            prefix,
            max_options: cap,
            skip_duplicates: true,
            timeout: self.timeout,
        };
        let options = self
            .index
            .suggest_completion(&request)
            .map_err(|err| index::unavailable("completion", err))?;

        let mut seen = AHashSet::with_capacity(options.len());
        let mut suggestions = Vec::with_capacity(cap.min(options.len()));
        for option in options {
            if suggestions.len() == cap {
                break;
            }
            if seen.insert(option.text.clone()) {
                suggestions.push(option.text);
            }
        }

        debug!("Prefix '{prefix}' produced {} suggestions", suggestions.len());
        Ok(suggestions)
    }
}
