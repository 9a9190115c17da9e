//! The document index contract.
//!
//! Search and suggestion logic reach the index only through [`CourseIndex`]:
//! one call that executes a composite query with sort and pagination, and one
//! that resolves completion options for a prefix. Implementations must be
//! safe to share between concurrent requests and must honour the per-request
//! timeout carried by each request.
//!
//! [`memory::MemoryCourseIndex`] is an in-process implementation.

pub mod memory;

use std::fmt::Debug;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::document::CourseDocument;
use crate::error::{CourseSearchError, Result};
use crate::query::{CompositeQuery, CourseField, Page, SortCriterion};

pub use self::memory::MemoryCourseIndex;

/// A search call against the index.
#[derive(Debug, Clone)]
pub struct IndexSearchRequest<'a> {
    /// Name of the index to search.
    pub index_name: &'a str,
    /// The composite query.
    pub query: &'a CompositeQuery,
    /// Ordering, most significant first.
    pub sort: &'a [SortCriterion],
    /// Result window.
    pub page: Page,
    /// Deadline for the call.
    pub timeout: Duration,
}

/// A scored document returned by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    /// Relevance score (neutral when the query has no relevance clause).
    pub score: f32,
    /// The stored document.
    pub document: CourseDocument,
}

/// The hits of one page plus the total number of matching documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexHits {
    pub hits: Vec<IndexHit>,
    /// Total matches across all pages.
    pub total: u64,
}

/// A completion call against the index.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    /// Name of the index to query.
    pub index_name: &'a str,
    /// Field holding completion inputs.
    pub field: CourseField,
    /// Prefix typed so far.
    pub prefix: &'a str,
    /// Maximum number of options to return.
    pub max_options: usize,
    /// Whether the index should merge options with identical text.
    pub skip_duplicates: bool,
    /// Deadline for the call.
    pub timeout: Duration,
}

/// One completion returned by the index, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOption {
    pub text: String,
    pub score: f32,
}

impl CompletionOption {
    pub fn new<S: Into<String>>(text: S, score: f32) -> Self {
        CompletionOption {
            text: text.into(),
            score,
        }
    }
}

/// Trait for document index backends.
pub trait CourseIndex: Send + Sync + Debug {
    /// Execute a composite query and return one page of hits with the total.
    fn search(&self, request: &IndexSearchRequest<'_>) -> Result<IndexHits>;

    /// Return ranked completion options for a prefix.
    fn suggest_completion(&self, request: &CompletionRequest<'_>) -> Result<Vec<CompletionOption>>;
}

/// Report any backend failure as index unavailability.
///
/// Errors that already are [`CourseSearchError::IndexUnavailable`] pass
/// through unchanged; anything else a backend returns is wrapped.
pub(crate) fn unavailable(operation: &str, err: CourseSearchError) -> CourseSearchError {
    warn!("Index {operation} failed: {err}");
    match err {
        CourseSearchError::IndexUnavailable(_) => err,
        other => CourseSearchError::index_unavailable(format!("{operation} failed: {other}")),
    }
}
