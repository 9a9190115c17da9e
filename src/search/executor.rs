//! Sends composite queries to the index and maps hits back to documents.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{Level, debug, log_enabled, trace};

use crate::config::CourseSearchConfig;
use crate::document::CourseDocument;
use crate::error::Result;
use crate::index::{self, CourseIndex, IndexSearchRequest};
use crate::query::dsl::search_body;
use crate::query::{CompositeQuery, Page, SortSpec};

/// One page of documents and the total number of matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Documents in result order.
    pub documents: Vec<CourseDocument>,
    /// Matches across all pages; may exceed `documents.len()`.
    pub total: u64,
}

/// Executes composite queries against a [`CourseIndex`].
///
/// The executor holds no per-request state and can be shared across threads.
/// Failures are not retried: any backend error is returned as
/// [`crate::error::CourseSearchError::IndexUnavailable`].
#[derive(Debug, Clone)]
pub struct SearchExecutor {
    index: Arc<dyn CourseIndex>,
    index_name: String,
    timeout: Duration,
}

impl SearchExecutor {
    /// Create a new executor.
    pub fn new(index: Arc<dyn CourseIndex>, config: &CourseSearchConfig) -> Self {
        SearchExecutor {
            index,
            index_name: config.index_name.clone(),
            timeout: config.request_timeout(),
        }
    }

    /// Run the query with the given sort and window.
    ///
    /// Hits keep the order the index returned: relevance order for a scored
    /// query without an explicit sort keyword, sort order otherwise.
    pub fn execute(&self, query: &CompositeQuery, sort: &SortSpec, page: Page) -> Result<SearchPage> {
        let sort = sort.criteria(query.has_relevance());
        debug!(
            "Searching '{}': {} sort={:?} from={} size={}",
            self.index_name,
            query.description(),
            sort.iter().map(ToString::to_string).collect::<Vec<_>>(),
            page.offset,
            page.limit
        );
        if log_enabled!(Level::Trace) {
            trace!("Request body: {}", search_body(query, &sort, page));
        }

        let start_time = Instant::now();
        let request = IndexSearchRequest {
            index_name: &self.index_name,
            query,
            sort: &sort,
            page,
            timeout: self.timeout,
        };
        let hits = self
            .index
            .search(&request)
            .map_err(|err| index::unavailable("search", err))?;

        debug!(
            "Search returned {} of {} matches in {:?}",
            hits.hits.len(),
            hits.total,
            start_time.elapsed()
        );

        Ok(SearchPage {
            documents: hits.hits.into_iter().map(|hit| hit.document).collect(),
            total: hits.total,
        })
    }
}
