//! The search entry point.
//!
//! Every call runs the same stateless pipeline:
//! normalize criteria, build clauses, compose the boolean query, resolve the
//! sort, paginate, and execute against the index.

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CourseSearchConfig;
use crate::criteria::{CriteriaNormalizer, SearchCriteria, SearchParams};
use crate::document::CourseDocument;
use crate::error::Result;
use crate::index::CourseIndex;
use crate::query::dsl::search_body;
use crate::query::{
    ClauseBuilder, CompositeQuery, Page, Paginator, QueryComposer, SortResolver, SortSpec,
};
use crate::search::executor::SearchExecutor;

/// The result of a search: total matches plus the requested page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub courses: Vec<CourseDocument>,
}

/// A fully resolved query ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub query: CompositeQuery,
    pub sort: SortSpec,
    pub page: Page,
}

impl SearchPlan {
    /// Render the request body the index would receive.
    pub fn to_request_body(&self) -> Value {
        search_body(
            &self.query,
            &self.sort.criteria(self.query.has_relevance()),
            self.page,
        )
    }
}

/// Course search over a [`CourseIndex`].
#[derive(Debug, Clone)]
pub struct CourseSearchService {
    normalizer: CriteriaNormalizer,
    clause_builder: ClauseBuilder,
    composer: QueryComposer,
    sort_resolver: SortResolver,
    paginator: Paginator,
    executor: SearchExecutor,
}

impl CourseSearchService {
    pub fn new(index: Arc<dyn CourseIndex>, config: &CourseSearchConfig) -> Self {
        CourseSearchService {
            normalizer: CriteriaNormalizer::new(config),
            clause_builder: ClauseBuilder::new(),
            composer: QueryComposer::new(),
            sort_resolver: SortResolver::new(),
            paginator: Paginator::new(config.default_page_size),
            executor: SearchExecutor::new(index, config),
        }
    }

    /// Resolve criteria into a query, sort and window without executing.
    pub fn plan(&self, criteria: &SearchCriteria) -> Result<SearchPlan> {
        let normalized = self.normalizer.normalize(criteria)?;
        let clauses = self.clause_builder.build(&normalized);
        let query = self.composer.compose(clauses);
        let sort = self.sort_resolver.resolve(normalized.sort());
        let page = self.paginator.paginate(normalized.page(), normalized.size())?;

        Ok(SearchPlan { query, sort, page })
    }

    /// Search for courses matching the criteria.
    ///
    /// Zero matches is a successful outcome with `total == 0`.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<SearchResponse> {
        let plan = self.plan(criteria)?;
        let page = self.executor.execute(&plan.query, &plan.sort, plan.page)?;
        debug!(
            "Returning {} courses (total {})",
            page.documents.len(),
            page.total
        );

        Ok(SearchResponse {
            total: page.total,
            courses: page.documents,
        })
    }

    /// Search using raw transport parameters.
    pub fn search_params(&self, params: SearchParams) -> Result<SearchResponse> {
        let criteria = params.into_criteria()?;
        self.search(&criteria)
    }
}
