//! Composite boolean query combining scored and non-scored clauses.

use crate::query::builder::ClauseSet;
use crate::query::clause::Clause;

/// One boolean query: scored `must` clauses and non-scored `filter` clauses.
///
/// Filters only decide membership; the score comes from `must` alone. With
/// no `must` clause every document that passes the filters matches with a
/// neutral score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeQuery {
    must: Vec<Clause>,
    filter: Vec<Clause>,
}

impl CompositeQuery {
    /// Create a query matching every document.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Scored clauses, in order.
    pub fn must(&self) -> &[Clause] {
        &self.must
    }

    /// Filter clauses. All of them must hold.
    pub fn filter(&self) -> &[Clause] {
        &self.filter
    }

    /// Whether a relevance clause takes part in scoring.
    pub fn has_relevance(&self) -> bool {
        !self.must.is_empty()
    }

    /// Whether the query matches every document.
    pub fn is_match_all(&self) -> bool {
        self.must.is_empty() && self.filter.is_empty()
    }

    /// Get a human-readable description of this query.
    pub fn description(&self) -> String {
        let mut parts = Vec::new();
        if self.must.is_empty() {
            parts.push("+*:*".to_string());
        }
        parts.extend(self.must.iter().map(|clause| format!("+{clause}")));
        parts.extend(self.filter.iter().map(|clause| format!("#{clause}")));
        parts.join(" ")
    }
}

/// Combines clause sets into composite queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryComposer;

impl QueryComposer {
    pub fn new() -> Self {
        QueryComposer
    }

    /// Put the relevance clause under `must` and every filter under `filter`.
    ///
    /// Scoring clauses that show up among the filters are still treated as
    /// filters, so they never influence the score.
    pub fn compose(&self, clauses: ClauseSet) -> CompositeQuery {
        CompositeQuery {
            must: clauses.relevance.into_iter().collect(),
            filter: clauses.filters,
        }
    }
}
