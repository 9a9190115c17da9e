//! Rendering of queries into the JSON request bodies a document index accepts.
//!
//! The shapes follow the Elasticsearch query DSL: a `bool` query with `must`
//! and `filter` arrays, `multi_match` with `"fuzziness": "AUTO"`, `term` on
//! keyword sub-fields, and `range` with inclusive `gte`/`lte` bounds.
//!
//! # Examples
//!
//! ```
//! use coursefind::query::dsl::completion_body;
//!
//! let body = completion_body("pyt", 10);
//! assert_eq!(body["suggest"]["course-suggest"]["prefix"], "pyt");
//! assert_eq!(body["suggest"]["course-suggest"]["completion"]["size"], 10);
//! ```

use serde_json::{Map, Value, json};

use crate::query::clause::{Clause, CourseField, Fuzziness, RangeValue};
use crate::query::composite::CompositeQuery;
use crate::query::paginate::Page;
use crate::query::sort::SortCriterion;

/// Name of the completion suggester in request and response bodies.
pub const SUGGESTER_NAME: &str = "course-suggest";

/// Render a single clause.
pub fn clause_to_dsl(clause: &Clause) -> Value {
    match clause {
        Clause::Term { field, value } => json!({
            "term": { field.index_name(): { "value": value } }
        }),
        Clause::Range {
            field,
            lower,
            upper,
        } => {
            let mut bounds = Map::new();
            if let Some(lower) = lower {
                bounds.insert("gte".to_string(), range_value_to_dsl(lower));
            }
            if let Some(upper) = upper {
                bounds.insert("lte".to_string(), range_value_to_dsl(upper));
            }
            json!({ "range": { field.index_name(): Value::Object(bounds) } })
        }
        Clause::FuzzyMultiMatch {
            fields,
            text,
            fuzziness,
        } => {
            let fields: Vec<&str> = fields.iter().map(CourseField::index_name).collect();
            let fuzziness = match fuzziness {
                Fuzziness::Auto => json!("AUTO"),
                Fuzziness::Fixed(edits) => json!(edits),
            };
            json!({
                "multi_match": {
                    "query": text,
                    "fields": fields,
                    "fuzziness": fuzziness
                }
            })
        }
    }
}

fn range_value_to_dsl(value: &RangeValue) -> Value {
    match value {
        RangeValue::Integer(value) => json!(value),
        RangeValue::Decimal(value) => json!(value),
        RangeValue::DateTime(_) => json!(value.to_string()),
    }
}

/// Render the boolean query. An empty `must` becomes `match_all`.
pub fn query_to_dsl(query: &CompositeQuery) -> Value {
    let must: Vec<Value> = if query.has_relevance() {
        query.must().iter().map(clause_to_dsl).collect()
    } else {
        vec![json!({ "match_all": {} })]
    };
    let filter: Vec<Value> = query.filter().iter().map(clause_to_dsl).collect();

    json!({ "bool": { "must": must, "filter": filter } })
}

/// Render a sort specification.
pub fn sort_to_dsl(criteria: &[SortCriterion]) -> Value {
    Value::Array(
        criteria
            .iter()
            .map(|criterion| {
                json!({ criterion.field.index_name(): { "order": criterion.order.as_str() } })
            })
            .collect(),
    )
}

/// Render a complete search request body.
pub fn search_body(query: &CompositeQuery, sort: &[SortCriterion], page: Page) -> Value {
    json!({
        "query": query_to_dsl(query),
        "sort": sort_to_dsl(sort),
        "from": page.offset,
        "size": page.limit,
        "track_total_hits": true
    })
}

/// Render a completion-suggester request body.
pub fn completion_body(prefix: &str, size: usize) -> Value {
    json!({
        "suggest": {
            SUGGESTER_NAME: {
                "prefix": prefix,
                "completion": {
                    "field": CourseField::Suggest.index_name(),
                    "skip_duplicates": true,
                    "size": size
                }
            }
        }
    })
}
