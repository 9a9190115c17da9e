//! In-process implementation of the index contract.
//!
//! Documents live in memory behind a read/write lock, so any number of
//! searches can run while a loader replaces documents. Queries are evaluated
//! with a parallel scan: filters decide membership, the fuzzy multi-match
//! clause decides the score.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use coursefind::document::CourseDocument;
//! use coursefind::index::{CompletionRequest, CourseIndex, MemoryCourseIndex};
//! use coursefind::query::CourseField;
//!
//! let index = MemoryCourseIndex::with_documents(vec![
//!     CourseDocument::builder("1").title("Python Basics").build(),
//! ]);
//!
//! let options = index
//!     .suggest_completion(&CompletionRequest {
//!         index_name: "courses",
//!         field: CourseField::Suggest,
//!         prefix: "pyt",
//!         max_options: 10,
//!         skip_duplicates: true,
//!         timeout: Duration::from_secs(1),
//!     })
//!     .unwrap();
//! assert_eq!(options[0].text, "Python");
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use log::{debug, info};
use parking_lot::RwLock;
use rayon::prelude::*;
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

use crate::document::CourseDocument;
use crate::error::{CourseSearchError, Result};
use crate::index::{
    CompletionOption, CompletionRequest, CourseIndex, IndexHit, IndexHits, IndexSearchRequest,
};
use crate::query::{
    Clause, CompositeQuery, CourseField, Fuzziness, RangeValue, SortCriterion, SortField,
    SortOrder,
};
use crate::util::levenshtein::bounded_edit_distance;

/// Score contributed by an exact term match; each edit costs a fifth of it.
const EXACT_MATCH_SCORE: f32 = 1.0;
const EDIT_PENALTY: f32 = 0.2;

#[derive(Debug, Default)]
struct IndexState {
    documents: Vec<CourseDocument>,
    positions: AHashMap<String, usize>,
}

/// A thread-safe, in-memory course index.
#[derive(Debug, Default)]
pub struct MemoryCourseIndex {
    state: RwLock<IndexState>,
}

impl MemoryCourseIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index holding the given documents.
    pub fn with_documents(documents: Vec<CourseDocument>) -> Self {
        let index = Self::new();
        index.index_documents(documents);
        index
    }

    /// Create an index from a JSON array of documents.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let documents: Vec<CourseDocument> = serde_json::from_str(json)?;
        Ok(Self::with_documents(documents))
    }

    /// Create an index from a file containing a JSON array of documents.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Add or replace documents.
    ///
    /// Documents without an id get a generated one. A document whose id is
    /// already present replaces the stored version. Completion inputs are
    /// normalized, or derived when missing. Returns the number of documents
    /// written.
    pub fn index_documents(&self, documents: Vec<CourseDocument>) -> usize {
        let mut state = self.state.write();
        let mut written = 0;
        let mut unsuggestable = 0;

        for mut document in documents {
            if !document.has_id() {
                document.assign_id(Uuid::new_v4().to_string());
            }
            document.ensure_suggest_inputs();
            if !document.is_suggestable() {
                unsuggestable += 1;
            }

            match state.positions.get(document.id()).copied() {
                Some(position) => state.documents[position] = document,
                None => {
                    let position = state.documents.len();
                    state.positions.insert(document.id().to_string(), position);
                    state.documents.push(document);
                }
            }
            written += 1;
        }

        info!(
            "Indexed {} course documents ({} total)",
            written,
            state.documents.len()
        );
        if unsuggestable > 0 {
            debug!("{unsuggestable} indexed documents have no completion inputs");
        }
        written
    }

    /// Get a stored document by id.
    pub fn get(&self, id: &str) -> Option<CourseDocument> {
        let state = self.state.read();
        state
            .positions
            .get(id)
            .map(|position| state.documents[*position].clone())
    }

    /// Get the number of stored documents.
    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CourseIndex for MemoryCourseIndex {
    fn search(&self, request: &IndexSearchRequest<'_>) -> Result<IndexHits> {
        let deadline = Deadline::start(request.timeout);
        deadline.check("search")?;

        let state = self.state.read();
        let mut matched: Vec<(f32, &CourseDocument)> = state
            .documents
            .par_iter()
            .map(|document| {
                deadline.check("search")?;
                Ok(score_document(request.query, document).map(|score| (score, document)))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        matched.par_sort_by(|a, b| compare_hits(a, b, request.sort));

        let total = matched.len() as u64;
        let hits = matched
            .into_iter()
            .skip(request.page.offset)
            .take(request.page.limit)
            .map(|(score, document)| IndexHit {
                score,
                document: document.clone(),
            })
            .collect();

        debug!(
            "Memory index matched {} documents in {:?}",
            total,
            deadline.elapsed()
        );
        Ok(IndexHits { hits, total })
    }

    fn suggest_completion(&self, request: &CompletionRequest<'_>) -> Result<Vec<CompletionOption>> {
        if request.field != CourseField::Suggest {
            return Err(CourseSearchError::index_unavailable(format!(
                "field '{}' is not a completion field",
                request.field
            )));
        }

        let deadline = Deadline::start(request.timeout);
        deadline.check("completion")?;

        let prefix = request.prefix.trim_start().to_lowercase();
        if prefix.is_empty() || request.max_options == 0 {
            return Ok(Vec::new());
        }

        let state = self.state.read();
        let mut counts: AHashMap<&str, u32> = AHashMap::new();
        for document in &state.documents {
            deadline.check("completion")?;
            for input in &document.suggest {
                if input.to_lowercase().starts_with(&prefix) {
                    *counts.entry(input.as_str()).or_insert(0) += 1;
                }
            }
        }

        // Most documents first, then shorter completions, then lexical order
        let mut ranked: Vec<(&str, u32)> = counts.into_iter().collect();
        ranked.sort_by(|(text_a, count_a), (text_b, count_b)| {
            count_b
                .cmp(count_a)
                .then_with(|| text_a.chars().count().cmp(&text_b.chars().count()))
                .then_with(|| text_a.cmp(text_b))
        });

        let options = ranked
            .into_iter()
            .flat_map(|(text, count)| {
                let repeats = if request.skip_duplicates { 1 } else { count as usize };
                std::iter::repeat_n(CompletionOption::new(text, count as f32), repeats)
            })
            .take(request.max_options)
            .collect();
        Ok(options)
    }
}

/// Per-request deadline.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    started: Instant,
    expires: Option<Instant>,
    timeout: Duration,
}

impl Deadline {
    fn start(timeout: Duration) -> Self {
        let started = Instant::now();
        Deadline {
            started,
            expires: started.checked_add(timeout),
            timeout,
        }
    }

    fn check(&self, operation: &str) -> Result<()> {
        match self.expires {
            Some(expires) if Instant::now() >= expires => Err(CourseSearchError::timeout(format!(
                "{operation} exceeded {}ms",
                self.timeout.as_millis()
            ))),
            _ => Ok(()),
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Score a document, or `None` if it does not match.
fn score_document(query: &CompositeQuery, document: &CourseDocument) -> Option<f32> {
    if !query
        .filter()
        .iter()
        .all(|clause| clause_matches(clause, document))
    {
        return None;
    }
    if !query.has_relevance() {
        return Some(EXACT_MATCH_SCORE);
    }

    let mut total = 0.0;
    for clause in query.must() {
        let score = clause_score(clause, document);
        if score <= 0.0 {
            return None;
        }
        total += score;
    }
    Some(total)
}

fn clause_matches(clause: &Clause, document: &CourseDocument) -> bool {
    match clause {
        Clause::Term { field, value } => term_matches(document, *field, value),
        Clause::Range { field, .. } => {
            range_value(document, *field).is_some_and(|value| clause.range_contains(&value))
        }
        Clause::FuzzyMultiMatch { .. } => clause_score(clause, document) > 0.0,
    }
}

fn clause_score(clause: &Clause, document: &CourseDocument) -> f32 {
    match clause {
        Clause::FuzzyMultiMatch {
            fields,
            text,
            fuzziness,
        } => fuzzy_multi_match_score(document, fields, text, *fuzziness),
        other if clause_matches(other, document) => EXACT_MATCH_SCORE,
        _ => 0.0,
    }
}

fn term_matches(document: &CourseDocument, field: CourseField, value: &str) -> bool {
    match field {
        CourseField::Suggest => document.suggest.iter().any(|input| input == value),
        _ => match text_value(document, field) {
            Some(text) => text == value,
            None => range_value(document, field).is_some_and(|v| v.to_string() == value),
        },
    }
}

fn text_value(document: &CourseDocument, field: CourseField) -> Option<&str> {
    match field {
        CourseField::Title => Some(document.title.as_str()),
        CourseField::Description => Some(document.description.as_str()),
        CourseField::Category => Some(document.category.as_str()),
        CourseField::CourseType => Some(document.course_type.as_str()),
        _ => None,
    }
}

fn range_value(document: &CourseDocument, field: CourseField) -> Option<RangeValue> {
    match field {
        CourseField::MinAge => document.min_age.map(|age| RangeValue::Integer(i64::from(age))),
        CourseField::MaxAge => document.max_age.map(|age| RangeValue::Integer(i64::from(age))),
        CourseField::Price => document.price.map(RangeValue::Decimal),
        CourseField::NextSessionDate => document.next_session_date.map(RangeValue::DateTime),
        _ => None,
    }
}

fn analyze(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_lowercase).collect()
}

/// Best-field score: for each field, sum the similarity of every query term
/// to its closest token; the document keeps its best field.
fn fuzzy_multi_match_score(
    document: &CourseDocument,
    fields: &[CourseField],
    text: &str,
    fuzziness: Fuzziness,
) -> f32 {
    let terms = analyze(text);
    if terms.is_empty() {
        return 0.0;
    }

    fields
        .iter()
        .filter_map(|field| text_value(document, *field))
        .map(|field_text| {
            let tokens = analyze(field_text);
            terms
                .iter()
                .map(|term| term_similarity(term, &tokens, fuzziness.max_edits(term) as usize))
                .sum::<f32>()
        })
        .fold(0.0, f32::max)
}

fn term_similarity(term: &str, tokens: &[String], max_edits: usize) -> f32 {
    tokens
        .iter()
        .filter_map(|token| bounded_edit_distance(term, token, max_edits))
        .min()
        .map_or(0.0, |edits| {
            (EXACT_MATCH_SCORE - EDIT_PENALTY * edits as f32).max(0.0)
        })
}

fn compare_hits(
    a: &(f32, &CourseDocument),
    b: &(f32, &CourseDocument),
    sort: &[SortCriterion],
) -> Ordering {
    for criterion in sort {
        let ordering = match criterion.field {
            SortField::Score => compare_missing_last(Some(a.0), Some(b.0), criterion.order),
            SortField::Price => compare_missing_last(a.1.price, b.1.price, criterion.order),
            SortField::NextSessionDate => compare_missing_last(
                a.1.next_session_date,
                b.1.next_session_date,
                criterion.order,
            ),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.1.id().cmp(b.1.id())
}

/// Compare optional sort values; documents without a value always go last.
fn compare_missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::query::{ClauseSet, Page, QueryComposer};

    fn date(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn sample_index() -> MemoryCourseIndex {
        MemoryCourseIndex::with_documents(vec![
            CourseDocument::builder("1")
                .title("Robotics for Beginners")
                .description("Build a robot from scratch")
                .category("Science")
                .course_type("COURSE")
                .ages(8, 12)
                .price(80.0)
                .next_session_date(date(5))
                .build(),
            CourseDocument::builder("2")
                .title("Python Basics")
                .description("Learn to code with Python")
                .category("Programming")
                .course_type("COURSE")
                .ages(10, 14)
                .price(40.0)
                .next_session_date(date(2))
                .build(),
            CourseDocument::builder("3")
                .title("Painting Club")
                .description("Watercolor and acrylics")
                .category("Art")
                .course_type("CLUB")
                .ages(6, 9)
                .price(25.0)
                .next_session_date(date(9))
                .build(),
            CourseDocument::builder("4")
                .title("Mystery Workshop")
                .category("Art")
                .course_type("ONE_TIME")
                .build(),
        ])
    }

    fn run(
        index: &MemoryCourseIndex,
        query: &CompositeQuery,
        sort: &[SortCriterion],
        page: Page,
    ) -> IndexHits {
        index
            .search(&IndexSearchRequest {
                index_name: "courses",
                query,
                sort,
                page,
                timeout: Duration::from_secs(5),
            })
            .unwrap()
    }

    fn ids(hits: &IndexHits) -> Vec<&str> {
        hits.hits.iter().map(|hit| hit.document.id()).collect()
    }

    fn by_date() -> Vec<SortCriterion> {
        vec![SortCriterion::new(
            SortField::NextSessionDate,
            SortOrder::Ascending,
        )]
    }

    #[test]
    fn test_match_all_sorted_with_missing_last() {
        let index = sample_index();
        let hits = run(
            &index,
            &CompositeQuery::match_all(),
            &by_date(),
            Page { offset: 0, limit: 10 },
        );
        assert_eq!(hits.total, 4);
        assert_eq!(ids(&hits), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn test_term_filter_is_exact() {
        let index = sample_index();
        let query = QueryComposer::new().compose(ClauseSet {
            relevance: None,
            filters: vec![Clause::term(CourseField::Category, "Art")],
        });
        let hits = run(&index, &query, &by_date(), Page { offset: 0, limit: 10 });
        assert_eq!(ids(&hits), vec!["3", "4"]);

        let query = QueryComposer::new().compose(ClauseSet {
            relevance: None,
            filters: vec![Clause::term(CourseField::Category, "art")],
        });
        assert_eq!(run(&index, &query, &by_date(), Page { offset: 0, limit: 10 }).total, 0);
    }

    #[test]
    fn test_range_filter_excludes_missing_values() {
        let index = sample_index();
        let query = QueryComposer::new().compose(ClauseSet {
            relevance: None,
            filters: vec![Clause::range(
                CourseField::Price,
                None,
                Some(RangeValue::Decimal(40.0)),
            )],
        });
        let hits = run(&index, &query, &by_date(), Page { offset: 0, limit: 10 });
        assert_eq!(ids(&hits), vec!["2", "3"]);
    }

    #[test]
    fn test_fuzzy_match_tolerates_typos() {
        let index = sample_index();
        let query = QueryComposer::new().compose(ClauseSet {
            relevance: Some(Clause::fuzzy_multi_match(
                vec![CourseField::Title, CourseField::Description],
                "pyhton",
            )),
            filters: Vec::new(),
        });
        let sort = vec![SortCriterion::new(SortField::Score, SortOrder::Descending)];
        let hits = run(&index, &query, &sort, Page { offset: 0, limit: 10 });
        assert_eq!(ids(&hits), vec!["2"]);
        assert!(hits.hits[0].score > 0.0 && hits.hits[0].score < 1.0);
    }

    #[test]
    fn test_short_terms_need_exact_match() {
        let index = MemoryCourseIndex::with_documents(vec![
            CourseDocument::builder("1").title("AI for kids").build(),
            CourseDocument::builder("2").title("An art class").build(),
        ]);
        let query = QueryComposer::new().compose(ClauseSet {
            relevance: Some(Clause::fuzzy_multi_match(vec![CourseField::Title], "ai")),
            filters: Vec::new(),
        });
        let hits = run(&index, &query, &[], Page { offset: 0, limit: 10 });
        assert_eq!(ids(&hits), vec!["1"]);
    }

    #[test]
    fn test_better_matches_score_higher() {
        let index = MemoryCourseIndex::with_documents(vec![
            CourseDocument::builder("exact").title("Robot Lab").build(),
            CourseDocument::builder("typo").title("Robit Lab").build(),
        ]);
        let query = QueryComposer::new().compose(ClauseSet {
            relevance: Some(Clause::fuzzy_multi_match(vec![CourseField::Title], "robot")),
            filters: Vec::new(),
        });
        let sort = vec![SortCriterion::new(SortField::Score, SortOrder::Descending)];
        let hits = run(&index, &query, &sort, Page { offset: 0, limit: 10 });
        assert_eq!(ids(&hits), vec!["exact", "typo"]);
    }

    #[test]
    fn test_pagination_reports_full_total() {
        let index = sample_index();
        let hits = run(
            &index,
            &CompositeQuery::match_all(),
            &by_date(),
            Page { offset: 2, limit: 1 },
        );
        assert_eq!(hits.total, 4);
        assert_eq!(ids(&hits), vec!["3"]);

        let hits = run(
            &index,
            &CompositeQuery::match_all(),
            &by_date(),
            Page { offset: 10, limit: 5 },
        );
        assert_eq!(hits.total, 4);
        assert!(hits.hits.is_empty());
    }

    #[test]
    fn test_zero_timeout_is_index_unavailable() {
        let index = sample_index();
        let err = index
            .search(&IndexSearchRequest {
                index_name: "courses",
                query: &CompositeQuery::match_all(),
                sort: &[],
                page: Page { offset: 0, limit: 10 },
                timeout: Duration::ZERO,
            })
            .unwrap_err();
        assert!(err.is_index_unavailable());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_reindexing_replaces_by_id() {
        let index = sample_index();
        index.index_documents(vec![
            CourseDocument::builder("3").title("Sculpture Club").build(),
        ]);
        assert_eq!(index.len(), 4);
        assert_eq!(index.get("3").unwrap().title, "Sculpture Club");
    }

    #[test]
    fn test_missing_ids_are_generated() {
        let index = MemoryCourseIndex::from_json_str(
            r#"[{"title": "Guitar"}, {"id": "x", "title": "Drums"}]"#,
        )
        .unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.get("x").is_some());
    }

    fn complete(index: &MemoryCourseIndex, prefix: &str, skip_duplicates: bool) -> Vec<String> {
        index
            .suggest_completion(&CompletionRequest {
                index_name: "courses",
                field: CourseField::Suggest,
                prefix,
                max_options: 10,
                skip_duplicates,
                timeout: Duration::from_secs(5),
            })
            .unwrap()
            .into_iter()
            .map(|option| option.text)
            .collect()
    }

    #[test]
    fn test_completion_is_case_insensitive_and_ranked() {
        let index = MemoryCourseIndex::with_documents(vec![
            CourseDocument::builder("1").title("Python Basics").build(),
            CourseDocument::builder("2").title("Python Games").build(),
            CourseDocument::builder("3").title("Pottery").build(),
        ]);
        assert_eq!(
            complete(&index, "PYT", true),
            vec!["Python", "Python Games", "Python Basics"]
        );
        assert_eq!(
            complete(&index, "p", true),
            vec!["Python", "Pottery", "Python Games", "Python Basics"]
        );
    }

    #[test]
    fn test_completion_without_skip_duplicates_repeats() {
        let index = MemoryCourseIndex::with_documents(vec![
            CourseDocument::builder("1").title("Python Basics").build(),
            CourseDocument::builder("2").title("Python Games").build(),
        ]);
        let options = complete(&index, "python", false);
        assert_eq!(&options[..2], &["Python", "Python"]);
    }

    #[test]
    fn test_completion_rejects_non_completion_field() {
        let index = sample_index();
        let err = index
            .suggest_completion(&CompletionRequest {
                index_name: "courses",
                field: CourseField::Title,
                prefix: "py",
                max_options: 10,
                skip_duplicates: true,
                timeout: Duration::from_secs(5),
            })
            .unwrap_err();
        assert!(err.is_index_unavailable());
    }

    #[test]
    fn test_documents_without_inputs_are_stored_but_not_completed() {
        let index = MemoryCourseIndex::new();
        let written = index.index_documents(vec![
            CourseDocument::builder("blank").build(),
            CourseDocument::builder("1").title("Python Basics").build(),
        ]);
        assert_eq!(written, 2);
        assert_eq!(index.len(), 2);

        let blank = index.get("blank").unwrap();
        assert!(!blank.is_suggestable());
        assert!(index.get("1").unwrap().is_suggestable());
        assert_eq!(complete(&index, "py", true), vec!["Python", "Python Basics"]);
    }
}
