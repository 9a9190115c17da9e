//! Course documents as stored in, and returned by, the index.
//!
//! A [`CourseDocument`] serializes with camelCase keys (`minAge`,
//! `nextSessionDate`, ...) and `type` for the course type, which is the shape
//! the catalog data files and the HTTP response use.
//!
//! # Examples
//!
//! ```
//! use coursefind::document::CourseDocument;
//!
//! let doc = CourseDocument::builder("c-1")
//!     .title("Python Basics")
//!     .category("Programming")
//!     .course_type("COURSE")
//!     .ages(8, 12)
//!     .price(49.0)
//!     .build();
//!
//! assert_eq!(doc.id(), "c-1");
//! assert_eq!(doc.suggest, vec!["Python Basics", "Python", "Basics", "Programming", "COURSE"]);
//! ```

use ahash::AHashSet;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A single catalog entry.
///
/// The id is assigned once (by the loader or by the index when missing) and
/// cannot be changed afterwards; everything else is plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    #[serde(default)]
    id: String,
    /// Course title, searched with fuzzy matching.
    #[serde(default)]
    pub title: String,
    /// Free-text description, searched with fuzzy matching.
    #[serde(default)]
    pub description: String,
    /// Exact-match category token.
    #[serde(default)]
    pub category: String,
    /// Exact-match type token (e.g. `ONE_TIME`, `COURSE`, `CLUB`).
    #[serde(default, rename = "type")]
    pub course_type: String,
    /// Youngest age the course is intended for.
    #[serde(default)]
    pub min_age: Option<i32>,
    /// Oldest age the course is intended for.
    #[serde(default)]
    pub max_age: Option<i32>,
    /// Price, never negative.
    #[serde(default)]
    pub price: Option<f64>,
    /// Start of the next session.
    #[serde(default)]
    pub next_session_date: Option<NaiveDateTime>,
    /// Completion inputs for prefix suggestions.
    #[serde(default)]
    pub suggest: Vec<String>,
}

impl CourseDocument {
    /// Create a builder for a document with the given id.
    pub fn builder<S: Into<String>>(id: S) -> CourseDocumentBuilder {
        CourseDocumentBuilder::new(id)
    }

    /// The document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether an id has been assigned.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Assign an id to a document that does not have one yet.
    ///
    /// Returns `false` and leaves the document untouched if an id is already set.
    pub(crate) fn assign_id<S: Into<String>>(&mut self, id: S) -> bool {
        if self.has_id() {
            return false;
        }
        self.id = id.into();
        true
    }

    /// Derive completion inputs from the title, its words, category and type.
    pub fn derive_suggest_inputs(&self) -> Vec<String> {
        let mut inputs = Vec::new();
        inputs.push(self.title.clone());
        inputs.extend(
            self.title
                .unicode_words()
                .filter(|word| word.chars().count() >= 2)
                .map(str::to_string),
        );
        inputs.push(self.category.clone());
        inputs.push(self.course_type.clone());
        normalize_suggest_inputs(inputs)
    }

    /// Normalize the stored completion inputs, deriving them when none are usable.
    pub fn ensure_suggest_inputs(&mut self) {
        let normalized = normalize_suggest_inputs(std::mem::take(&mut self.suggest));
        self.suggest = if normalized.is_empty() {
            self.derive_suggest_inputs()
        } else {
            normalized
        };
    }

    /// Whether the document can be reached through prefix suggestions.
    pub fn is_suggestable(&self) -> bool {
        self.suggest.iter().any(|input| !input.trim().is_empty())
    }
}

/// Trim inputs, drop blank ones, and remove case-insensitive duplicates.
///
/// The first spelling of each input wins, so `["Python", "python"]` keeps
/// `"Python"`.
pub fn normalize_suggest_inputs<I, S>(inputs: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = AHashSet::new();
    let mut normalized = Vec::new();
    for input in inputs {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

/// Builder for [`CourseDocument`].
#[derive(Debug, Clone)]
pub struct CourseDocumentBuilder {
    document: CourseDocument,
}

impl CourseDocumentBuilder {
    /// Create a new builder.
    pub fn new<S: Into<String>>(id: S) -> Self {
        CourseDocumentBuilder {
            document: CourseDocument {
                id: id.into(),
                title: String::new(),
                description: String::new(),
                category: String::new(),
                course_type: String::new(),
                min_age: None,
                max_age: None,
                price: None,
                next_session_date: None,
                suggest: Vec::new(),
            },
        }
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.document.title = title.into();
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.document.description = description.into();
        self
    }

    pub fn category<S: Into<String>>(mut self, category: S) -> Self {
        self.document.category = category.into();
        self
    }

    pub fn course_type<S: Into<String>>(mut self, course_type: S) -> Self {
        self.document.course_type = course_type.into();
        self
    }

    /// Set both age bounds.
    pub fn ages(mut self, min_age: i32, max_age: i32) -> Self {
        self.document.min_age = Some(min_age);
        self.document.max_age = Some(max_age);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.document.price = Some(price);
        self
    }

    pub fn next_session_date(mut self, date: NaiveDateTime) -> Self {
        self.document.next_session_date = Some(date);
        self
    }

    /// Set explicit completion inputs instead of deriving them.
    pub fn suggest<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document.suggest = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Build the document, normalizing (or deriving) its completion inputs.
    pub fn build(mut self) -> CourseDocument {
        self.document.ensure_suggest_inputs();
        self.document
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_deserialize_catalog_shape() {
        let json = r#"{
            "id": "42",
            "title": "Intro to Robotics",
            "description": "Build and program a small robot.",
            "category": "Science",
            "type": "COURSE",
            "minAge": 9,
            "maxAge": 13,
            "price": 120.5,
            "nextSessionDate": "2025-06-10T15:00:00"
        }"#;

        let doc: CourseDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id(), "42");
        assert_eq!(doc.course_type, "COURSE");
        assert_eq!(doc.min_age, Some(9));
        assert_eq!(doc.price, Some(120.5));
        let expected = NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        assert_eq!(doc.next_session_date, Some(expected));
        assert!(doc.suggest.is_empty());
    }

    #[test]
    fn test_serialize_uses_camel_case_and_type() {
        let doc = CourseDocument::builder("1")
            .title("Chess Club")
            .course_type("CLUB")
            .ages(7, 10)
            .build();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["type"], "CLUB");
        assert_eq!(value["minAge"], 7);
        assert_eq!(value["maxAge"], 10);
        assert!(value.get("course_type").is_none());
    }

    #[test]
    fn test_normalize_suggest_inputs() {
        let inputs = vec!["Python", " python ", "", "   ", "Basics", "PYTHON"];
        assert_eq!(normalize_suggest_inputs(inputs), vec!["Python", "Basics"]);
    }

    #[test]
    fn test_explicit_suggest_inputs_are_kept() {
        let doc = CourseDocument::builder("1")
            .title("Python Basics")
            .suggest(["Python", "python", "Coding"])
            .build();
        assert_eq!(doc.suggest, vec!["Python", "Coding"]);
        assert!(doc.is_suggestable());
    }

    #[test]
    fn test_derived_inputs_skip_single_characters() {
        let doc = CourseDocument::builder("1").title("A Day at the Zoo").build();
        assert_eq!(doc.suggest, vec!["A Day at the Zoo", "Day", "at", "the", "Zoo"]);
    }

    #[test]
    fn test_empty_document_is_not_suggestable() {
        let doc = CourseDocument::builder("1").build();
        assert!(doc.suggest.is_empty());
        assert!(!doc.is_suggestable());
    }

    #[test]
    fn test_assign_id_only_once() {
        let mut doc: CourseDocument = serde_json::from_str(r#"{"title": "Art"}"#).unwrap();
        assert!(!doc.has_id());
        assert!(doc.assign_id("generated"));
        assert!(!doc.assign_id("other"));
        assert_eq!(doc.id(), "generated");
    }
}
