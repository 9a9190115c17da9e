//! Conversion of normalized criteria into clauses.

use crate::criteria::NormalizedCriteria;
use crate::query::clause::{Clause, CourseField, RangeValue};

/// The clauses derived from one set of criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseSet {
    /// The scored text clause, if the request carries a query.
    pub relevance: Option<Clause>,
    /// Pass/fail conditions, all of which must hold.
    pub filters: Vec<Clause>,
}

impl ClauseSet {
    /// Whether no clause was produced at all.
    pub fn is_empty(&self) -> bool {
        self.relevance.is_none() && self.filters.is_empty()
    }
}

/// Builds clauses from normalized criteria.
#[derive(Debug, Clone)]
pub struct ClauseBuilder {
    text_fields: Vec<CourseField>,
}

impl Default for ClauseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseBuilder {
    /// Create a builder matching free text against title and description.
    pub fn new() -> Self {
        ClauseBuilder {
            text_fields: vec![CourseField::Title, CourseField::Description],
        }
    }

    /// Produce at most one relevance clause and any number of filter clauses.
    ///
    /// Age criteria select documents whose own age range overlaps the
    /// requested one: an upper bound restricts the document's `minAge`, a
    /// lower bound restricts its `maxAge`. Bounds that are absent produce no
    /// clause at all.
    pub fn build(&self, criteria: &NormalizedCriteria) -> ClauseSet {
        let relevance = criteria
            .query()
            .map(|text| Clause::fuzzy_multi_match(self.text_fields.clone(), text));

        let mut filters = Vec::new();

        if let Some(category) = criteria.category() {
            filters.push(Clause::term(CourseField::Category, category));
        }
        if let Some(course_type) = criteria.course_type() {
            filters.push(Clause::term(CourseField::CourseType, course_type));
        }

        if let Some(max_age) = criteria.max_age() {
            filters.push(Clause::range(
                CourseField::MinAge,
                None,
                Some(RangeValue::Integer(i64::from(max_age))),
            ));
        }
        if let Some(min_age) = criteria.min_age() {
            filters.push(Clause::range(
                CourseField::MaxAge,
                Some(RangeValue::Integer(i64::from(min_age))),
                None,
            ));
        }

        if criteria.min_price().is_some() || criteria.max_price().is_some() {
            filters.push(Clause::range(
                CourseField::Price,
                criteria.min_price().map(RangeValue::Decimal),
                criteria.max_price().map(RangeValue::Decimal),
            ));
        }

        if let Some(start_date) = criteria.start_date() {
            filters.push(Clause::range(
                CourseField::NextSessionDate,
                Some(RangeValue::DateTime(start_date)),
                None,
            ));
        }

        ClauseSet { relevance, filters }
    }
}
