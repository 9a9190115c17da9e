//! Query clauses.
//!
//! A [`Clause`] is one immutable condition: an exact term, an inclusive range,
//! or a fuzzy multi-field text match. Only the fuzzy match contributes to the
//! relevance score; terms and ranges are pass/fail filters.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The document fields a clause can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseField {
    Title,
    Description,
    Category,
    CourseType,
    MinAge,
    MaxAge,
    Price,
    NextSessionDate,
    Suggest,
}

impl CourseField {
    /// The field name in the serialized document.
    pub fn name(&self) -> &'static str {
        match self {
            CourseField::Title => "title",
            CourseField::Description => "description",
            CourseField::Category => "category",
            CourseField::CourseType => "type",
            CourseField::MinAge => "minAge",
            CourseField::MaxAge => "maxAge",
            CourseField::Price => "price",
            CourseField::NextSessionDate => "nextSessionDate",
            CourseField::Suggest => "suggest",
        }
    }

    /// The field name the index matches against.
    ///
    /// Exact-match tokens live in the non-analyzed `keyword` sub-field.
    pub fn index_name(&self) -> &'static str {
        match self {
            CourseField::Category => "category.keyword",
            CourseField::CourseType => "type.keyword",
            other => other.name(),
        }
    }
}

impl fmt::Display for CourseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bound value of a range clause.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeValue {
    Integer(i64),
    Decimal(f64),
    DateTime(NaiveDateTime),
}

impl RangeValue {
    /// Compare two values of compatible kinds.
    ///
    /// Integers and decimals compare numerically; date-times only compare with
    /// date-times. Incompatible kinds return `None`.
    pub fn compare(&self, other: &RangeValue) -> Option<Ordering> {
        match (self, other) {
            (RangeValue::Integer(a), RangeValue::Integer(b)) => Some(a.cmp(b)),
            (RangeValue::DateTime(a), RangeValue::DateTime(b)) => Some(a.cmp(b)),
            (RangeValue::DateTime(_), _) | (_, RangeValue::DateTime(_)) => None,
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            RangeValue::Integer(value) => Some(*value as f64),
            RangeValue::Decimal(value) => Some(*value),
            RangeValue::DateTime(_) => None,
        }
    }
}

impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeValue::Integer(value) => write!(f, "{value}"),
            RangeValue::Decimal(value) => write!(f, "{value}"),
            RangeValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

/// Edit-distance tolerance for fuzzy matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fuzziness {
    /// Scale the tolerance with term length: 0 edits up to 2 chars, 1 edit for
    /// 3 to 5 chars, 2 edits beyond.
    Auto,
    /// A fixed number of edits for every term.
    Fixed(u32),
}

impl Fuzziness {
    /// Maximum edits allowed when matching `term`.
    pub fn max_edits(&self, term: &str) -> u32 {
        match self {
            Fuzziness::Auto => match term.chars().count() {
                0..=2 => 0,
                3..=5 => 1,
                _ => 2,
            },
            Fuzziness::Fixed(edits) => *edits,
        }
    }
}

/// One query condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
    /// Exact match of a token field.
    Term { field: CourseField, value: String },
    /// Inclusive range; an absent bound is unconstrained.
    Range {
        field: CourseField,
        lower: Option<RangeValue>,
        upper: Option<RangeValue>,
    },
    /// Fuzzy text match over several fields.
    FuzzyMultiMatch {
        fields: Vec<CourseField>,
        text: String,
        fuzziness: Fuzziness,
    },
}

impl Clause {
    /// Create an exact term clause.
    pub fn term<V: Into<String>>(field: CourseField, value: V) -> Self {
        Clause::Term {
            field,
            value: value.into(),
        }
    }

    /// Create an inclusive range clause.
    pub fn range(field: CourseField, lower: Option<RangeValue>, upper: Option<RangeValue>) -> Self {
        Clause::Range {
            field,
            lower,
            upper,
        }
    }

    /// Create a fuzzy multi-field match with automatic fuzziness.
    pub fn fuzzy_multi_match<T: Into<String>>(fields: Vec<CourseField>, text: T) -> Self {
        Clause::FuzzyMultiMatch {
            fields,
            text: text.into(),
            fuzziness: Fuzziness::Auto,
        }
    }

    /// Whether this clause contributes to the relevance score.
    pub fn is_scoring(&self) -> bool {
        matches!(self, Clause::FuzzyMultiMatch { .. })
    }

    /// Check whether a value satisfies a range clause's bounds.
    ///
    /// Returns `false` for non-range clauses and for values whose kind is not
    /// comparable with a bound.
    pub fn range_contains(&self, value: &RangeValue) -> bool {
        let Clause::Range { lower, upper, .. } = self else {
            return false;
        };
        let above_lower = match lower {
            Some(bound) => matches!(
                value.compare(bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            None => true,
        };
        let below_upper = match upper {
            Some(bound) => matches!(value.compare(bound), Some(Ordering::Less | Ordering::Equal)),
            None => true,
        };
        above_lower && below_upper
    }

    /// Get a human-readable description of this clause.
    pub fn description(&self) -> String {
        match self {
            Clause::Term { field, value } => format!("{}:{}", field.index_name(), value),
            Clause::Range {
                field,
                lower,
                upper,
            } => {
                let lower = lower.map_or_else(|| "*".to_string(), |v| v.to_string());
                let upper = upper.map_or_else(|| "*".to_string(), |v| v.to_string());
                format!("{}:[{} TO {}]", field.index_name(), lower, upper)
            }
            Clause::FuzzyMultiMatch {
                fields,
                text,
                fuzziness,
            } => {
                let fields: Vec<&str> = fields.iter().map(|f| f.index_name()).collect();
                let fuzziness = match fuzziness {
                    Fuzziness::Auto => "AUTO".to_string(),
                    Fuzziness::Fixed(edits) => edits.to_string(),
                };
                format!("({}):{}~{}", fields.join(","), text, fuzziness)
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
