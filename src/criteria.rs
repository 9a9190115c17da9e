//! Search criteria: transport binding, typed criteria, and normalization.
//!
//! Raw request parameters arrive as [`SearchParams`] (every value an optional
//! string, exactly as a query string delivers them). They are parsed into a
//! typed [`SearchCriteria`], which the [`CriteriaNormalizer`] validates and
//! defaults into an immutable [`NormalizedCriteria`].
//!
//! # Examples
//!
//! ```
//! use coursefind::config::CourseSearchConfig;
//! use coursefind::criteria::{CriteriaNormalizer, SearchCriteria};
//!
//! let normalizer = CriteriaNormalizer::new(&CourseSearchConfig::default());
//! let criteria = SearchCriteria::new().with_query("  robot ").with_category(" ");
//! let normalized = normalizer.normalize(&criteria).unwrap();
//!
//! assert_eq!(normalized.query(), Some("robot"));
//! assert_eq!(normalized.category(), None);
//! assert_eq!(normalized.page(), 0);
//! assert_eq!(normalized.size(), 10);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::CourseSearchConfig;
use crate::error::{CourseSearchError, Result};

/// Raw search parameters as bound from a query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub start_date: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

impl SearchParams {
    /// Parse the raw strings into typed criteria.
    ///
    /// Blank values are treated as absent. Values that do not parse are
    /// reported as [`CourseSearchError::InvalidCriteria`].
    pub fn into_criteria(self) -> Result<SearchCriteria> {
        Ok(SearchCriteria {
            query: self.q,
            min_age: parse_integer("minAge", self.min_age.as_deref())?,
            max_age: parse_integer("maxAge", self.max_age.as_deref())?,
            category: self.category,
            course_type: self.course_type,
            min_price: parse_decimal("minPrice", self.min_price.as_deref())?,
            max_price: parse_decimal("maxPrice", self.max_price.as_deref())?,
            start_date: parse_date_time("startDate", self.start_date.as_deref())?,
            sort: self.sort,
            page: parse_integer("page", self.page.as_deref())?,
            size: parse_integer("size", self.size.as_deref())?,
        })
    }
}

/// Typed search criteria for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Free-text query over title and description.
    pub query: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub category: Option<String>,
    pub course_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Earliest acceptable next session date (inclusive).
    pub start_date: Option<NaiveDateTime>,
    /// Sort keyword, e.g. `price:asc`, `price:desc`, `upcoming`.
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl SearchCriteria {
    /// Create empty criteria (matches the whole catalog).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query<S: Into<String>>(mut self, query: S) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_ages(mut self, min_age: Option<i32>, max_age: Option<i32>) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_course_type<S: Into<String>>(mut self, course_type: S) -> Self {
        self.course_type = Some(course_type.into());
        self
    }

    pub fn with_prices(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDateTime) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_sort<S: Into<String>>(mut self, sort: S) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_page(mut self, page: i64, size: i64) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }
}

/// Criteria after validation and defaulting. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCriteria {
    query: Option<String>,
    min_age: Option<i32>,
    max_age: Option<i32>,
    category: Option<String>,
    course_type: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    start_date: Option<NaiveDateTime>,
    sort: Option<String>,
    page: usize,
    size: usize,
}

impl NormalizedCriteria {
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn min_age(&self) -> Option<i32> {
        self.min_age
    }

    pub fn max_age(&self) -> Option<i32> {
        self.max_age
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn course_type(&self) -> Option<&str> {
        self.course_type.as_deref()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    pub fn start_date(&self) -> Option<NaiveDateTime> {
        self.start_date
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Zero-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Page size, always greater than zero.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Validates and defaults raw criteria.
#[derive(Debug, Clone)]
pub struct CriteriaNormalizer {
    default_page_size: usize,
    max_page_size: usize,
}

impl CriteriaNormalizer {
    /// Create a normalizer using the page size limits from the configuration.
    pub fn new(config: &CourseSearchConfig) -> Self {
        CriteriaNormalizer {
            default_page_size: config.default_page_size.max(1),
            max_page_size: config.max_page_size.max(config.default_page_size.max(1)),
        }
    }

    /// Normalize criteria for one request.
    ///
    /// Blank strings become absent, a missing page becomes 0, and a missing
    /// or non-positive size becomes the default size. Sizes above the maximum
    /// are clamped.
    pub fn normalize(&self, criteria: &SearchCriteria) -> Result<NormalizedCriteria> {
        if let Some(age) = criteria.min_age.filter(|age| *age < 0) {
            return Err(CourseSearchError::invalid_criteria(format!(
                "minAge must not be negative, got {age}"
            )));
        }
        if let Some(age) = criteria.max_age.filter(|age| *age < 0) {
            return Err(CourseSearchError::invalid_criteria(format!(
                "maxAge must not be negative, got {age}"
            )));
        }
        if let (Some(min), Some(max)) = (criteria.min_age, criteria.max_age) {
            if min > max {
                return Err(CourseSearchError::invalid_criteria(format!(
                    "minAge ({min}) must not exceed maxAge ({max})"
                )));
            }
        }

        for (name, price) in [("minPrice", criteria.min_price), ("maxPrice", criteria.max_price)] {
            if let Some(price) = price {
                if !price.is_finite() || price < 0.0 {
                    return Err(CourseSearchError::invalid_criteria(format!(
                        "{name} must be a non-negative number, got {price}"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (criteria.min_price, criteria.max_price) {
            if min > max {
                return Err(CourseSearchError::invalid_criteria(format!(
                    "minPrice ({min}) must not exceed maxPrice ({max})"
                )));
            }
        }

        let page = match criteria.page {
            None => 0,
            Some(page) if page < 0 => {
                return Err(CourseSearchError::invalid_criteria(format!(
                    "page must not be negative, got {page}"
                )));
            }
            Some(page) => usize::try_from(page).map_err(|_| {
                CourseSearchError::invalid_criteria(format!("page {page} is out of range"))
            })?,
        };

        let size = match criteria.size {
            Some(size) if size > 0 => {
                let size = usize::try_from(size).unwrap_or(usize::MAX);
                if size > self.max_page_size {
                    warn!(
                        "Requested page size {} exceeds maximum {}, clamping",
                        size, self.max_page_size
                    );
                    self.max_page_size
                } else {
                    size
                }
            }
            _ => self.default_page_size,
        };

        Ok(NormalizedCriteria {
            query: non_blank(criteria.query.as_deref()),
            min_age: criteria.min_age,
            max_age: criteria.max_age,
            category: non_blank(criteria.category.as_deref()),
            course_type: non_blank(criteria.course_type.as_deref()),
            min_price: criteria.min_price,
            max_price: criteria.max_price,
            start_date: criteria.start_date,
            sort: non_blank(criteria.sort.as_deref()),
            page,
            size,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_integer<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>> {
    match non_blank(value) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| {
            CourseSearchError::invalid_criteria(format!("{name} must be an integer, got '{value}'"))
        }),
    }
}

fn parse_decimal(name: &str, value: Option<&str>) -> Result<Option<f64>> {
    match non_blank(value) {
        None => Ok(None),
        Some(value) => match value.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(CourseSearchError::invalid_criteria(format!(
                "{name} must be a decimal number, got '{value}'"
            ))),
        },
    }
}

/// Parse an ISO-8601 local date-time, an RFC 3339 timestamp, or a bare date.
pub fn parse_date_time(name: &str, value: Option<&str>) -> Result<Option<NaiveDateTime>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    if let Ok(date_time) = value.parse::<NaiveDateTime>() {
        return Ok(Some(date_time));
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(&value) {
        return Ok(Some(date_time.naive_utc()));
    }
    if let Some(midnight) = value
        .parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(midnight));
    }

    Err(CourseSearchError::invalid_criteria(format!(
        "{name} must be an ISO-8601 date-time, got '{value}'"
    )))
}
