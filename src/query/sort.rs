//! Sort keyword resolution.
//!
//! | keyword | field | order |
//! |---|---|---|
//! | `price:asc` | price | ascending |
//! | `price:desc` | price | descending |
//! | `upcoming`, absent, or unrecognized | nextSessionDate | ascending |
//!
//! Keywords are matched case-insensitively, and the colon-less spellings
//! `priceasc` / `pricedesc` are accepted as well.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

/// A recognized sort keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    Upcoming,
}

impl SortKey {
    /// Parse a sort keyword. Unrecognized keywords yield `None`.
    pub fn parse(keyword: &str) -> Option<SortKey> {
        match keyword.trim().to_lowercase().as_str() {
            "price:asc" | "priceasc" => Some(SortKey::PriceAsc),
            "price:desc" | "pricedesc" => Some(SortKey::PriceDesc),
            "upcoming" => Some(SortKey::Upcoming),
            _ => None,
        }
    }
}

/// Fields results can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Price,
    NextSessionDate,
    /// The relevance score.
    Score,
}

impl SortField {
    /// The field name in index sort specifications.
    pub fn index_name(&self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::NextSessionDate => "nextSessionDate",
            SortField::Score => "_score",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// One level of an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortCriterion {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        SortCriterion { field, order }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.index_name(), self.order.as_str())
    }
}

/// The resolved sort for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Primary field.
    pub field: SortField,
    /// Primary direction.
    pub order: SortOrder,
    /// Whether the caller asked for this order with a recognized keyword.
    pub explicit: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            field: SortField::NextSessionDate,
            order: SortOrder::Ascending,
            explicit: false,
        }
    }
}

impl SortSpec {
    /// The full ordering to hand to the index.
    ///
    /// An explicit keyword always decides the order and the score only breaks
    /// ties. Without one, a scored query is ordered by relevance with the
    /// next session date as tie-break, and an unscored query by the default
    /// next-session order.
    pub fn criteria(&self, has_relevance: bool) -> Vec<SortCriterion> {
        if !self.explicit && has_relevance {
            vec![
                SortCriterion::new(SortField::Score, SortOrder::Descending),
                SortCriterion::new(SortField::NextSessionDate, SortOrder::Ascending),
            ]
        } else if has_relevance {
            vec![
                SortCriterion::new(self.field, self.order),
                SortCriterion::new(SortField::Score, SortOrder::Descending),
            ]
        } else {
            vec![SortCriterion::new(self.field, self.order)]
        }
    }
}

/// Maps sort keywords to sort specifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortResolver;

impl SortResolver {
    pub fn new() -> Self {
        SortResolver
    }

    /// Resolve a keyword. Absent or unrecognized keywords fall back to the
    /// default (next session date, ascending) instead of failing.
    pub fn resolve(&self, keyword: Option<&str>) -> SortSpec {
        let Some(keyword) = keyword else {
            return SortSpec::default();
        };

        match SortKey::parse(keyword) {
            Some(SortKey::PriceAsc) => SortSpec {
                field: SortField::Price,
                order: SortOrder::Ascending,
                explicit: true,
            },
            Some(SortKey::PriceDesc) => SortSpec {
                field: SortField::Price,
                order: SortOrder::Descending,
                explicit: true,
            },
            Some(SortKey::Upcoming) => SortSpec {
                explicit: true,
                ..SortSpec::default()
            },
            None => {
                debug!("Unrecognized sort keyword '{keyword}', using default order");
                SortSpec::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_table() {
        let resolver = SortResolver::new();

        let spec = resolver.resolve(Some("price:asc"));
        assert_eq!((spec.field, spec.order), (SortField::Price, SortOrder::Ascending));

        let spec = resolver.resolve(Some("price:desc"));
        assert_eq!((spec.field, spec.order), (SortField::Price, SortOrder::Descending));

        let spec = resolver.resolve(Some("upcoming"));
        assert_eq!(
            (spec.field, spec.order),
            (SortField::NextSessionDate, SortOrder::Ascending)
        );
        assert!(spec.explicit);
    }

    #[test]
    fn test_absent_and_unrecognized_fall_back() {
        let resolver = SortResolver::new();
        assert_eq!(resolver.resolve(None), SortSpec::default());
        assert_eq!(resolver.resolve(Some("popularity")), SortSpec::default());
        assert!(!resolver.resolve(Some("popularity")).explicit);
    }

    #[test]
    fn test_keyword_aliases_and_case() {
        let resolver = SortResolver::new();
        assert_eq!(resolver.resolve(Some("PRICE:DESC")).order, SortOrder::Descending);
        assert_eq!(resolver.resolve(Some("priceasc")).field, SortField::Price);
        assert_eq!(resolver.resolve(Some("PriceDesc")).order, SortOrder::Descending);
    }

    #[test]
    fn test_criteria_ordering() {
        let default = SortSpec::default();
        assert_eq!(
            default.criteria(false),
            vec![SortCriterion::new(SortField::NextSessionDate, SortOrder::Ascending)]
        );
        assert_eq!(default.criteria(true)[0].field, SortField::Score);

        let price = SortResolver::new().resolve(Some("price:asc"));
        let criteria = price.criteria(true);
        assert_eq!(criteria[0], SortCriterion::new(SortField::Price, SortOrder::Ascending));
        assert_eq!(criteria[1].field, SortField::Score);
        assert_eq!(criteria[0].to_string(), "price:asc");
    }
}
