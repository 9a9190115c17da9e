//! Query construction: clauses, composition, sorting, and pagination.
//!
//! Normalized criteria flow through [`ClauseBuilder`] (criteria to clauses),
//! [`QueryComposer`] (clauses to one boolean [`CompositeQuery`]),
//! [`SortResolver`] (keyword to sort order) and [`Paginator`] (page to
//! offset/limit). Everything here is a pure function of its input.

pub mod builder;
pub mod clause;
pub mod composite;
pub mod dsl;
pub mod paginate;
pub mod sort;

pub use self::builder::{ClauseBuilder, ClauseSet};
pub use self::clause::{Clause, CourseField, Fuzziness, RangeValue};
pub use self::composite::{CompositeQuery, QueryComposer};
pub use self::paginate::{Page, Paginator};
pub use self::sort::{SortCriterion, SortField, SortKey, SortOrder, SortResolver, SortSpec};
