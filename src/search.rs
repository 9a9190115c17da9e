//! Search execution: from criteria to a ranked, paginated page of courses.

pub mod executor;
pub mod service;

pub use self::executor::{SearchExecutor, SearchPage};
pub use self::service::{CourseSearchService, SearchPlan, SearchResponse};
