//! # coursefind
//!
//! Course catalog search: filtered, fuzzy, sorted and paginated search over
//! course documents plus type-ahead suggestions.
//!
//! ## Features
//!
//! - Typed search criteria with validation and a query-string binding
//! - Boolean queries with one scoring clause and any number of filters
//! - Price and upcoming-session sorting, relevance ordering for text queries
//! - Completion-backed suggestions with de-duplication and a cap
//! - A pluggable index contract with a thread-safe in-memory implementation
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use coursefind::config::CourseSearchConfig;
//! use coursefind::criteria::SearchCriteria;
//! use coursefind::document::CourseDocument;
//! use coursefind::index::MemoryCourseIndex;
//! use coursefind::search::CourseSearchService;
//!
//! let index = MemoryCourseIndex::with_documents(vec![
//!     CourseDocument::builder("1").title("Python Basics").category("Programming").build(),
//!     CourseDocument::builder("2").title("Pottery").category("Art").build(),
//! ]);
//! let service = CourseSearchService::new(Arc::new(index), &CourseSearchConfig::default());
//!
//! let response = service
//!     .search(&SearchCriteria::new().with_category("Art"))
//!     .unwrap();
//! assert_eq!(response.total, 1);
//! assert_eq!(response.courses[0].title, "Pottery");
//! ```

pub mod cli;
pub mod config;
pub mod criteria;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod search;
pub mod suggest;
pub mod util;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
