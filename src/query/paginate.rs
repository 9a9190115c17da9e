//! Offset/limit computation.

use crate::error::{CourseSearchError, Result};

/// A window into the ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of results to skip.
    pub offset: usize,
    /// Maximum number of results to return.
    pub limit: usize,
}

/// Turns page numbers into offsets.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    default_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator { default_size: 10 }
    }
}

impl Paginator {
    /// Create a paginator that substitutes `default_size` for a zero size.
    pub fn new(default_size: usize) -> Self {
        Paginator {
            default_size: default_size.max(1),
        }
    }

    /// Compute `offset = page * size`.
    pub fn paginate(&self, page: usize, size: usize) -> Result<Page> {
        let limit = if size == 0 { self.default_size } else { size };
        let offset = page.checked_mul(limit).ok_or_else(|| {
            CourseSearchError::invalid_criteria(format!(
                "page {page} with size {limit} is out of range"
            ))
        })?;
        Ok(Page { offset, limit })
    }
}
