//! Configuration for course search.
//!
//! # Examples
//!
//! ```
//! use coursefind::config::CourseSearchConfig;
//!
//! let config = CourseSearchConfig::default();
//! assert_eq!(config.default_page_size, 10);
//! assert_eq!(config.max_page_size, 100);
//! assert_eq!(config.suggestion_cap, 10);
//!
//! let mut custom = CourseSearchConfig::default();
//! custom.max_page_size = 50;
//! assert!(custom.validate().is_ok());
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CourseSearchError, Result};

/// Configuration shared by the search and suggestion flows.
///
/// Every field has a default, so a configuration file only needs the keys it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseSearchConfig {
    /// Name of the index the composed queries target.
    pub index_name: String,
    /// Page size used when the request omits it or sends a non-positive value.
    pub default_page_size: usize,
    /// Largest page size served; larger requests are clamped.
    pub max_page_size: usize,
    /// Maximum number of suggestions returned for a prefix.
    pub suggestion_cap: usize,
    /// Per-request deadline handed to the index, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for CourseSearchConfig {
    fn default() -> Self {
        CourseSearchConfig {
            index_name: "courses".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            suggestion_cap: 10,
            request_timeout_ms: 5000,
        }
    }
}

impl CourseSearchConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: CourseSearchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values are mutually consistent.
    pub fn validate(&self) -> Result<()> {
        if self.index_name.trim().is_empty() {
            return Err(CourseSearchError::config("index_name must not be blank"));
        }
        if self.default_page_size == 0 {
            return Err(CourseSearchError::config(
                "default_page_size must be greater than 0",
            ));
        }
        if self.max_page_size < self.default_page_size {
            return Err(CourseSearchError::config(format!(
                "max_page_size ({}) must be at least default_page_size ({})",
                self.max_page_size, self.default_page_size
            )));
        }
        if self.suggestion_cap == 0 {
            return Err(CourseSearchError::config(
                "suggestion_cap must be greater than 0",
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(CourseSearchError::config(
                "request_timeout_ms must be greater than 0",
            ));
        }
        Ok(())
    }

    /// The per-request deadline as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
