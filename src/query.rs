//! Search URL construction.
//!
//! Turns a [`SearchQuery`] into the exact request URL the search service
//! expects. Keywords use `+` for whitespace instead of percent-encoding and the
//! filter parameters are appended verbatim in a fixed order, so the same query
//! always yields the same URL.

use crate::error::{Result, ScholarError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Google Scholar URL
pub const DEFAULT_SCHOLAR_URL: &str = "https://scholar.google.com";

/// Number of records returned when the caller does not ask for a count
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Inclusive publication-year filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

/// A keyword query plus optional author and year filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search keywords (required)
    pub keywords: String,
    /// Author filter (`as_auth`)
    pub author: Option<String>,
    /// Year range filter (`as_ylo` / `as_yhi`)
    pub year_range: Option<YearRange>,
    /// Maximum number of records to extract
    pub max_results: usize,
}

impl SearchQuery {
    /// Plain keyword query with the default result count.
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            author: None,
            year_range: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_year_range(mut self, start: i32, end: i32) -> Self {
        self.year_range = Some(YearRange::new(start, end));
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Whether any author/year filter is set
    pub fn is_filtered(&self) -> bool {
        self.author.is_some() || self.year_range.is_some()
    }

    /// Check the query before a URL is built from it.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarError::Validation`] for blank keywords or a year range
    /// whose start is after its end.
    pub fn validate(&self) -> Result<()> {
        if self.keywords.trim().is_empty() {
            return Err(ScholarError::Validation(
                "keywords must not be empty".to_string(),
            ));
        }

        if let Some(range) = self.year_range {
            if range.start > range.end {
                return Err(ScholarError::Validation(format!(
                    "year range start {} is after end {}",
                    range.start, range.end
                )));
            }
        }

        Ok(())
    }
}

/// Fully formed search URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchUrl(String);

impl SearchUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the search URL against the public Google Scholar endpoint.
///
/// # Errors
///
/// Returns a validation error if the query is rejected by
/// [`SearchQuery::validate`].
pub fn build(query: &SearchQuery) -> Result<SearchUrl> {
    build_with_base(DEFAULT_SCHOLAR_URL, query)
}

/// Build the search URL against a custom base (mirror site, test server).
pub fn build_with_base(base_url: &str, query: &SearchQuery) -> Result<SearchUrl> {
    query.validate()?;

    let mut params = vec![format!("q={}", plus_join(&query.keywords))];

    if let Some(author) = &query.author {
        params.push(format!("as_auth={}", author));
    }

    if let Some(range) = query.year_range {
        params.push(format!("as_ylo={}", range.start));
        params.push(format!("as_yhi={}", range.end));
    }

    Ok(SearchUrl(format!(
        "{}/scholar?{}",
        base_url.trim_end_matches('/'),
        params.join("&")
    )))
}

/// Replace each whitespace character with `+`
fn plus_join(keywords: &str) -> String {
    keywords
        .chars()
        .map(|c| if c.is_whitespace() { '+' } else { c })
        .collect()
}
