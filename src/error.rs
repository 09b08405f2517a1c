//! Custom error types for scholar-search.
//!
//! Every fallible operation in the library returns `Result<T, ScholarError>`.
//! A non-200 search page is not an error: it is reported as
//! [`Extraction::Failed`](crate::extract::Extraction::Failed).

use thiserror::Error;

/// Main error type for scholar-search operations.
#[derive(Debug, Error)]
pub enum ScholarError {
    /// Network/HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTML selector compilation error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Search service served its CAPTCHA interstitial
    #[error("CAPTCHA detected, the search service is blocking automated requests")]
    Captcha,

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid client configuration (base URL, proxy)
    #[error("Config error: {0}")]
    Config(String),

    /// Rejected search query
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using `ScholarError`
pub type Result<T> = std::result::Result<T, ScholarError>;
