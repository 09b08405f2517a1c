//! # scholar-search
//!
//! Google Scholar keyword and filtered search with structured record extraction.
//!
//! ## Modules
//!
//! - [`query`] - Search URL construction and validation
//! - [`extract`] - Result page parsing into [`ResultRecord`]s
//! - [`scholar`] - HTTP client running build, fetch and extract
//! - [`output`] - Text, JSON and CSV rendering of records
//! - [`tool`] - `search_key_words` tool boundary
//! - [`server`] - HTTP service
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scholar_search::{ClientOptions, ScholarClient, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ScholarClient::new(&ClientOptions::default())?;
//!     let query = SearchQuery::new("machine learning")
//!         .with_author("Ian Goodfellow")
//!         .with_year_range(2010, 2021);
//!     let outcome = client.search(&query).await?;
//!     println!("Found {} results", outcome.records().len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod extract;
pub mod output;
pub mod query;
pub mod scholar;
pub mod server;
pub mod tool;

pub use error::{Result, ScholarError};
pub use extract::{Extraction, RawDocument, ResultExtractor, ResultRecord};
pub use query::{SearchQuery, SearchUrl, YearRange};
pub use scholar::{ClientOptions, ScholarClient};
