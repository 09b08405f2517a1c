//! Google Scholar search client.
//!
//! Ties the pipeline together: build the URL, fetch the page with a browser
//! User-Agent, then hand the document to the shared [`ResultExtractor`].

use crate::error::{Result, ScholarError};
use crate::extract::{Extraction, RawDocument, ResultExtractor};
use crate::query::{self, SearchQuery, SearchUrl, DEFAULT_SCHOLAR_URL};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

/// User agent string for requests
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Accept header of a desktop browser
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Client options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Custom base URL for mirror sites
    pub base_url: Option<String>,
    /// Proxy URL (e.g., "http://127.0.0.1:7890")
    pub proxy: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            proxy: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for Google Scholar result pages
#[derive(Debug, Clone)]
pub struct ScholarClient {
    http: reqwest::Client,
    base_url: String,
    extractor: ResultExtractor,
}

impl ScholarClient {
    /// Create a client from options.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarError::Config`] for an unparsable base URL or proxy.
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let base_url = match &options.base_url {
            Some(base) => {
                Url::parse(base).map_err(|e| {
                    ScholarError::Config(format!("Invalid base URL '{}': {}", base, e))
                })?;
                base.trim_end_matches('/').to_string()
            }
            None => DEFAULT_SCHOLAR_URL.to_string(),
        };

        Ok(Self {
            http: build_http_client(options)?,
            base_url,
            extractor: ResultExtractor::new()?,
        })
    }

    /// Extractor shared by every search of this client
    pub fn extractor(&self) -> &ResultExtractor {
        &self.extractor
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the search URL for `query` against this client's base.
    pub fn search_url(&self, query: &SearchQuery) -> Result<SearchUrl> {
        query::build_with_base(&self.base_url, query)
    }

    /// Fetch a result page.
    ///
    /// Any HTTP status is returned as data; only transport failures are errors.
    pub async fn fetch(&self, url: &SearchUrl) -> Result<RawDocument> {
        debug!(url = %url, "Fetching page");

        let response = self
            .http
            .get(url.as_str())
            .header("Accept", ACCEPT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Cache-Control", "no-cache")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawDocument { status, body })
    }

    /// Run a keyword or filtered search.
    ///
    /// # Errors
    ///
    /// Validation, transport and CAPTCHA failures. A non-200 page is
    /// [`Extraction::Failed`], not an error.
    pub async fn search(&self, query: &SearchQuery) -> Result<Extraction> {
        let url = self.search_url(query)?;

        info!(
            query = %query.keywords,
            author = ?query.author,
            years = ?query.year_range,
            url = %url,
            "Starting Google Scholar query"
        );

        let doc = self.fetch(&url).await?;

        if !doc.is_ok() {
            error!(status = doc.status, "Failed to fetch result page");
        } else if self.extractor.is_captcha(&doc.body) {
            warn!("CAPTCHA detected");
            return Err(ScholarError::Captcha);
        }

        let outcome = self.extractor.extract(&doc, query.max_results);
        info!(count = outcome.records().len(), "Query complete");
        Ok(outcome)
    }

    /// Plain keyword search returning at most `num_results` records.
    pub async fn search_keywords(
        &self,
        keywords: &str,
        num_results: usize,
    ) -> Result<Extraction> {
        self.search(&SearchQuery::new(keywords).with_max_results(num_results))
            .await
    }
}

/// Build HTTP client with optional proxy
fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(options.timeout)
        .cookie_store(true);

    if let Some(proxy_url) = options.proxy.as_deref() {
        let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
            ScholarError::Config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ScholarError::Config(format!("Failed to build HTTP client: {}", e)))
}
