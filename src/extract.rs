//! Result page extraction.
//!
//! Walks the `div.gs_ri` result blocks of a Google Scholar page and turns each
//! one into a [`ResultRecord`]. Every field lookup is independent; a missing
//! element yields that field's sentinel string instead of an error, so a record
//! is never partial.

use crate::error::{Result, ScholarError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const NO_TITLE: &str = "No title available";
pub const NO_LINK: &str = "No Link available";
pub const NO_AUTHORS: &str = "No authors available";
pub const NO_ABSTRACT: &str = "No abstract available";

/// Fetched page body and its HTTP status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub status: u16,
    pub body: String,
}

impl RawDocument {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Article title
    #[serde(rename = "Title")]
    pub title: String,
    /// Authors / venue line
    #[serde(rename = "Authors")]
    pub authors: String,
    /// Snippet shown under the hit
    #[serde(rename = "Abstract")]
    pub abstract_text: String,
    /// Link target of the title
    #[serde(rename = "URL")]
    pub url: String,
}

impl ResultRecord {
    pub fn has_link(&self) -> bool {
        self.url != NO_LINK
    }
}

/// Phrases of the interstitial served instead of results
const CAPTCHA_MARKERS: &[&str] = &["Solving the above CAPTCHA", "unusual traffic"];

/// Outcome of extracting one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Page fetched with status 200; records in page order
    Records(Vec<ResultRecord>),
    /// Page fetched with a non-200 status; body was not parsed
    Failed { status: u16 },
}

impl Extraction {
    /// Records of a successful fetch, empty for a failed one
    pub fn records(&self) -> &[ResultRecord] {
        match self {
            Extraction::Records(records) => records,
            Extraction::Failed { .. } => &[],
        }
    }

    /// Flatten to a plain record list, dropping the failure status
    pub fn into_records(self) -> Vec<ResultRecord> {
        match self {
            Extraction::Records(records) => records,
            Extraction::Failed { .. } => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Extraction::Failed { .. })
    }

    /// HTTP status of a failed fetch
    pub fn failed_status(&self) -> Option<u16> {
        match self {
            Extraction::Failed { status } => Some(*status),
            Extraction::Records(_) => None,
        }
    }
}

/// Compiled selectors for the result page markup.
///
/// Holds no per-call state; one instance can be shared by every request.
#[derive(Debug, Clone)]
pub struct ResultExtractor {
    item: Selector,
    title: Selector,
    link: Selector,
    authors: Selector,
    snippet: Selector,
    captcha: Selector,
    year: Regex,
}

impl ResultExtractor {
    /// Compile the result-page selectors.
    ///
    /// # Errors
    ///
    /// Returns [`ScholarError::Parse`] if a selector or the year pattern
    /// fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            item: selector("div.gs_ri")?,
            title: selector("h3.gs_rt")?,
            link: selector("a")?,
            authors: selector("div.gs_a")?,
            snippet: selector("div.gs_rs")?,
            captcha: selector("#gs_captcha_ccl, form#captcha-form")?,
            year: Regex::new(r"\b(19|20)\d{2}\b")
                .map_err(|e| ScholarError::Parse(e.to_string()))?,
        })
    }

    /// Publication year taken from the venue part of the authors line
    /// (`"A Author - Venue, 2016 - publisher"`).
    pub fn publication_year(&self, record: &ResultRecord) -> Option<i32> {
        if record.authors == NO_AUTHORS {
            return None;
        }

        let venue = record.authors.split(" - ").nth(1)?;
        self.year
            .find(venue)
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Whether `html` is the CAPTCHA interstitial rather than a result page.
    ///
    /// A page carrying any result block is never treated as the interstitial,
    /// whatever its text says.
    pub fn is_captcha(&self, html: &str) -> bool {
        let document = Html::parse_document(html);

        if document.select(&self.item).next().is_some() {
            return false;
        }

        document.select(&self.captcha).next().is_some()
            || CAPTCHA_MARKERS.iter().any(|m| html.contains(m))
    }

    /// Extract up to `max_results` records from a fetched page.
    ///
    /// A non-200 document yields [`Extraction::Failed`] without touching the
    /// body.
    pub fn extract(&self, doc: &RawDocument, max_results: usize) -> Extraction {
        if !doc.is_ok() {
            debug!(status = doc.status, "Skipping extraction of failed fetch");
            return Extraction::Failed { status: doc.status };
        }

        Extraction::Records(self.parse_records(&doc.body, max_results))
    }

    /// Parse result blocks from raw HTML, stopping after `max_results`.
    pub fn parse_records(&self, html: &str, max_results: usize) -> Vec<ResultRecord> {
        if max_results == 0 {
            return Vec::new();
        }

        let document = Html::parse_document(html);

        let records: Vec<ResultRecord> = document
            .select(&self.item)
            .take(max_results)
            .map(|item| self.parse_item(item))
            .collect();

        debug!(count = records.len(), limit = max_results, "Parsed result blocks");
        records
    }

    fn parse_item(&self, item: ElementRef<'_>) -> ResultRecord {
        let title_elem = item.select(&self.title).next();

        let title = title_elem
            .map(element_text)
            .unwrap_or_else(|| NO_TITLE.to_string());

        let url = title_elem
            .and_then(|t| t.select(&self.link).next())
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
            .unwrap_or_else(|| NO_LINK.to_string());

        let authors = item
            .select(&self.authors)
            .next()
            .map(element_text)
            .unwrap_or_else(|| NO_AUTHORS.to_string());

        let abstract_text = item
            .select(&self.snippet)
            .next()
            .map(element_text)
            .unwrap_or_else(|| NO_ABSTRACT.to_string());

        ResultRecord {
            title,
            authors,
            abstract_text,
            url,
        }
    }
}

/// Extract with a freshly compiled [`ResultExtractor`].
pub fn extract(doc: &RawDocument, max_results: usize) -> Result<Extraction> {
    Ok(ResultExtractor::new()?.extract(doc, max_results))
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScholarError::Parse(format!("{}: {}", css, e)))
}

fn element_text(elem: ElementRef<'_>) -> String {
    elem.text().collect::<String>().trim().to_string()
}
