//! HTTP service exposing the search pipeline.
//!
//! - `GET /health`
//! - `POST /tools/search_key_words` returns the tool payload unchanged
//! - `POST /search` runs a filtered search and keeps failed fetches apart
//!   from empty result pages

use crate::error::{Result, ScholarError};
use crate::extract::{Extraction, ResultRecord};
use crate::query::{SearchQuery, DEFAULT_MAX_RESULTS};
use crate::scholar::ScholarClient;
use crate::tool::{self, SearchKeyWordsArgs, ToolOutput};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state of the HTTP service
pub struct AppState {
    pub client: ScholarClient,
}

/// Build the router
pub fn router(client: ScholarClient) -> Router {
    let app_state = Arc::new(AppState { client });

    Router::new()
        .route("/health", get(health_handler))
        .route("/tools/search_key_words", post(tool_handler))
        .route("/search", post(search_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Bind and serve until the process exits.
pub async fn run(client: ScholarClient, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(client)).await?;
    Ok(())
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// `search_key_words` tool endpoint
///
/// Undecodable arguments answer with the tool's error payload, not a bare 422.
async fn tool_handler(
    State(state): State<Arc<AppState>>,
    args: std::result::Result<Json<SearchKeyWordsArgs>, JsonRejection>,
) -> Json<ToolOutput> {
    match args {
        Ok(Json(args)) => Json(tool::search_key_words(&state.client, &args).await),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected tool arguments");
            Json(ToolOutput::error(rejection.body_text()))
        }
    }
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub keywords: String,
    pub author: Option<String>,
    pub year_low: Option<i32>,
    pub year_high: Option<i32>,
    #[serde(default = "default_num_results")]
    pub num_results: usize,
}

fn default_num_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl SearchRequest {
    /// Year filters must come as a pair; a half-open range is rejected.
    fn to_query(&self) -> Result<SearchQuery> {
        let mut query =
            SearchQuery::new(self.keywords.clone()).with_max_results(self.num_results);
        if let Some(author) = &self.author {
            query = query.with_author(author.clone());
        }
        match (self.year_low, self.year_high) {
            (Some(lo), Some(hi)) => Ok(query.with_year_range(lo, hi)),
            (None, None) => Ok(query),
            _ => Err(ScholarError::Validation(
                "year_low and year_high must be given together".to_string(),
            )),
        }
    }
}

/// Search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    pub count: usize,
    pub results: Vec<ResultRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Search endpoint handler
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    info!(keywords = %req.keywords, author = ?req.author, "Search request");

    let outcome = match req.to_query() {
        Ok(query) => state.client.search(&query).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(Extraction::Records(results)) => Json(SearchResponse {
            status: "success".to_string(),
            http_status: Some(200),
            count: results.len(),
            results,
            message: None,
        }),
        Ok(Extraction::Failed { status }) => Json(SearchResponse {
            status: "failed".to_string(),
            http_status: Some(status),
            count: 0,
            results: vec![],
            message: Some(format!("Search service returned HTTP {}", status)),
        }),
        Err(e) => {
            error!(error = %e, "Search failed");
            Json(SearchResponse {
                status: "error".to_string(),
                http_status: None,
                count: 0,
                results: vec![],
                message: Some(e.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scholar::ClientOptions;
    use mockito::Matcher;

    const PAGE: &str = r#"<div class="gs_ri"><h3 class="gs_rt"><a href="https://x.org/1">One</a></h3><div class="gs_a">A - J, 2012</div></div>
        <div class="gs_ri"><h3 class="gs_rt"><a href="https://x.org/2">Two</a></h3></div>"#;

    async fn spawn_app(upstream: &mockito::ServerGuard) -> String {
        let client = ScholarClient::new(&ClientOptions {
            base_url: Some(upstream.url()),
            ..Default::default()
        })
        .expect("client builds");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(client)).await;
        });
        format!("http://{}", addr)
    }

    fn request(year_low: Option<i32>, year_high: Option<i32>) -> SearchRequest {
        SearchRequest {
            keywords: "k".to_string(),
            author: Some("Ian Goodfellow".to_string()),
            year_low,
            year_high,
            num_results: 5,
        }
    }

    #[test]
    fn test_half_open_year_range_rejected() {
        let err = request(Some(2015), None)
            .to_query()
            .expect_err("lower bound alone");
        assert!(matches!(err, ScholarError::Validation(_)));
        assert!(request(None, Some(2015)).to_query().is_err());
    }

    #[test]
    fn test_year_pair_and_no_years() {
        let query = request(Some(2010), Some(2021)).to_query().expect("pair");
        assert_eq!(query.year_range, Some(crate::query::YearRange::new(2010, 2021)));
        assert_eq!(query.author.as_deref(), Some("Ian Goodfellow"));

        let query = request(None, None).to_query().expect("no years");
        assert_eq!(query.year_range, None);
    }

    #[tokio::test]
    async fn test_health() {
        let upstream = mockito::Server::new_async().await;
        let base = spawn_app(&upstream).await;
        let body = reqwest::get(format!("{}/health", base))
            .await
            .expect("request")
            .text()
            .await
            .expect("body");
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_tool_endpoint() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("GET", "/scholar")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(PAGE)
            .create_async()
            .await;
        let base = spawn_app(&upstream).await;

        let json: serde_json::Value = reqwest::Client::new()
            .post(format!("{}/tools/search_key_words", base))
            .json(&serde_json::json!({"query": "machine learning", "num_results": 1}))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json body");

        assert_eq!(json.as_array().map(Vec::len), Some(1));
        assert_eq!(json[0]["Title"], "One");
        assert_eq!(json[0]["Authors"], "A - J, 2012");
    }

    #[tokio::test]
    async fn test_search_endpoint_reports_failed_fetch() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("GET", "/scholar")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;
        let base = spawn_app(&upstream).await;

        let resp: SearchResponse = reqwest::Client::new()
            .post(format!("{}/search", base))
            .json(&serde_json::json!({"keywords": "machine learning", "author": "Ian Goodfellow", "year_low": 2010, "year_high": 2021}))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json body");

        assert_eq!(resp.status, "failed");
        assert_eq!(resp.http_status, Some(429));
        assert_eq!(resp.count, 0);
    }

    #[tokio::test]
    async fn test_search_endpoint_validation_error() {
        let upstream = mockito::Server::new_async().await;
        let base = spawn_app(&upstream).await;

        let resp: SearchResponse = reqwest::Client::new()
            .post(format!("{}/search", base))
            .json(&serde_json::json!({"keywords": "x", "year_low": 2021, "year_high": 2010}))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json body");

        assert_eq!(resp.status, "error");
        assert!(resp.message.unwrap_or_default().contains("year range"));
    }

    #[tokio::test]
    async fn test_tool_endpoint_bad_arguments_use_error_payload() {
        let upstream = mockito::Server::new_async().await;
        let base = spawn_app(&upstream).await;

        let resp = reqwest::Client::new()
            .post(format!("{}/tools/search_key_words", base))
            .json(&serde_json::json!({"query": "machine learning", "num_results": -1}))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.expect("json body");
        let entries = json.as_array().expect("error list");
        assert_eq!(entries.len(), 1);
        let message = entries[0]["error"].as_str().expect("error message");
        assert!(message.starts_with("An error occurred while searching Google Scholar: "));
        assert!(message.contains("num_results"));
    }

    #[tokio::test]
    async fn test_tool_endpoint_non_string_query() {
        let upstream = mockito::Server::new_async().await;
        let base = spawn_app(&upstream).await;

        let json: serde_json::Value = reqwest::Client::new()
            .post(format!("{}/tools/search_key_words", base))
            .json(&serde_json::json!({"query": 42}))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json body");

        assert!(json[0]["error"].is_string());
    }

    #[tokio::test]
    async fn test_search_endpoint_half_open_range() {
        let upstream = mockito::Server::new_async().await;
        let base = spawn_app(&upstream).await;

        let resp: SearchResponse = reqwest::Client::new()
            .post(format!("{}/search", base))
            .json(&serde_json::json!({"keywords": "x", "year_low": 2015}))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json body");

        assert_eq!(resp.status, "error");
        assert!(resp.message.unwrap_or_default().contains("year_low and year_high"));
    }
}
