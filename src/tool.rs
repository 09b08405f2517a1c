//! `search_key_words` tool boundary.
//!
//! The single place where pipeline errors are turned into the one-element
//! `[{"error": ...}]` payload that remote callers expect.

use crate::extract::ResultRecord;
use crate::query::DEFAULT_MAX_RESULTS;
use crate::scholar::ScholarClient;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Tool name as exposed to remote callers
pub const TOOL_NAME: &str = "search_key_words";

/// Tool description as exposed to remote callers
pub const TOOL_DESCRIPTION: &str = "Search for articles on Google Scholar using key words.";

/// Arguments of `search_key_words`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchKeyWordsArgs {
    /// Search query string
    pub query: String,
    /// Number of results to return
    #[serde(default = "default_num_results")]
    pub num_results: usize,
}

fn default_num_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Error entry of a failed tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub error: String,
}

/// Output of a tool call: the records, or a one-element error list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Records(Vec<ResultRecord>),
    Error([ToolError; 1]),
}

impl ToolOutput {
    /// One-element error payload for `message`
    pub fn error(message: impl std::fmt::Display) -> Self {
        ToolOutput::Error([ToolError {
            error: format!(
                "An error occurred while searching Google Scholar: {}",
                message
            ),
        }])
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Error(_))
    }
}

/// Run a keyword search for a remote caller.
///
/// A failed fetch status flattens to an empty record list; every other
/// failure becomes the error payload.
pub async fn search_key_words(client: &ScholarClient, args: &SearchKeyWordsArgs) -> ToolOutput {
    info!(tool = TOOL_NAME, query = %args.query, num_results = args.num_results, "Tool call");

    match client.search_keywords(&args.query, args.num_results).await {
        Ok(outcome) => ToolOutput::Records(outcome.into_records()),
        Err(e) => {
            error!(tool = TOOL_NAME, error = %e, "Search failed");
            ToolOutput::error(e)
        }
    }
}

/// JSON Schema of the tool arguments
pub fn input_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Search query string"
            },
            "num_results": {
                "type": "integer",
                "description": "Number of results to return",
                "default": DEFAULT_MAX_RESULTS
            }
        },
        "required": ["query"]
    })
}
