//! `search_documentation` tool: ranked documentation lookup.

use crate::cache::IndexCache;
use crate::error::display_chain;
use crate::fetch::Fetcher;
use crate::search::{DEFAULT_RESULTS, FieldWeights};
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchDocumentationRequest {
    /// Search query (e.g. "getting started", "MCP server", "tools")
    pub query: String,
    /// Number of results to return (default: 5, clamped to 1..=10)
    #[serde(default = "default_num_results")]
    pub num_results: i64,
}

const fn default_num_results() -> i64 {
    DEFAULT_RESULTS
}

/// Searches the documentation index, building it on first use.
///
/// Returns the results as a JSON array of `{filename, content, score}` objects.
/// A failed index build is reported as an error, never as an empty result list.
pub async fn handle_search_documentation<F: Fetcher>(
    cache: &IndexCache<F>,
    request: SearchDocumentationRequest,
) -> Result<String, String> {
    let index = cache
        .get_or_build()
        .await
        .map_err(|e| format!("Failed to build documentation index: {}", display_chain(&*e)))?;

    let results = index.search(
        &request.query,
        &FieldWeights::default(),
        request.num_results,
    );
    tracing::debug!(
        "search_documentation '{}' returned {} results",
        request.query,
        results.len()
    );

    serde_json::to_string_pretty(&results).map_err(|e| format!("Failed to encode results: {}", e))
}
