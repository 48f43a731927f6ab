//! `download_webpage` tool: page text through the reader proxy.

use crate::error::display_chain;
use crate::web::PageReader;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DownloadWebpageRequest {
    /// URL of the page to download (e.g. "https://datatalks.club")
    pub url: String,
}

pub async fn handle_download_webpage(
    reader: &PageReader,
    request: DownloadWebpageRequest,
) -> Result<String, String> {
    reader
        .download(&request.url)
        .await
        .map_err(|e| format!("Failed to download {}: {}", request.url, display_chain(&e)))
}
