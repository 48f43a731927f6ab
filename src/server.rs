//! MCP server exposing documentation search and page download tools.

use crate::cache::{ArchiveSource, IndexCache};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::HttpFetcher;
use crate::tools::download::{DownloadWebpageRequest, handle_download_webpage};
use crate::tools::search::{SearchDocumentationRequest, handle_search_documentation};
use crate::web::PageReader;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for documentation search.
///
/// The documentation index is built lazily on the first search and then
/// shared by every later call.
#[derive(Clone)]
pub struct DocSearchServer {
    /// Shared index cache (download, extraction and indexing pipeline)
    cache: Arc<IndexCache<HttpFetcher>>,

    /// Reader proxy client for `download_webpage`
    reader: Arc<PageReader>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for DocSearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocSearchServer")
            .field("cache", &self.cache)
            .field("reader", &self.reader)
            .finish()
    }
}

impl DocSearchServer {
    /// Create a server that downloads the archive over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        let reader = PageReader::new(config.reader_url.clone(), config.fetch_timeout())?;
        Ok(Self::new(
            IndexCache::new(ArchiveSource::from(config), fetcher),
            reader,
        ))
    }
}

#[tool_router]
impl DocSearchServer {
    pub fn new(cache: IndexCache<HttpFetcher>, reader: PageReader) -> Self {
        Self {
            cache: Arc::new(cache),
            reader: Arc::new(reader),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search the FastMCP documentation (downloaded from GitHub) for relevant documents. Returns a JSON list of results with filename, content and relevance score. The documentation is downloaded and indexed on first use."
    )]
    async fn search_documentation(
        &self,
        Parameters(request): Parameters<SearchDocumentationRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_documentation(&self.cache, request).await
    }

    #[tool(
        description = "Download the content of a web page as Markdown text through a reader proxy. Takes the page URL, e.g. \"https://datatalks.club\"."
    )]
    async fn download_webpage(
        &self,
        Parameters(request): Parameters<DownloadWebpageRequest>,
    ) -> std::result::Result<String, String> {
        handle_download_webpage(&self.reader, request).await
    }
}

#[tool_handler]
impl ServerHandler for DocSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsearch-mcp: Web page download and documentation search. \
                 Use search_documentation to find relevant documentation files and \
                 download_webpage to read any web page as text.",
            )
    }
}
