//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test gets its own temporary directory for the cached archive and its
//! own [`IndexCache`], so no test observes another test's download or index.
//!
//! # Available Fixtures
//!
//! - [`docs_archive`]: bytes of a small GitHub-style documentation archive
//! - [`FixtureFetcher`]: a [`Fetcher`] that "downloads" fixed bytes and counts calls
//! - [`serve_once`]: a one-shot local HTTP server for exercising [`HttpFetcher`]
//! - [`serve_silence`]: a server that accepts but never replies, for timeouts
//!
//! [`HttpFetcher`]: docsearch_mcp::HttpFetcher

use docsearch_mcp::cache::{ArchiveSource, IndexCache};
use docsearch_mcp::{Fetcher, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use zip::write::SimpleFileOptions;

/// Builds an in-memory ZIP archive from `(name, bytes)` entries.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(bytes).expect("Failed to write zip entry");
    }
    writer
        .finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}

/// A small archive shaped like a GitHub download of a documentation repo.
pub fn docs_archive() -> Vec<u8> {
    zip_bytes(&[
        ("fastmcp-main/README.md", b"# FastMCP\nThe fast way to build MCP servers and clients."),
        (
            "fastmcp-main/docs/getting-started/welcome.mdx",
            b"Welcome! Getting started with FastMCP takes a few minutes.",
        ),
        (
            "fastmcp-main/docs/getting-started/installation.mdx",
            b"Install FastMCP with pip or uv. Installation requires Python.",
        ),
        (
            "fastmcp-main/docs/servers/tools.mdx",
            b"Tools are Python functions that an MCP server exposes to clients.",
        ),
        (
            "fastmcp-main/docs/servers/resources.mdx",
            b"Resources give clients read-only access to server data.",
        ),
        ("fastmcp-main/src/fastmcp/server.py", b"class FastMCP: ..."),
        ("fastmcp-main/docs/assets/logo.png", &[0x89, 0x50, 0x4e, 0x47]),
        ("fastmcp-main/docs/broken.md", &[0xff, 0xfe, 0xfd]),
    ])
}

/// Fetcher that writes fixed archive bytes instead of downloading.
///
/// Mirrors the real fetcher's contract: an existing file is left alone. Every
/// call is counted, and an optional delay widens race windows in concurrency tests.
pub struct FixtureFetcher {
    archive: Vec<u8>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl FixtureFetcher {
    pub fn new(archive: Vec<u8>) -> Self {
        Self {
            archive,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared call counter, still readable after the fetcher moves into a cache.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl Fetcher for FixtureFetcher {
    async fn ensure_local(&self, _url: &str, local_path: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if !local_path.exists() {
            std::fs::write(local_path, &self.archive).expect("Failed to write fixture archive");
        }
        Ok(())
    }
}

/// A temporary cache directory plus the archive source pointing into it.
pub struct TempSource {
    _temp: TempDir,
    pub source: ArchiveSource,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempSource {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let source = ArchiveSource {
            url: "https://example.invalid/docs.zip".to_string(),
            path: temp.path().join("docs.zip"),
            extract: Default::default(),
        };
        Self {
            _temp: temp,
            source,
        }
    }

    pub fn path(&self) -> &Path {
        &self.source.path
    }

    pub fn cache(&self, fetcher: FixtureFetcher) -> IndexCache<FixtureFetcher> {
        IndexCache::new(self.source.clone(), fetcher)
    }
}

/// Serves exactly one HTTP response on a random local port.
///
/// Returns the URL to request and a counter of accepted connections.
#[allow(dead_code)] // Used only by the fetch tests
pub async fn serve_once(status_line: &'static str, body: Vec<u8>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().expect("Listener has no address");
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();

    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        counter.fetch_add(1, Ordering::SeqCst);

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let header = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/zip\r\nConnection: close\r\n\r\n",
            status_line,
            body.len()
        );
        let _ = stream.write_all(header.as_bytes()).await;
        let _ = stream.write_all(&body).await;
        let _ = stream.shutdown().await;
    });

    (format!("http://{}/archive.zip", address), accepted)
}

/// Accepts connections on a random local port and never answers them.
///
/// Returns the URL to request. Connections stay open until the test ends.
#[allow(dead_code)] // Used only by the fetch tests
pub async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
        }
    });

    format!("http://{}/archive.zip", address)
}

/// Path inside a fresh temp dir, returned with the dir guard.
#[allow(dead_code)]
pub fn temp_file_path(name: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let path = temp.path().join(name);
    (temp, path)
}
