//! Download-once retrieval of the remote documentation archive.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Makes a remote archive available at a local path.
///
/// Implementations must not touch the network when `local_path` already
/// exists, and must never leave a partially written file at `local_path`.
pub trait Fetcher: Send + Sync + 'static {
    fn ensure_local(&self, url: &str, local_path: &Path)
    -> impl Future<Output = Result<()>> + Send;
}

/// Fetcher backed by a `reqwest` client with a bounded request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;
        Ok(Self { client })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let transfer = |source| Error::Transfer {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transfer)?;
        let body = response.bytes().await.map_err(transfer)?;
        Ok(body.to_vec())
    }
}

impl Fetcher for HttpFetcher {
    async fn ensure_local(&self, url: &str, local_path: &Path) -> Result<()> {
        if tokio::fs::try_exists(local_path)
            .await
            .map_err(|e| Error::io(local_path, e))?
        {
            tracing::info!(
                "Archive already exists at {}, skipping download",
                local_path.display()
            );
            return Ok(());
        }

        tracing::info!("Downloading {}", url);
        let body = self.download(url).await?;
        write_atomically(local_path, &body).await?;
        tracing::info!("Downloaded {} bytes to {}", body.len(), local_path.display());
        Ok(())
    }
}

/// Writes `bytes` to a sibling `.part` file and renames it over `path`.
///
/// On failure the partial file is removed so only a complete archive can
/// ever appear at `path`.
pub(crate) async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }

    let partial = partial_path(path);
    let result = async {
        tokio::fs::write(&partial, bytes)
            .await
            .map_err(|e| Error::io(&partial, e))?;
        tokio::fs::rename(&partial, path)
            .await
            .map_err(|e| Error::io(path, e))
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    result
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("download"), ToOwned::to_owned);
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn partial_path_is_a_sibling() {
        check!(partial_path(Path::new("/cache/docs.zip")) == PathBuf::from("/cache/docs.zip.part"));
        check!(partial_path(Path::new("docs.zip")) == PathBuf::from("docs.zip.part"));
    }

    #[tokio::test]
    async fn atomic_write_creates_parents_and_leaves_no_part_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/cache/docs.zip");

        write_atomically(&target, b"archive bytes").await.unwrap();

        check!(std::fs::read(&target).unwrap() == b"archive bytes");
        check!(!partial_path(&target).exists());
    }
}
