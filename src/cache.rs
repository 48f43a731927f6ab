//! Lazily built, process-lifetime documentation index.
//!
//! The first query runs the whole pipeline (download → extract → index) and
//! stores the result. Concurrent first queries await the same in-flight build
//! through a shared future, so the archive is fetched and indexed once.

use crate::archive::{self, ExtractOptions};
use crate::config::Config;
use crate::error::Error;
use crate::fetch::Fetcher;
use crate::search::DocsIndex;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Outcome of a build, shared by every caller that awaited it.
pub type BuildResult = Result<Arc<DocsIndex>, Arc<Error>>;

type SharedBuild = Shared<BoxFuture<'static, BuildResult>>;

/// Where the documentation comes from and how it is read.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    pub url: String,
    pub path: PathBuf,
    pub extract: ExtractOptions,
}

impl From<&Config> for ArchiveSource {
    fn from(config: &Config) -> Self {
        Self {
            url: config.zip_url.clone(),
            path: config.zip_path.clone(),
            extract: ExtractOptions {
                extensions: config.extensions.clone(),
                max_entry_bytes: config.max_entry_bytes,
            },
        }
    }
}

enum Slot {
    Empty,
    Building { id: u64, build: SharedBuild },
    Ready(Arc<DocsIndex>),
}

/// Single-slot cache owning the documentation index.
///
/// The slot only ever holds a successfully built index. A failed build is
/// reported to everyone waiting on it and leaves the slot empty, so the next
/// call starts over.
pub struct IndexCache<F> {
    source: Arc<ArchiveSource>,
    fetcher: Arc<F>,
    slot: Mutex<Slot>,
    builds_started: AtomicU64,
}

impl<F> std::fmt::Debug for IndexCache<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("source", &self.source)
            .field("builds_started", &self.builds_started.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<F: Fetcher> IndexCache<F> {
    pub fn new(source: ArchiveSource, fetcher: F) -> Self {
        Self {
            source: Arc::new(source),
            fetcher: Arc::new(fetcher),
            slot: Mutex::new(Slot::Empty),
            builds_started: AtomicU64::new(0),
        }
    }

    /// Returns the index, building it on first use.
    pub async fn get_or_build(&self) -> BuildResult {
        let (id, build) = {
            let mut slot = self.slot.lock().await;
            match &*slot {
                Slot::Ready(index) => {
                    tracing::debug!("Documentation index cache hit");
                    return Ok(index.clone());
                }
                Slot::Building { id, build } => {
                    tracing::debug!("Awaiting in-flight index build #{}", id);
                    (*id, build.clone())
                }
                Slot::Empty => {
                    let id = self.builds_started.fetch_add(1, Ordering::SeqCst) + 1;
                    let build = self.start_build(id);
                    *slot = Slot::Building {
                        id,
                        build: build.clone(),
                    };
                    (id, build)
                }
            }
        };

        let result = build.await;

        // Only the build that still owns the slot may settle it.
        let mut slot = self.slot.lock().await;
        if matches!(&*slot, Slot::Building { id: current, .. } if *current == id) {
            *slot = match &result {
                Ok(index) => Slot::Ready(index.clone()),
                Err(e) => {
                    tracing::warn!("Index build #{} failed, cache left empty: {}", id, e);
                    Slot::Empty
                }
            };
        }

        result
    }

    /// Returns the index if it has already been built, without building it.
    pub async fn cached(&self) -> Option<Arc<DocsIndex>> {
        match &*self.slot.lock().await {
            Slot::Ready(index) => Some(index.clone()),
            _ => None,
        }
    }

    /// Number of build sequences started so far.
    pub fn builds_started(&self) -> u64 {
        self.builds_started.load(Ordering::SeqCst)
    }

    fn start_build(&self, id: u64) -> SharedBuild {
        let source = self.source.clone();
        let fetcher = self.fetcher.clone();
        tracing::info!("Starting documentation index build #{}", id);

        let build: BoxFuture<'static, BuildResult> = Box::pin(async move {
            build_index(fetcher.as_ref(), &source)
                .await
                .map(Arc::new)
                .map_err(Arc::new)
        });
        build.shared()
    }
}

/// Runs the pipeline: ensure the archive is local, extract documents, index them.
pub async fn build_index<F: Fetcher>(
    fetcher: &F,
    source: &ArchiveSource,
) -> Result<DocsIndex, Error> {
    fetcher.ensure_local(&source.url, &source.path).await?;

    let path = source.path.clone();
    let options = source.extract.clone();
    let extraction =
        tokio::task::spawn_blocking(move || archive::extract(&path, &options)).await??;

    tokio::task::spawn_blocking(move || DocsIndex::build(extraction.documents)).await?
}
