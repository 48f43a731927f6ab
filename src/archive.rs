//! Document extraction from a downloaded ZIP archive.
//!
//! GitHub archives wrap the repository in a synthetic root folder
//! (`fastmcp-main/...`). Extraction drops that first path segment so
//! filenames read as repository-relative paths (`docs/getting-started/welcome.mdx`).

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A decoded text document taken from the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Archive path with the root segment removed. Unique within one extraction.
    pub filename: String,
    pub content: String,
}

/// Why an otherwise matching archive entry was left out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("content is not valid UTF-8")]
    InvalidUtf8,
    #[error("entry exceeds {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("filename collides with an earlier entry as '{filename}'")]
    DuplicateFilename { filename: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Entry name as stored in the archive.
    pub name: String,
    pub reason: SkipReason,
}

/// Result of reading an archive: the documents plus every entry that was skipped.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub extensions: Vec<String>,
    pub max_entry_bytes: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        let config = crate::config::Config::default();
        Self {
            extensions: config.extensions,
            max_entry_bytes: config.max_entry_bytes,
        }
    }
}

impl ExtractOptions {
    fn accepts(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Reads every document entry of the archive at `path`.
///
/// Entries are visited in archive order, so the same archive always yields the
/// same document list. Undecodable, oversized and duplicate entries are
/// skipped with a warning; only a broken archive aborts the extraction.
pub fn extract(path: &Path, options: &ExtractOptions) -> Result<Extraction> {
    let archive_error = |source| Error::Archive {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(archive_error)?;

    let mut extraction = Extraction::default();
    let mut seen = HashSet::new();
    let mut matched = 0usize;

    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(archive_error)?;
        let name = entry.name().to_string();
        if !options.accepts(&name) {
            continue;
        }
        matched += 1;

        let mut bytes = Vec::new();
        entry
            .take(options.max_entry_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| archive_error(e.into()))?;

        let outcome = if bytes.len() as u64 > options.max_entry_bytes {
            Err(SkipReason::TooLarge {
                limit: options.max_entry_bytes,
            })
        } else {
            String::from_utf8(bytes).map_err(|_| SkipReason::InvalidUtf8)
        };

        let filename = strip_root_segment(&name);
        let outcome = outcome.and_then(|content| {
            if seen.insert(filename.clone()) {
                Ok(content)
            } else {
                Err(SkipReason::DuplicateFilename {
                    filename: filename.clone(),
                })
            }
        });

        match outcome {
            Ok(content) => extraction.documents.push(Document { filename, content }),
            Err(reason) => {
                tracing::warn!("Skipping {}: {}", name, reason);
                extraction.skipped.push(SkippedEntry { name, reason });
            }
        }
    }

    tracing::info!(
        "Processed {} documents from {} matching entries in {} ({} skipped)",
        extraction.documents.len(),
        matched,
        path.display(),
        extraction.skipped.len()
    );

    Ok(extraction)
}

/// Drops the first path segment when the name has more than one.
///
/// `fastmcp-main/docs/index.md` becomes `docs/index.md`; `README.md` stays as is.
/// Empty and `.` segments are ignored. A leading `/` counts as the first
/// segment, so `/docs/a.md` becomes `docs/a.md`.
pub fn strip_root_segment(name: &str) -> String {
    let segments: Vec<&str> = name
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let rest = if name.starts_with('/') || segments.len() <= 1 {
        &segments[..]
    } else {
        &segments[1..]
    };
    rest.join("/")
}
