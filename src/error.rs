//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for docsearch-mcp operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal failures of the documentation pipeline.
///
/// Per-entry problems found while reading an archive are not errors; they are
/// reported as [`SkipReason`](crate::archive::SkipReason) values and the
/// extraction carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote archive could not be downloaded (bad status, network failure, timeout).
    #[error("failed to download {url}")]
    Transfer {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The local file is not a readable ZIP archive.
    #[error("invalid or corrupted archive at {}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive contained no documents to index.
    #[error("no documents found to index")]
    EmptyCorpus,

    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialize HTTP client")]
    Client(#[source] reqwest::Error),

    /// A blocking pipeline stage panicked or was cancelled.
    #[error("background task failed")]
    Task(#[from] tokio::task::JoinError),

    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Renders an error with its full source chain on one line.
///
/// Tool handlers return plain strings to MCP clients, so the chain has to be
/// flattened by hand.
pub fn display_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn chain_includes_sources() {
        let error = Error::io(
            "/tmp/docs.zip",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        check!(display_chain(&error) == "I/O error at /tmp/docs.zip: denied");
    }

    #[test]
    fn empty_corpus_has_no_source() {
        check!(display_chain(&Error::EmptyCorpus) == "no documents found to index");
    }
}
