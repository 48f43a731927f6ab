pub mod archive;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod search;
pub mod server;
pub mod tools;
pub mod tracing;
pub mod web;

pub use archive::{Document, Extraction, SkipReason};
pub use cache::{ArchiveSource, IndexCache};
pub use config::Config;
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use search::{DocsIndex, FieldWeights, SearchResult};
pub use server::DocSearchServer;
