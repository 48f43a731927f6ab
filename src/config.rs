//! Runtime configuration: archive source, cache location and reader proxy.
//!
//! Values come from built-in defaults, then an optional TOML file, then CLI
//! flags or `DOCSEARCH_*` environment variables (highest precedence).

use crate::error::{Error, Result};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Archive of the FastMCP repository's main branch.
pub const DEFAULT_ZIP_URL: &str = "https://github.com/jlowin/fastmcp/archive/refs/heads/main.zip";

/// File name of the cached archive inside the cache directory.
pub const DEFAULT_ZIP_NAME: &str = "fastmcp-main.zip";

/// Reader proxy that renders a page to text when its URL is appended.
pub const DEFAULT_READER_URL: &str = "https://r.jina.ai/";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_ENTRY_BYTES: u64 = 16 * 1024 * 1024;
const APP_DIR: &str = "docsearch-mcp";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Remote ZIP archive holding the documentation.
    pub zip_url: String,
    /// Where the archive is cached locally.
    pub zip_path: PathBuf,
    /// Prefix prepended to page URLs by `download_webpage`.
    pub reader_url: String,
    /// Upper bound for a single HTTP request.
    pub fetch_timeout_secs: u64,
    /// Entry suffixes treated as documents.
    pub extensions: Vec<String>,
    /// Entries larger than this are skipped.
    pub max_entry_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zip_url: DEFAULT_ZIP_URL.to_string(),
            zip_path: default_cache_dir().join(DEFAULT_ZIP_NAME),
            reader_url: DEFAULT_READER_URL.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            extensions: vec![".md".to_string(), ".mdx".to_string()],
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub zip_url: Option<String>,
    pub zip_path: Option<PathBuf>,
    pub reader_url: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
}

impl Config {
    /// Loads the configuration file, if any, and applies overrides on top.
    ///
    /// An explicit `path` must exist. Without one, the per-user config file is
    /// read when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_file().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        Ok(config.with_overrides(overrides))
    }

    /// Parses a TOML configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&text).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml(text: &str) -> std::result::Result<Self, String> {
        let mut config: Self = toml::from_str(text).map_err(|e| e.to_string())?;
        config.zip_path = expand_tilde_path(&config.zip_path);
        if config.extensions.is_empty() {
            return Err("`extensions` must list at least one suffix".to_string());
        }
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.zip_url {
            self.zip_url = url;
        }
        if let Some(path) = overrides.zip_path {
            self.zip_path = expand_tilde_path(&path);
        }
        if let Some(url) = overrides.reader_url {
            self.reader_url = url;
        }
        if let Some(secs) = overrides.fetch_timeout_secs {
            self.fetch_timeout_secs = secs;
        }
        self
    }

    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR))
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

fn expand_tilde_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(text) => PathBuf::from(expand_tilde(text).as_ref()),
        None => path.to_path_buf(),
    }
}
