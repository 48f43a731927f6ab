use crate::config::ConfigOverrides;
use crate::search::DEFAULT_RESULTS;
use crate::tracing::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "docsearch-mcp", version)]
#[command(about = "Documentation search and web page download for AI assistants", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "DOCSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Log line format (logs are written to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// URL of the documentation ZIP archive
    #[arg(long, global = true, env = "DOCSEARCH_ZIP_URL")]
    pub zip_url: Option<String>,

    /// Local path of the cached archive
    #[arg(long, global = true, env = "DOCSEARCH_ZIP_PATH")]
    pub zip_path: Option<PathBuf>,

    /// Reader proxy base URL used by page downloads
    #[arg(long, global = true, env = "DOCSEARCH_READER_URL")]
    pub reader_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "DOCSEARCH_FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: Option<u64>,
}

impl From<SourceArgs> for ConfigOverrides {
    fn from(args: SourceArgs) -> Self {
        Self {
            zip_url: args.zip_url,
            zip_path: args.zip_path,
            reader_url: args.reader_url,
            fetch_timeout_secs: args.fetch_timeout_secs,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the MCP server over stdio (default)
    Serve,
    /// Search the documentation and print the results as JSON
    Search {
        query: String,
        #[arg(short = 'n', long, default_value_t = DEFAULT_RESULTS)]
        num_results: i64,
    },
    /// Print a web page's text as rendered by the reader proxy
    FetchPage { url: String },
    /// Count case-insensitive occurrences of a word on a web page
    CountWord { url: String, word: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["docsearch-mcp"]).unwrap();
        check!(cli.command.is_none());
    }

    #[test]
    fn search_with_overrides() {
        let cli = Cli::try_parse_from([
            "docsearch-mcp",
            "search",
            "getting started",
            "-n",
            "3",
            "--zip-path",
            "/tmp/docs.zip",
        ])
        .unwrap();

        let_assert!(Some(Commands::Search { query, num_results }) = cli.command);
        check!(query == "getting started");
        check!(num_results == 3);
        check!(cli.source.zip_path == Some(PathBuf::from("/tmp/docs.zip")));
    }
}
