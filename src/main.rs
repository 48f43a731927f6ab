use anyhow::Context;
use clap::Parser;
use docsearch_mcp::cache::{ArchiveSource, IndexCache};
use docsearch_mcp::cli::{Cli, Commands};
use docsearch_mcp::config::Config;
use docsearch_mcp::fetch::HttpFetcher;
use docsearch_mcp::server::DocSearchServer;
use docsearch_mcp::tools::search::{SearchDocumentationRequest, handle_search_documentation};
use docsearch_mcp::web::{PageReader, count_word_occurrences};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docsearch_mcp::tracing::init(cli.log_format);

    let config = Config::load(cli.config.as_deref(), cli.source.into())
        .context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Search { query, num_results } => {
            let fetcher = HttpFetcher::new(config.fetch_timeout())?;
            let cache = IndexCache::new(ArchiveSource::from(&config), fetcher);
            let output = handle_search_documentation(
                &cache,
                SearchDocumentationRequest { query, num_results },
            )
            .await
            .map_err(anyhow::Error::msg)?;
            println!("{}", output);
            Ok(())
        }
        Commands::FetchPage { url } => {
            let reader = PageReader::new(config.reader_url.clone(), config.fetch_timeout())?;
            let text = reader.download(&url).await?;
            println!("{}", text);
            Ok(())
        }
        Commands::CountWord { url, word } => {
            let reader = PageReader::new(config.reader_url.clone(), config.fetch_timeout())?;
            let text = reader.download(&url).await?;
            let count = count_word_occurrences(&text, &word);
            println!(
                "The word '{}' appears {} times (case-insensitive) in {} characters",
                word,
                count,
                text.chars().count()
            );
            Ok(())
        }
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting docsearch-mcp MCP server (archive: {}, cache: {})",
        config.zip_url,
        config.zip_path.display()
    );

    let server = DocSearchServer::from_config(config)?;
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
