//! Web page text retrieval through a reader proxy.
//!
//! The proxy renders the target page and returns its readable text (Markdown)
//! when the page URL is appended to the proxy's base URL.

use crate::error::{Error, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PageReader {
    client: reqwest::Client,
    reader_url: String,
}

impl PageReader {
    pub fn new(reader_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;
        Ok(Self {
            client,
            reader_url: reader_url.into(),
        })
    }

    /// The proxy URL used to fetch `url`.
    pub fn proxied_url(&self, url: &str) -> String {
        format!("{}{}", self.reader_url, url)
    }

    /// Downloads the rendered text of the page at `url`.
    pub async fn download(&self, url: &str) -> Result<String> {
        let proxied = self.proxied_url(url);
        let transfer = |source| Error::Transfer {
            url: proxied.clone(),
            source,
        };

        tracing::debug!("Fetching page {} via {}", url, self.reader_url);
        let response = self
            .client
            .get(&proxied)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transfer)?;
        let text = response.text().await.map_err(transfer)?;
        tracing::info!("Downloaded {} characters from {}", text.chars().count(), url);
        Ok(text)
    }
}

/// Counts case-insensitive, non-overlapping occurrences of `word` in `text`.
pub fn count_word_occurrences(text: &str, word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&word.to_lowercase()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[test]
    fn proxied_url_prepends_reader() {
        let reader = PageReader::new("https://r.jina.ai/", Duration::from_secs(5)).unwrap();
        check!(reader.proxied_url("https://datatalks.club") == "https://r.jina.ai/https://datatalks.club");
    }

    #[rstest]
    #[case("Data, data and DATA", "data", 3)]
    #[case("database metadata", "DATA", 2)]
    #[case("nothing here", "data", 0)]
    #[case("aaaa", "aa", 2)]
    #[case("anything", "", 0)]
    fn counts_case_insensitively(#[case] text: &str, #[case] word: &str, #[case] expected: usize) {
        check!(count_word_occurrences(text, word) == expected);
    }
}
