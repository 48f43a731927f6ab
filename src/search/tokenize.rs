//! Text tokenization and stemming for documentation indexing.

use rust_stemmers::{Algorithm, Stemmer};

/// Minimum token length in bytes. Keeps short identifiers like `io` or `id`.
const MIN_TOKEN_LENGTH: usize = 1;

/// Common English stop words to filter out from indexing.
/// These high-frequency words add little value to search relevance.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Splits text into lowercase, stemmed search terms.
///
/// Documentation mixes prose with code, so besides whitespace and punctuation
/// the tokenizer also splits identifiers:
/// - **CamelCase**: "HttpServer" → ["http", "server", "httpserv"]
/// - **snake_case**: "parse_json" → ["pars", "json"]
/// - **hyphen-case**: "getting-started" → ["get", "start"]
///
/// Compound CamelCase words are emitted both whole and split, so a query for
/// either form finds the other.
pub(crate) struct Tokenizer {
    stemmer: Stemmer,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Tokenizer {
    pub(crate) fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = vec![];

        // Byte offsets of the current word ("HttpServer") and sub-word ("Server").
        let mut word_start: Option<usize> = None;
        let mut subword_start = 0;
        let mut previous_lowercase = false;

        for (i, c) in text.char_indices() {
            if !c.is_alphabetic() && c != '-' && c != '_' {
                if let Some(start) = word_start.take() {
                    if subword_start != start {
                        self.push(&text[subword_start..i], &mut tokens);
                    }
                    self.push(&text[start..i], &mut tokens);
                }
                previous_lowercase = false;
                continue;
            }

            let start = *word_start.get_or_insert(i);
            if i == start {
                subword_start = i;
            }

            if c == '-' || c == '_' {
                // Separator closes the sub-word; the next character opens a new one.
                self.push(&text[subword_start..i], &mut tokens);
                subword_start = i + c.len_utf8();
                previous_lowercase = false;
            } else {
                if previous_lowercase && c.is_uppercase() {
                    self.push(&text[subword_start..i], &mut tokens);
                    subword_start = i;
                }
                previous_lowercase = c.is_lowercase();
            }
        }

        if let Some(start) = word_start {
            if subword_start != start {
                self.push(&text[subword_start..], &mut tokens);
            }
            self.push(&text[start..], &mut tokens);
        }

        tokens
    }

    /// Lowercases, filters and stems one raw token.
    fn push(&self, raw: &str, tokens: &mut Vec<String>) {
        let trimmed = raw.trim_matches(|c| c == '-' || c == '_');
        if trimmed.len() < MIN_TOKEN_LENGTH {
            return;
        }

        let lowercase = trimmed.to_lowercase();
        if STOP_WORDS.contains(&lowercase.as_str()) {
            return;
        }

        tokens.push(self.stemmer.stem(&lowercase).into_owned());
    }
}
