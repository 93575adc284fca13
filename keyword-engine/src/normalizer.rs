use crate::stopwords::{ENGLISH_STOPWORDS, PUNCTUATION};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use trendscope_core::{KeywordConfig, Token};

// Information separators U+001C..U+001F count as whitespace alongside `\s`
// throughout. URLs match mid-word as well ("awwwesome" loses "wwwesome").
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http[^\s\x1C-\x1F]+|www[^\s\x1C-\x1F]+").expect("URL pattern compiles")
});
static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s\x1C-\x1F]").expect("letter filter compiles"));

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::english);

/// Turns raw post text into keyword tokens.
///
/// Steps, in order: drop URL runs, delete every character that is neither an
/// ASCII letter nor whitespace, lowercase, split on whitespace, drop stopwords
/// and punctuation words. Deleted symbols are not replaced with spaces, so
/// `"don't"` becomes `"dont"` and `"end.Start"` becomes `"endstart"`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
    punctuation: HashSet<String>,
}

impl Normalizer {
    pub fn new<S, P>(stopwords: S, punctuation: P) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            punctuation: punctuation.into_iter().map(Into::into).collect(),
        }
    }

    /// Bundled English stopwords and punctuation.
    pub fn english() -> Self {
        Self::new(
            ENGLISH_STOPWORDS.iter().copied(),
            PUNCTUATION.iter().copied(),
        )
    }

    pub fn from_config(config: &KeywordConfig) -> Self {
        let mut stopwords: HashSet<String> = match &config.stopwords {
            Some(words) => words.iter().map(|w| w.to_lowercase()).collect(),
            None => ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        };
        stopwords.extend(config.extra_stopwords.iter().map(|w| w.to_lowercase()));

        let punctuation: HashSet<String> = match &config.punctuation {
            Some(symbols) => symbols.iter().cloned().collect(),
            None => PUNCTUATION.iter().map(|p| p.to_string()).collect(),
        };

        Self {
            stopwords,
            punctuation,
        }
    }

    pub fn normalize(&self, text: &str) -> Vec<Token> {
        let without_urls = URL_RE.replace_all(text, "");
        let letters_only = NON_LETTER_RE.replace_all(&without_urls, "");

        letters_only
            .to_ascii_lowercase()
            .split(is_separator)
            .filter(|word| !word.is_empty())
            .filter(|word| !self.stopwords.contains(*word) && !self.punctuation.contains(*word))
            .filter_map(Token::new)
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Normalizes with the bundled English stopword list.
pub fn normalize(text: &str) -> Vec<Token> {
    DEFAULT_NORMALIZER.normalize(text)
}
