use crate::normalizer::Normalizer;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tracing::debug;
use trendscope_core::{KeywordConfig, KeywordCount, KeywordRanking, RawDocument, Token};

/// Token counts in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    index: HashMap<Token, usize>,
    entries: Vec<(Token, u64)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: Token) {
        match self.index.get(&token) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(token.clone(), self.entries.len());
                self.entries.push((token, 1));
            }
        }
    }

    pub fn count(&self, word: &str) -> u64 {
        Token::new(word)
            .and_then(|token| self.index.get(&token))
            .map(|&position| self.entries[position].1)
            .unwrap_or(0)
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Highest counts first; equal counts keep the order tokens were first seen.
    pub fn top(&self, top_n: NonZeroUsize) -> KeywordRanking {
        let mut ranked: Vec<&(Token, u64)> = self.entries.iter().collect();
        // sort_by is stable, which is what makes first-seen the tie-break
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(top_n.get());

        KeywordRanking::new(
            ranked
                .into_iter()
                .map(|(token, count)| KeywordCount::new(token.as_str(), *count))
                .collect(),
        )
    }
}

impl Extend<Token> for FrequencyTable {
    fn extend<I: IntoIterator<Item = Token>>(&mut self, iter: I) {
        for token in iter {
            self.add(token);
        }
    }
}

/// Reduces a document sequence to its most frequent keywords.
#[derive(Debug, Clone, Default)]
pub struct KeywordReducer {
    normalizer: Normalizer,
}

impl KeywordReducer {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn from_config(config: &KeywordConfig) -> Self {
        Self::new(Normalizer::from_config(config))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn frequency_table<'a, I>(&self, documents: I) -> FrequencyTable
    where
        I: IntoIterator<Item = &'a RawDocument>,
    {
        let mut table = FrequencyTable::new();
        for document in documents {
            table.extend(self.normalizer.normalize(document.as_str()));
        }
        table
    }

    pub fn reduce<'a, I>(&self, documents: I, top_n: NonZeroUsize) -> KeywordRanking
    where
        I: IntoIterator<Item = &'a RawDocument>,
    {
        let table = self.frequency_table(documents);
        debug!(
            "Counted {} tokens ({} distinct), keeping top {}",
            table.total(),
            table.distinct(),
            top_n
        );
        table.top(top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<RawDocument> {
        texts.iter().map(|t| RawDocument::from(*t)).collect()
    }

    fn no_stopwords() -> KeywordReducer {
        KeywordReducer::new(Normalizer::new(Vec::<String>::new(), Vec::<String>::new()))
    }

    fn n(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).unwrap()
    }

    #[test]
    fn test_tie_break_uses_first_seen_order() {
        let ranking = no_stopwords().reduce(&docs(&["a b", "a b", "c"]), n(2));
        let json = serde_json::to_string(&ranking).unwrap();
        assert_eq!(json, r#"[["a",2],["b",2]]"#);
    }

    #[test]
    fn test_later_token_with_higher_count_ranks_first() {
        let ranking = no_stopwords().reduce(&docs(&["x y", "y z", "y x"]), n(3));
        let words: Vec<_> = ranking.iter().map(|e| (e.word.as_str(), e.count)).collect();
        assert_eq!(words, vec![("y", 3), ("x", 2), ("z", 1)]);
    }

    #[test]
    fn test_fewer_distinct_tokens_than_top_n() {
        let ranking = KeywordReducer::default().reduce(&docs(&["rust rust cargo"]), n(10));
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.entries()[0], KeywordCount::new("rust", 2));
    }

    #[test]
    fn test_empty_collection_gives_empty_ranking() {
        let ranking = KeywordReducer::default().reduce(&docs(&[]), n(10));
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_deterministic_across_calls() {
        let documents = docs(&[
            "Markets rally as rates hold steady",
            "Rates hold, markets cautious https://news.example/x",
            "Central bank signals rates will hold",
            "cautious optimism in markets",
        ]);
        let reducer = KeywordReducer::default();
        let first = serde_json::to_string(&reducer.reduce(&documents, n(5))).unwrap();
        for _ in 0..10 {
            let again = serde_json::to_string(&reducer.reduce(&documents, n(5))).unwrap();
            assert_eq!(first, again);
        }
        assert!(first.starts_with(r#"[["markets",3],["rates",3],["hold",3]"#));
    }

    #[test]
    fn test_frequency_table_counts() {
        let table = KeywordReducer::default().frequency_table(&docs(&["Rust, rust and RUST!"]));
        assert_eq!(table.count("rust"), 3);
        assert_eq!(table.count("and"), 0);
        assert_eq!(table.distinct(), 1);
        assert_eq!(table.total(), 3);
    }
}
