use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Visible text of one captured post. Identity is the exact text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocument(String);

impl RawDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for RawDocument {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawDocument {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for RawDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of documents gathered during one harvest session.
///
/// Membership is decided by exact string equality: two renders of the same post
/// that differ only in whitespace are kept as two documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RawDocument>", into = "Vec<RawDocument>")]
pub struct DocumentCollection {
    documents: Vec<RawDocument>,
    seen: HashSet<String>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` unless an identical document is already present.
    /// Returns whether the collection grew.
    pub fn insert(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.seen.contains(&text) {
            return false;
        }
        self.seen.insert(text.clone());
        self.documents.push(RawDocument(text));
        true
    }

    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawDocument> {
        self.documents.iter()
    }

    pub fn as_slice(&self) -> &[RawDocument] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<RawDocument> {
        self.documents
    }
}

impl From<Vec<RawDocument>> for DocumentCollection {
    fn from(documents: Vec<RawDocument>) -> Self {
        documents.into_iter().map(RawDocument::into_inner).collect()
    }
}

impl From<DocumentCollection> for Vec<RawDocument> {
    fn from(collection: DocumentCollection) -> Self {
        collection.documents
    }
}

impl<S: Into<String>> FromIterator<S> for DocumentCollection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut collection = DocumentCollection::new();
        for text in iter {
            collection.insert(text);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a RawDocument;
    type IntoIter = std::slice::Iter<'a, RawDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Normalized keyword: non-empty, lowercase ASCII letters only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    pub fn new(word: impl Into<String>) -> Option<Self> {
        let word = word.into();
        if Self::is_valid(&word) {
            Some(Self(word))
        } else {
            None
        }
    }

    pub fn is_valid(word: &str) -> bool {
        !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Token {
    type Error = String;

    fn try_from(word: String) -> Result<Self, Self::Error> {
        Token::new(word.clone())
            .ok_or_else(|| format!("'{}' is not a lowercase alphabetic token", word))
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `(word, count)` entry. Serialized as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u64)", into = "(String, u64)")]
pub struct KeywordCount {
    pub word: String,
    pub count: u64,
}

impl KeywordCount {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

impl From<(String, u64)> for KeywordCount {
    fn from((word, count): (String, u64)) -> Self {
        Self { word, count }
    }
}

impl From<KeywordCount> for (String, u64) {
    fn from(entry: KeywordCount) -> Self {
        (entry.word, entry.count)
    }
}

/// Top-N keywords ordered by descending count, ties in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordRanking {
    entries: Vec<KeywordCount>,
}

impl KeywordRanking {
    pub fn new(entries: Vec<KeywordCount>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[KeywordCount] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeywordCount> {
        self.entries.iter()
    }

    pub fn max_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }

    pub fn into_entries(self) -> Vec<KeywordCount> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a KeywordRanking {
    type Item = &'a KeywordCount;
    type IntoIter = std::slice::Iter<'a, KeywordCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A named group of account URLs, as listed in the category file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub accounts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_rejects_exact_duplicates() {
        let mut collection = DocumentCollection::new();
        assert!(collection.insert("first post"));
        assert!(collection.insert("second post"));
        assert!(!collection.insert("first post"));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.as_slice()[0].as_str(), "first post");
    }

    #[test]
    fn test_collection_keeps_whitespace_variants() {
        let collection: DocumentCollection = vec!["same text", "same  text"].into_iter().collect();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_collection_serializes_as_string_array() {
        let collection: DocumentCollection = vec!["one", "two"].into_iter().collect();
        let json = serde_json::to_string(&collection).unwrap();
        assert_eq!(json, r#"["one","two"]"#);

        let parsed: DocumentCollection = serde_json::from_str(r#"["a","b","a"]"#).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_token_validation() {
        assert!(Token::new("rust").is_some());
        assert!(Token::new("").is_none());
        assert!(Token::new("Rust").is_none());
        assert!(Token::new("r2d2").is_none());
    }

    #[test]
    fn test_keyword_count_is_pair_on_the_wire() {
        let ranking = KeywordRanking::new(vec![KeywordCount::new("rust", 3)]);
        let json = serde_json::to_string(&ranking).unwrap();
        assert_eq!(json, r#"[["rust",3]]"#);
        assert_eq!(ranking.max_count(), 3);
    }
}
