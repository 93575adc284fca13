//! Text normalization and keyword frequency ranking.
//!
//! Both stages are total: any input string normalizes, any document sequence
//! reduces. Failures only originate in the I/O around them.

pub mod normalizer;
pub mod reducer;
pub mod stopwords;

pub use normalizer::{normalize, Normalizer};
pub use reducer::{FrequencyTable, KeywordReducer};
