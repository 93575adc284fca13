//! Flat JSON artifacts exchanged between pipeline stages.
//!
//! Layout under the data directory, per category:
//! `<category>_tweets.json` (array of post texts),
//! `<category>_keywords.json` (array of `[word, count]` pairs) and
//! `<category>_wordcloud.svg`.

mod codec;
mod shape;


use std::path::PathBuf;
use tracing::{debug, info};
use trendscope_core::{
    ArtifactError, Category, KeywordRanking, PathsConfig, RawDocument, Stage,
};

pub struct ArtifactStore {
    paths: PathsConfig,
}

impl ArtifactStore {
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    /// Categories in the order they appear in the file.
    pub fn load_categories(&self) -> Result<Vec<Category>, ArtifactError> {
        let path = &self.paths.categories_file;
        let value = codec::read_value(path, Stage::Scrape)?;
        let categories = shape::categories(&value, path, Stage::Scrape)?;
        debug!("Loaded {} categories from {}", categories.len(), path.display());
        Ok(categories)
    }

    pub fn save_documents(
        &self,
        category: &str,
        documents: &[RawDocument],
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.paths.raw_documents_file(category);
        codec::write_pretty(&path, Stage::Scrape, documents)?;
        info!("Saved {} posts to {}", documents.len(), path.display());
        Ok(path)
    }

    pub fn load_documents(&self, category: &str) -> Result<Vec<RawDocument>, ArtifactError> {
        let path = self.paths.raw_documents_file(category);
        let value = codec::read_value(&path, Stage::Extract)?;
        let documents = shape::documents(&value, &path, Stage::Extract)?;
        debug!("Loaded {} posts from {}", documents.len(), path.display());
        Ok(documents)
    }

    pub fn save_ranking(
        &self,
        category: &str,
        ranking: &KeywordRanking,
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.paths.keywords_file(category);
        codec::write_pretty(&path, Stage::Extract, ranking)?;
        info!("Saved {} keywords to {}", ranking.len(), path.display());
        Ok(path)
    }

    /// Loads and shape-checks a ranking; any element that is not a
    /// `[string, non-negative integer]` pair is a structure error.
    pub fn load_ranking(&self, category: &str) -> Result<KeywordRanking, ArtifactError> {
        let path = self.paths.keywords_file(category);
        let value = codec::read_value(&path, Stage::Visualize)?;
        shape::ranking(&value, &path, Stage::Visualize)
    }

    pub fn save_word_cloud(&self, category: &str, svg: &str) -> Result<PathBuf, ArtifactError> {
        let path = self.paths.word_cloud_file(category);
        codec::write_bytes(&path, Stage::Visualize, svg.as_bytes())?;
        info!("Saved word cloud to {}", path.display());
        Ok(path)
    }
}
