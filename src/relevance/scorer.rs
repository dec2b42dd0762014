//! Keyword-basis relevance scoring

use std::sync::Arc;

use crate::document::{PipelineError, Region, Result, ScoredRegion, Stage};

use super::embedder::{cosine_similarity, Embedder, EmbeddingError};

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.4;

/// Topic vocabulary regions are compared against
pub const DEFAULT_ESG_KEYWORDS: &[&str] = &[
    "environment",
    "sustainability",
    "carbon footprint",
    "climate change",
    "social responsibility",
    "governance",
    "renewable energy",
    "emissions",
    "diversity",
    "ethical",
    "waste reduction",
    "greenhouse gas",
    "ESG",
];

/// Keywords and their embeddings, computed once
#[derive(Debug, Clone)]
pub struct KeywordBasis {
    keywords: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl KeywordBasis {
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Best similarity of `vector` against any keyword
    fn best_match(&self, vector: &[f32]) -> f32 {
        self.vectors
            .iter()
            .map(|keyword| cosine_similarity(vector, keyword))
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Embedding-similarity filter over extracted regions
///
/// Construction embeds the keyword basis; after that the scorer is
/// read-only and can be shared between concurrent runs behind an `Arc`.
pub struct RelevanceScorer {
    embedder: Arc<dyn Embedder>,
    basis: KeywordBasis,
    threshold: f32,
}

impl RelevanceScorer {
    pub fn new<S: AsRef<str>>(embedder: Arc<dyn Embedder>, keywords: &[S], threshold: f32) -> Result<Self> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(PipelineError::Config("keyword basis is empty".to_string()));
        }

        let texts: Vec<&str> = keywords.iter().map(String::as_str).collect();
        let vectors = embed_all(embedder.as_ref(), &texts)?;

        tracing::info!(
            "Relevance basis ready: {} keywords embedded with {} (threshold {})",
            keywords.len(),
            embedder.model_name(),
            threshold
        );

        Ok(Self {
            embedder,
            basis: KeywordBasis { keywords, vectors },
            threshold,
        })
    }

    pub fn with_defaults(embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::new(embedder, DEFAULT_ESG_KEYWORDS, DEFAULT_SIMILARITY_THRESHOLD)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn basis(&self) -> &KeywordBasis {
        &self.basis
    }

    /// Keep regions scoring at or above the configured threshold
    pub fn score(&self, regions: Vec<Region>) -> Result<Vec<ScoredRegion>> {
        self.score_with_threshold(regions, self.threshold)
    }

    /// Keep regions scoring at or above `threshold`, in input order
    pub fn score_with_threshold(&self, regions: Vec<Region>, threshold: f32) -> Result<Vec<ScoredRegion>> {
        if regions.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = regions.iter().map(|r| r.text.as_str()).collect();
        let vectors = embed_all(self.embedder.as_ref(), &texts)?;

        let total = regions.len();
        let scored: Vec<ScoredRegion> = regions
            .into_iter()
            .zip(vectors.iter())
            .filter_map(|(region, vector)| {
                let similarity = self.basis.best_match(vector);
                (similarity >= threshold).then_some(ScoredRegion { region, similarity })
            })
            .collect();

        tracing::info!("Relevance filter kept {} of {} regions", scored.len(), total);
        Ok(scored)
    }
}

fn embed_all(embedder: &dyn Embedder, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
    let vectors = embedder
        .embed_batch(texts)
        .map_err(|e| PipelineError::provider(Stage::Embedding, e))?;
    if vectors.len() != texts.len() {
        let err = EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        };
        return Err(PipelineError::provider(Stage::Embedding, err));
    }
    if let Some(expected) = embedder.dimension() {
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            let err = EmbeddingError::DimensionMismatch {
                expected,
                actual: bad.len(),
            };
            return Err(PipelineError::provider(Stage::Embedding, err));
        }
    }
    Ok(vectors)
}
