//! Relevance scoring
//!
//! Embeds region texts and keeps those close to a topic keyword basis.
//! The embedder is constructed explicitly and injected into the scorer.

mod embedder;
#[cfg(feature = "local-embeddings")]
mod local;
mod scorer;

pub use embedder::{cosine_similarity, Embedder, EmbeddingError, OllamaEmbedder};
#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbedder;
pub use scorer::{KeywordBasis, RelevanceScorer, DEFAULT_ESG_KEYWORDS, DEFAULT_SIMILARITY_THRESHOLD};

#[cfg(test)]
pub use embedder::MockEmbedder;
