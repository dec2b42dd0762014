//! Embedding providers
//!
//! Defines the embedder trait, cosine similarity, and the Ollama backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Embedding error types
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Embedding backend not available: {0}")]
    Unavailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Expected {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Text to vector model
///
/// Implementations are shared read-only between concurrent pipeline runs.
pub trait Embedder: Send + Sync {
    /// Model identifier, for logging
    fn model_name(&self) -> &str;

    /// Vector length, when known ahead of the first call
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Embed a batch of texts; one vector per input, in input order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            })
    }
}

/// Cosine similarity between two embedding vectors
/// Returns a value in [-1.0, 1.0]; 0.0 for empty, mismatched or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Rounding can push parallel vectors just past 1.0
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Ollama embedding backend
///
/// Uses the blocking client; call from a blocking context
/// (`tokio::task::spawn_blocking` inside the server).
pub struct OllamaEmbedder {
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "all-minilm", "nomic-embed-text")
    model: String,
    /// Per-request timeout
    timeout: Duration,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self) -> Result<reqwest::blocking::Client, EmbeddingError> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| EmbeddingError::Unavailable(format!("Failed to build HTTP client: {}", e)))
    }
}

impl Embedder for OllamaEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let url = format!("{}/api/embed", self.base_url);
        let response = self
            .client()?
            .post(&url)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .map_err(|e| EmbeddingError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::ApiError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .map_err(|e| EmbeddingError::ApiError(format!("Failed to parse response: {}", e)))?;

        if parsed.embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: parsed.embeddings.len(),
            });
        }

        Ok(parsed.embeddings)
    }
}

/// Deterministic embedder for tests
///
/// Each vocabulary phrase owns one axis; a text's vector counts the
/// phrases it contains (case-insensitive).
#[cfg(test)]
pub struct MockEmbedder {
    pub vocabulary: Vec<String>,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|s| s.to_lowercase()).collect(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Embedder for MockEmbedder {
    fn model_name(&self) -> &str {
        "mock"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.vocabulary.len())
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                self.vocabulary
                    .iter()
                    .map(|phrase| lower.matches(phrase.as_str()).count() as f32)
                    .collect()
            })
            .collect())
    }
}
