//! In-process embeddings using all-MiniLM-L6-v2 via candle.
//!
//! Produces 384-dimensional normalized embeddings. Weights are fetched from
//! the Hugging Face Hub on first load and cached locally.

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, HiddenAct, DTYPE};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use super::embedder::{Embedder, EmbeddingError};

pub const MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
const REVISION: &str = "main";
const EMBEDDING_DIM: usize = 384;

fn model_err(context: &str) -> impl Fn(candle_core::Error) -> EmbeddingError + '_ {
    move |e| EmbeddingError::ModelError(format!("{}: {}", context, e))
}

/// Local BERT embedder
pub struct LocalEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl LocalEmbedder {
    /// Load model from Hugging Face Hub (downloads on first use)
    pub fn new() -> Result<Self, EmbeddingError> {
        let device = Device::Cpu;

        let api = Api::new()
            .map_err(|e| EmbeddingError::Unavailable(format!("Failed to create HF API: {}", e)))?;
        let repo = api.repo(Repo::with_revision(
            MODEL_ID.to_string(),
            RepoType::Model,
            REVISION.to_string(),
        ));

        let fetch = |name: &str| {
            repo.get(name)
                .map_err(|e| EmbeddingError::Unavailable(format!("Failed to download {}: {}", name, e)))
        };
        let config_path = fetch("config.json")?;
        let tokenizer_path = fetch("tokenizer.json")?;
        let weights_path = fetch("model.safetensors")?;

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| EmbeddingError::ModelError(format!("Failed to read config: {}", e)))?;
        let mut config: Config = serde_json::from_str(&config_str)
            .map_err(|e| EmbeddingError::ModelError(format!("Failed to parse config: {}", e)))?;

        // MiniLM uses gelu activation
        config.hidden_act = HiddenAct::Gelu;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbeddingError::ModelError(format!("Failed to load tokenizer: {}", e)))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: 512,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::ModelError(format!("Failed to set truncation: {}", e)))?;

        // SAFETY: the weights file is owned by the hub cache and not modified while mapped
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)
                .map_err(model_err("Failed to load weights"))?
        };
        let model = BertModel::load(vb, &config).map_err(model_err("Failed to build model"))?;

        tracing::info!("Local embedding model loaded: {}", MODEL_ID);

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    fn forward(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::ModelError(format!("Tokenization failed: {}", e)))?;

        let batch_size = encodings.len();
        let seq_len = encodings.first().map(|e| e.get_ids().len()).unwrap_or(0);

        let mut all_ids = Vec::with_capacity(batch_size * seq_len);
        let mut all_mask = Vec::with_capacity(batch_size * seq_len);
        let mut all_type_ids = Vec::with_capacity(batch_size * seq_len);
        for encoding in &encodings {
            all_ids.extend(encoding.get_ids().iter().map(|&x| x as i64));
            all_mask.extend(encoding.get_attention_mask().iter().map(|&x| x as i64));
            all_type_ids.extend(encoding.get_type_ids().iter().map(|&x| x as i64));
        }

        let shape = (batch_size, seq_len);
        let input_ids = Tensor::from_vec(all_ids, shape, &self.device).map_err(model_err("input_ids"))?;
        let attention_mask =
            Tensor::from_vec(all_mask, shape, &self.device).map_err(model_err("attention_mask"))?;
        let token_type_ids =
            Tensor::from_vec(all_type_ids, shape, &self.device).map_err(model_err("token_type_ids"))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(model_err("Model forward failed"))?;

        // Mean pooling with attention mask
        let mask = attention_mask
            .unsqueeze(2)
            .and_then(|m| m.to_dtype(DTYPE))
            .and_then(|m| m.broadcast_as(hidden_states.shape()))
            .map_err(model_err("Mask expansion failed"))?;
        let summed = hidden_states
            .mul(&mask)
            .and_then(|t| t.sum(1))
            .map_err(model_err("Masked sum failed"))?;
        let counts = mask
            .sum(1)
            .and_then(|t| t.clamp(1e-9, f64::MAX))
            .map_err(model_err("Mask count failed"))?;
        let pooled = summed.div(&counts).map_err(model_err("Pooling failed"))?;

        // L2 normalize
        let norm = pooled
            .sqr()
            .and_then(|t| t.sum_keepdim(1))
            .and_then(|t| t.sqrt())
            .and_then(|t| t.clamp(1e-12, f64::MAX))
            .map_err(model_err("Norm failed"))?;
        let normalized = pooled.broadcast_div(&norm).map_err(model_err("Normalize failed"))?;

        normalized.to_vec2::<f32>().map_err(model_err("To vec failed"))
    }
}

impl Embedder for LocalEmbedder {
    fn model_name(&self) -> &str {
        MODEL_ID
    }

    fn dimension(&self) -> Option<usize> {
        Some(EMBEDDING_DIM)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let vectors = self.forward(texts)?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relevance::cosine_similarity;

    #[test]
    #[ignore] // Requires model download
    fn test_local_embedding_dimensions() {
        let embedder = LocalEmbedder::new().unwrap();
        let vectors = embedder
            .embed_batch(&["greenhouse gas emissions", "quarterly revenue"])
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(Some(vectors[0].len()), embedder.dimension());

        let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[test]
    #[ignore] // Requires model download
    fn test_related_texts_score_higher() {
        let embedder = LocalEmbedder::new().unwrap();
        let basis = embedder.embed("emissions").unwrap();
        let related = embedder.embed("We cut carbon emissions by ten percent").unwrap();
        let unrelated = embedder.embed("The cafeteria menu changes on Fridays").unwrap();
        assert!(cosine_similarity(&basis, &related) > cosine_similarity(&basis, &unrelated));
    }
}
