//! Configuration management for ESG Lens

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

use crate::extract::{DEFAULT_HEADING_FONT_SIZE, DEFAULT_VERTICAL_TOLERANCE};
use crate::mupdf::DEFAULT_RENDER_SCALE;
use crate::relevance::{DEFAULT_ESG_KEYWORDS, DEFAULT_SIMILARITY_THRESHOLD};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub extraction: ExtractionConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Headings must be larger than this, in points
    pub heading_font_size: f32,
    /// Max distance from the median line center, in points
    pub vertical_tolerance: f32,
    /// Raster pixels per point for OCR
    pub render_scale: f32,
    pub ocr_language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub similarity_threshold: f32,
    pub keywords: Vec<String>,
    pub backend: EmbeddingBackend,
    pub ollama_url: String,
    pub ollama_model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Ollama server over HTTP
    Ollama,
    /// In-process candle model (`local-embeddings` feature)
    Local,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                upload_dir: PathBuf::from("uploads"),
                max_upload_bytes: 50 * 1024 * 1024,
            },
            extraction: ExtractionConfig {
                heading_font_size: DEFAULT_HEADING_FONT_SIZE,
                vertical_tolerance: DEFAULT_VERTICAL_TOLERANCE,
                render_scale: DEFAULT_RENDER_SCALE,
                ocr_language: "eng".to_string(),
            },
            scoring: ScoringConfig {
                similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
                keywords: DEFAULT_ESG_KEYWORDS.iter().map(|k| k.to_string()).collect(),
                backend: EmbeddingBackend::Ollama,
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "all-minilm".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        macro_rules! parse_or {
            ($key:literal, $default:expr) => {
                match get($key) {
                    Some(value) => value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue { key: $key, value })?,
                    None => $default,
                }
            };
        }

        let backend = match get("EMBEDDING_BACKEND").map(|v| v.to_lowercase()) {
            None => defaults.scoring.backend,
            Some(v) if v == "ollama" => EmbeddingBackend::Ollama,
            Some(v) if v == "local" => EmbeddingBackend::Local,
            Some(value) => {
                return Err(ConfigError::InvalidValue {
                    key: "EMBEDDING_BACKEND",
                    value,
                })
            }
        };

        let keywords = match get("ESG_KEYWORDS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.scoring.keywords,
        };

        Ok(Config {
            server: ServerConfig {
                host: get("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or!("SERVER_PORT", defaults.server.port),
                upload_dir: get("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.server.upload_dir),
                max_upload_bytes: parse_or!("MAX_UPLOAD_BYTES", defaults.server.max_upload_bytes),
            },
            extraction: ExtractionConfig {
                heading_font_size: parse_or!("HEADING_FONT_SIZE", defaults.extraction.heading_font_size),
                vertical_tolerance: parse_or!("VERTICAL_TOLERANCE", defaults.extraction.vertical_tolerance),
                render_scale: parse_or!("RENDER_SCALE", defaults.extraction.render_scale),
                ocr_language: get("OCR_LANGUAGE").unwrap_or(defaults.extraction.ocr_language),
            },
            scoring: ScoringConfig {
                similarity_threshold: parse_or!("SIMILARITY_THRESHOLD", defaults.scoring.similarity_threshold),
                keywords,
                backend,
                ollama_url: get("OLLAMA_URL").unwrap_or(defaults.scoring.ollama_url),
                ollama_model: get("OLLAMA_EMBED_MODEL").unwrap_or(defaults.scoring.ollama_model),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_bytes, 52_428_800);
        assert_eq!(config.extraction.heading_font_size, 16.0);
        assert_eq!(config.extraction.vertical_tolerance, 50.0);
        assert_eq!(config.scoring.similarity_threshold, 0.4);
        assert_eq!(config.scoring.keywords.len(), 13);
        assert_eq!(config.scoring.backend, EmbeddingBackend::Ollama);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SERVER_PORT", "9000"),
            ("SIMILARITY_THRESHOLD", "0.55"),
            ("ESG_KEYWORDS", "emissions, ,water use"),
            ("EMBEDDING_BACKEND", "LOCAL"),
            ("UPLOAD_DIR", "/var/lib/esg"),
        ]))
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.scoring.similarity_threshold, 0.55);
        assert_eq!(config.scoring.keywords, vec!["emissions", "water use"]);
        assert_eq!(config.scoring.backend, EmbeddingBackend::Local);
        assert_eq!(config.server.upload_dir, PathBuf::from("/var/lib/esg"));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = Config::from_lookup(lookup(&[("SERVER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "SERVER_PORT", .. }));
    }

    #[test]
    fn test_unknown_backend_is_reported() {
        assert!(Config::from_lookup(lookup(&[("EMBEDDING_BACKEND", "openai")])).is_err());
    }
}
