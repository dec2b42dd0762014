//! Pipeline error types
//!
//! Provider-level failures are collapsed into a single [`PipelineError`]
//! tagged with the stage that raised them.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Pipeline stage that talks to an external provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Opening the document and reading its page geometry
    Geometry,
    /// Rendering a page for OCR
    Rasterize,
    /// Word recognition on a rendered page
    Ocr,
    /// Text embedding
    Embedding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Geometry => "geometry",
            Stage::Rasterize => "rasterize",
            Stage::Ocr => "ocr",
            Stage::Embedding => "embedding",
        };
        f.write_str(name)
    }
}

/// Failure reported by a document provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Page index out of range
    #[error("Page not found: index {0}")]
    PageNotFound(usize),

    /// Failed to parse document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to render a page
    #[error("Render error: {0}")]
    RenderError(String),

    /// MuPDF context error
    #[error("MuPDF context error: {0}")]
    ContextError(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Image processing error
    #[error("Image error: {0}")]
    ImageError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<mupdf::Error> for ProviderError {
    fn from(err: mupdf::Error) -> Self {
        ProviderError::ContextError(err.to_string())
    }
}

/// Error returned by the pipeline entry points
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Neither vector text nor OCR produced a single region
    #[error("No extractable content found in document")]
    NoExtractableContent,

    /// An external provider failed; the whole document is abandoned
    #[error("{stage} stage failed: {message}")]
    Provider { stage: Stage, message: String },

    /// Invalid pipeline setup
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    /// Wrap a provider failure with the stage it came from
    pub fn provider(stage: Stage, err: impl fmt::Display) -> Self {
        PipelineError::Provider {
            stage,
            message: err.to_string(),
        }
    }

    /// Stage of a provider failure, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Provider { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_carries_stage() {
        let err = PipelineError::provider(Stage::Ocr, ProviderError::PageNotFound(3));
        assert_eq!(err.stage(), Some(Stage::Ocr));
        assert_eq!(err.to_string(), "ocr stage failed: Page not found: index 3");
    }

    #[test]
    fn test_no_content_has_no_stage() {
        assert_eq!(PipelineError::NoExtractableContent.stage(), None);
    }
}
