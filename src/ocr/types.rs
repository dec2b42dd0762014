//! OCR Types
//!
//! Defines types for word-level OCR of rendered PDF pages.

use serde::{Deserialize, Serialize};

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// Tesseract OCR (local)
    #[default]
    Tesseract,
}

/// Pixel-based rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Single recognized word
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrWord {
    /// Word text
    pub text: String,
    /// Confidence for this word (0-100, negative when unknown)
    pub confidence: f32,
    /// Bounding box in raster pixels
    pub bounds: PixelRect,
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),
}
