//! OCR fallback extraction
//!
//! Used when a document has no vector text at all. Every page is rendered,
//! recognized word by word, and each word box is mapped from raster space
//! (pixels, top-left origin) into page space (points, bottom-left origin).

use std::sync::Arc;

use crate::document::{BoundingBox, PageSize, PageSource, PipelineError, Region, Result, Stage};

use super::provider::OcrProviderTrait;
use super::types::OcrWord;

/// Map a word box from raster space into page space.
///
/// With `sx = page_width / raster_width` and `sy = page_height / raster_height`:
/// `x0 = x·sx`, `x1 = (x+w)·sx`, `y0 = H − (y+h)·sy`, `y1 = H − y·sy`.
pub fn raster_to_page(word: &OcrWord, raster_width: u32, raster_height: u32, page: PageSize) -> BoundingBox {
    let sx = page.width / raster_width as f32;
    let sy = page.height / raster_height as f32;
    // Provider output is untrusted; add in f32 so huge values cannot overflow
    let (x, y) = (word.bounds.x as f32, word.bounds.y as f32);
    let (w, h) = (word.bounds.width as f32, word.bounds.height as f32);

    BoundingBox {
        x0: x * sx,
        y0: page.height - (y + h) * sy,
        x1: (x + w) * sx,
        y1: page.height - y * sy,
    }
}

/// Word-level region extraction from rendered pages
pub struct OcrFallbackAdapter {
    provider: Arc<dyn OcrProviderTrait>,
    language: String,
}

impl OcrFallbackAdapter {
    pub fn new(provider: Arc<dyn OcrProviderTrait>, language: &str) -> Self {
        Self {
            provider,
            language: language.to_string(),
        }
    }

    /// Extract one sentence region per recognized non-empty word
    pub fn extract(&self, source: &dyn PageSource) -> Result<Vec<Region>> {
        let page_count = source.page_count();
        if page_count == 0 {
            return Ok(Vec::new());
        }

        if !self.provider.is_available() {
            return Err(PipelineError::provider(
                Stage::Ocr,
                format!("{:?} provider is not available", self.provider.provider_type()),
            ));
        }

        let mut regions = Vec::new();
        for page_index in 0..page_count {
            let page_number = page_index + 1;
            let page_size = source
                .page_size(page_index)
                .map_err(|e| PipelineError::provider(Stage::Geometry, e))?;
            let raster = source
                .rasterize(page_index)
                .map_err(|e| PipelineError::provider(Stage::Rasterize, e))?;

            if raster.width == 0 || raster.height == 0 {
                return Err(PipelineError::provider(
                    Stage::Rasterize,
                    format!("page {} rendered to an empty image", page_number),
                ));
            }

            tracing::debug!(
                "OCR on page {} (image size: {}x{})",
                page_number,
                raster.width,
                raster.height
            );

            let words = self
                .provider
                .recognize(&raster, Some(&self.language))
                .map_err(|e| PipelineError::provider(Stage::Ocr, e))?;
            tracing::debug!("Page {}: detected {} OCR words", page_number, words.len());

            regions.extend(
                words
                    .iter()
                    .filter(|word| !word.text.trim().is_empty())
                    .map(|word| {
                        let bbox = raster_to_page(word, raster.width, raster.height, page_size);
                        Region::sentence(page_number, &word.text, bbox, page_size)
                    }),
            );
        }

        tracing::info!("OCR extraction finished: {} regions found", regions.len());
        Ok(regions)
    }
}
