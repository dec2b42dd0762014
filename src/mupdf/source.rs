//! [`PageSource`] backed by MuPDF

use std::path::Path;

use crate::document::{PageSize, PageSource, ProviderError, RasterPage, StructuredText};

use super::raster::render_page;
use super::safe::SafeDocument;
use super::stext::{extract_structured_text, PageFrame};

pub const DEFAULT_RENDER_SCALE: f32 = 1.0;

/// MuPDF-backed page source
pub struct MupdfPageSource {
    doc: SafeDocument,
    render_scale: f32,
}

impl MupdfPageSource {
    pub fn open<P: AsRef<Path>>(path: P, render_scale: f32) -> Result<Self, ProviderError> {
        Ok(Self::new(SafeDocument::from_path(path)?, render_scale))
    }

    pub fn from_bytes(data: Vec<u8>, render_scale: f32) -> Result<Self, ProviderError> {
        Ok(Self::new(SafeDocument::from_bytes(data)?, render_scale))
    }

    pub fn new(doc: SafeDocument, render_scale: f32) -> Self {
        Self {
            doc,
            render_scale: render_scale.clamp(0.1, 8.0),
        }
    }

    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }
}

impl PageSource for MupdfPageSource {
    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    fn page_size(&self, page_index: usize) -> Result<PageSize, ProviderError> {
        self.doc
            .with_page(page_index, |page| Ok(PageFrame::of(page)?.size))
    }

    fn structured_text(&self, page_index: usize) -> Result<StructuredText, ProviderError> {
        self.doc
            .with_page(page_index, |page| extract_structured_text(page, page_index))
    }

    fn rasterize(&self, page_index: usize) -> Result<RasterPage, ProviderError> {
        let scale = self.render_scale;
        self.doc.with_page(page_index, |page| render_page(page, scale))
    }
}
