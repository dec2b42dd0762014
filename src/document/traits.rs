//! Document provider trait
//!
//! The pipeline never talks to a PDF library directly. It reads pages
//! through [`PageSource`], which the MuPDF wrapper implements for real
//! documents and tests implement with synthetic pages.

use super::error::ProviderError;
use super::types::{PageSize, RasterPage, StructuredText};

/// Per-page access to geometry and rasters of one open document
///
/// Every box a source reports must already be in page space
/// (bottom-left origin, point units).
pub trait PageSource: Send + Sync {
    /// Number of pages
    fn page_count(&self) -> usize;

    /// Page dimensions in points
    fn page_size(&self, page_index: usize) -> Result<PageSize, ProviderError>;

    /// Block, line and span tree of a page
    fn structured_text(&self, page_index: usize) -> Result<StructuredText, ProviderError>;

    /// Render a page at the source's configured resolution
    fn rasterize(&self, page_index: usize) -> Result<RasterPage, ProviderError>;
}

/// In-memory page source for tests
#[cfg(test)]
pub struct MockPageSource {
    pub pages: Vec<StructuredText>,
    pub rasters: Vec<RasterPage>,
    pub rasterize_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockPageSource {
    pub fn new(pages: Vec<StructuredText>) -> Self {
        Self {
            pages,
            rasters: Vec::new(),
            rasterize_calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_rasters(mut self, rasters: Vec<RasterPage>) -> Self {
        self.rasters = rasters;
        self
    }

    pub fn rasterize_count(&self) -> usize {
        self.rasterize_calls
            .load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl PageSource for MockPageSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page_index: usize) -> Result<PageSize, ProviderError> {
        self.pages
            .get(page_index)
            .map(|p| p.size)
            .ok_or(ProviderError::PageNotFound(page_index))
    }

    fn structured_text(&self, page_index: usize) -> Result<StructuredText, ProviderError> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or(ProviderError::PageNotFound(page_index))
    }

    fn rasterize(&self, page_index: usize) -> Result<RasterPage, ProviderError> {
        self.rasterize_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.rasters
            .get(page_index)
            .cloned()
            .ok_or_else(|| ProviderError::RenderError(format!("no raster for page {}", page_index)))
    }
}
