//! OCR Module
//!
//! Word-level OCR for scanned PDFs, used as the fallback extraction path
//! when a document carries no vector text.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use esg_lens::ocr::{OcrFallbackAdapter, TesseractProvider};
//!
//! let adapter = OcrFallbackAdapter::new(Arc::new(TesseractProvider::new("eng")), "eng");
//! let regions = adapter.extract(&page_source)?;
//! ```

mod fallback;
mod provider;
mod types;

pub use fallback::{raster_to_page, OcrFallbackAdapter};
pub use provider::{parse_tsv, OcrProviderTrait, TesseractProvider};
pub use types::{OcrError, OcrProvider, OcrWord, PixelRect};

#[cfg(test)]
pub use provider::MockOcrProvider;
