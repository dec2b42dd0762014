//! ESG Lens Library
//!
//! Locates headings and sentences in PDF reports, with page coordinates
//! suitable for highlighting, and keeps the ones relevant to a topic
//! keyword basis. The HTTP server binary is in main.rs.
//!
//! # Modules
//!
//! - `document`: Page geometry, regions, and the `PageSource` seam
//! - `extract`: Vector-text region extraction
//! - `ocr`: OCR fallback for scanned documents
//! - `relevance`: Embedding-based relevance scoring
//! - `mupdf`: MuPDF-backed page source
//! - `pipeline`: End-to-end analysis

pub mod config;
pub mod document;
pub mod extract;
pub mod mupdf;
pub mod ocr;
pub mod pipeline;
pub mod relevance;
