//! MuPDF page source
//!
//! Opens PDFs with MuPDF and exposes them through [`crate::document::PageSource`].
//!
//! # Thread Safety
//!
//! MuPDF's `fz_context` is **NOT thread-safe**. [`SafeDocument`] opens a
//! fresh document per operation and serializes access with a mutex, so one
//! source can be shared across threads.
//!
//! # Usage
//!
//! ```rust,ignore
//! use esg_lens::mupdf::MupdfPageSource;
//! use esg_lens::document::PageSource;
//!
//! let source = MupdfPageSource::open("report.pdf", 1.0)?;
//! let stext = source.structured_text(0)?;
//! ```

#[cfg(test)]
pub(crate) mod fixtures;
mod raster;
mod safe;
mod source;
mod stext;

pub use raster::render_page;
pub use safe::{DocumentSource, SafeDocument};
pub use source::{MupdfPageSource, DEFAULT_RENDER_SCALE};
pub use stext::extract_structured_text;
