//! Document abstraction
//!
//! Format-agnostic page geometry, the regions extracted from it, and the
//! provider seam the pipeline reads pages through.
//!
//! # Coordinate contract
//!
//! Every [`BoundingBox`] in this crate is expressed in page space:
//! bottom-left origin, point units. Providers that report top-left
//! geometry (MuPDF, OCR engines) convert before handing boxes over.

mod error;
mod traits;
mod types;

pub use error::{PipelineError, ProviderError, Result, Stage};
pub use traits::PageSource;
pub use types::{
    BoundingBox, PageSize, RasterPage, Region, RegionKind, ScoredRegion, StructuredText,
    TextBlock, TextLine, TextSpan,
};

#[cfg(test)]
pub use traits::MockPageSource;
