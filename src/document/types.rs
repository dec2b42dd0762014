//! Core document types
//!
//! Page geometry handed over by a provider and the regions the pipeline
//! produces from it. Every box in this module lives in page space:
//! bottom-left origin, point units.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Build a box from two corners, normalizing so that `x0 <= x1` and `y0 <= y1`
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Vertical center, used to detect boxes that belong to another block
    pub fn vertical_center(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Smallest box containing both `self` and `other`
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Mirror the box around the horizontal axis of a page.
    ///
    /// Converts between top-left and bottom-left origin; applying it twice
    /// returns the original box.
    pub fn flip_vertical(&self, page_height: f32) -> BoundingBox {
        BoundingBox::new(self.x0, page_height - self.y1, self.x1, page_height - self.y0)
    }

    /// Clamp all edges into `[0, width] x [0, height]`
    pub fn clamp_to(&self, page: PageSize) -> BoundingBox {
        let clamp_x = |v: f32| v.clamp(0.0, page.width.max(0.0));
        let clamp_y = |v: f32| v.clamp(0.0, page.height.max(0.0));
        BoundingBox::new(
            clamp_x(self.x0),
            clamp_y(self.y0),
            clamp_x(self.x1),
            clamp_y(self.y1),
        )
    }
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Structured text of one page, as reported by a geometry provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredText {
    /// Page index (0-based)
    pub page_index: usize,
    /// Page dimensions
    pub size: PageSize,
    /// Text blocks in provider order
    pub blocks: Vec<TextBlock>,
}

/// Text block (paragraph, column fragment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    pub bbox: BoundingBox,
    pub lines: Vec<TextLine>,
}

/// Text line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub bbox: BoundingBox,
    pub spans: Vec<TextSpan>,
}

/// Run of text sharing one font within a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub text: String,
    pub font_size: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// Rasterized page handed to an OCR provider
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// PNG-encoded image
    pub data: Vec<u8>,
    /// Raster width in pixels
    pub width: u32,
    /// Raster height in pixels
    pub height: u32,
}

/// Kind of extracted region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Heading,
    Sentence,
}

/// A located unit of text on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Page number (1-based)
    pub page: usize,
    #[serde(rename = "type")]
    pub kind: RegionKind,
    pub text: String,
    #[serde(rename = "coords")]
    pub bbox: BoundingBox,
    #[serde(rename = "page_dimensions")]
    pub page_size: PageSize,
    /// Largest font size on the line; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

impl Region {
    pub fn heading(
        page: usize,
        text: &str,
        bbox: BoundingBox,
        page_size: PageSize,
        font_size: f32,
    ) -> Self {
        Self {
            page,
            kind: RegionKind::Heading,
            text: text.trim().to_string(),
            bbox: bbox.clamp_to(page_size),
            page_size,
            font_size: Some(font_size),
        }
    }

    pub fn sentence(page: usize, text: &str, bbox: BoundingBox, page_size: PageSize) -> Self {
        Self {
            page,
            kind: RegionKind::Sentence,
            text: text.trim().to_string(),
            bbox: bbox.clamp_to(page_size),
            page_size,
            font_size: None,
        }
    }
}

/// A region that passed relevance scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRegion {
    #[serde(flatten)]
    pub region: Region,
    /// Best cosine similarity against the keyword basis
    pub similarity: f32,
}
