//! Structured text extraction
//!
//! Reads MuPDF's block/line/char tree and turns it into the crate's
//! block/line/span tree. MuPDF reports geometry with a top-left origin;
//! everything leaving this module is flipped into page space.

use mupdf::{Page, Rect, TextPageOptions};

use crate::document::{
    BoundingBox, PageSize, ProviderError, StructuredText, TextBlock, TextLine, TextSpan,
};

/// Characters whose sizes differ by less than this share a span
const FONT_SIZE_EPSILON: f32 = 0.01;

/// Page size and the mapping from MuPDF device space into page space
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageFrame {
    origin_x: f32,
    origin_y: f32,
    pub size: PageSize,
}

impl PageFrame {
    pub fn of(page: &Page) -> Result<Self, ProviderError> {
        let bounds = page.bounds()?;
        Ok(Self {
            origin_x: bounds.x0,
            origin_y: bounds.y0,
            size: PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0),
        })
    }

    /// Convert a top-left rectangle into a bottom-left page-space box
    pub fn to_page_space(&self, rect: &Rect) -> BoundingBox {
        BoundingBox::new(
            rect.x0 - self.origin_x,
            rect.y0 - self.origin_y,
            rect.x1 - self.origin_x,
            rect.y1 - self.origin_y,
        )
        .flip_vertical(self.size.height)
    }
}

/// Extract the block/line/span tree of a page
pub fn extract_structured_text(page: &Page, page_index: usize) -> Result<StructuredText, ProviderError> {
    let frame = PageFrame::of(page)?;
    let text_page = page.to_text_page(TextPageOptions::empty())?;

    let mut blocks = Vec::new();
    for block in text_page.blocks() {
        let mut lines = Vec::new();

        for line in block.lines() {
            let mut spans: Vec<TextSpan> = Vec::new();
            for ch in line.chars() {
                let Some(c) = ch.char() else { continue };
                let size = ch.size();
                match spans.last_mut() {
                    Some(span) if (span.font_size - size).abs() < FONT_SIZE_EPSILON => span.text.push(c),
                    _ => spans.push(TextSpan::new(c.to_string(), size)),
                }
            }

            if spans.is_empty() {
                continue;
            }
            lines.push(TextLine {
                bbox: frame.to_page_space(&line.bounds()),
                spans,
            });
        }

        if lines.is_empty() {
            continue;
        }
        blocks.push(TextBlock {
            bbox: frame.to_page_space(&block.bounds()),
            lines,
        });
    }

    Ok(StructuredText {
        page_index,
        size: frame.size,
        blocks,
    })
}
