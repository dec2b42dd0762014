//! Page text indexing
//!
//! Walks the block/line/span tree of a page, emits heading lines as
//! regions, and flattens every other line into one text buffer while
//! remembering which byte range of the buffer came from which line box.

use crate::document::{BoundingBox, Region, StructuredText};

/// Default font size (points) a line must exceed to count as a heading
pub const DEFAULT_HEADING_FONT_SIZE: f32 = 16.0;

/// Byte range of the page buffer written by one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LineSpan {
    pub start: usize,
    pub end: usize,
    pub bbox: BoundingBox,
}

impl LineSpan {
    /// Whether `[start, end)` shares at least one byte with this span
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Output of indexing one page
#[derive(Debug, Default)]
pub(crate) struct IndexedPage {
    pub headings: Vec<Region>,
    pub buffer: String,
    pub spans: Vec<LineSpan>,
}

/// Heading heuristic: fully upper-case text set larger than `threshold`.
///
/// "Upper-case" means at least one cased character and no lower-case
/// ones, so digits and punctuation do not disqualify a line.
pub fn is_heading(text: &str, font_size: f32, threshold: f32) -> bool {
    let has_upper = text.chars().any(char::is_uppercase);
    let has_lower = text.chars().any(char::is_lowercase);
    has_upper && !has_lower && font_size > threshold
}

/// Flattens page lines into a searchable buffer
#[derive(Debug, Clone)]
pub struct PageTextIndexer {
    heading_font_size: f32,
}

impl Default for PageTextIndexer {
    fn default() -> Self {
        Self::new(DEFAULT_HEADING_FONT_SIZE)
    }
}

impl PageTextIndexer {
    pub fn new(heading_font_size: f32) -> Self {
        Self { heading_font_size }
    }

    pub fn heading_font_size(&self) -> f32 {
        self.heading_font_size
    }

    /// Index one page. `page_number` is 1-based.
    pub(crate) fn index(&self, page_number: usize, page: &StructuredText) -> IndexedPage {
        let mut indexed = IndexedPage::default();

        for line in page.blocks.iter().flat_map(|block| block.lines.iter()) {
            let parts: Vec<(&str, f32)> = line
                .spans
                .iter()
                .map(|span| (span.text.trim(), span.font_size))
                .filter(|(text, _)| !text.is_empty())
                .collect();

            if parts.is_empty() {
                continue;
            }

            let font_size = parts
                .iter()
                .map(|(_, size)| *size)
                .fold(f32::MIN, f32::max);
            let line_text = parts
                .iter()
                .map(|(text, _)| *text)
                .collect::<Vec<_>>()
                .join(" ");
            let line_text = line_text.trim();

            if is_heading(line_text, font_size, self.heading_font_size) {
                tracing::debug!(
                    "Page {}: heading '{}' ({:.1}pt)",
                    page_number,
                    truncate(line_text, 30),
                    font_size
                );
                indexed.headings.push(Region::heading(
                    page_number,
                    line_text,
                    line.bbox,
                    page.size,
                    font_size,
                ));
                continue;
            }

            let start = indexed.buffer.len();
            indexed.buffer.push_str(line_text);
            indexed.buffer.push(' ');
            indexed.spans.push(LineSpan {
                start,
                end: indexed.buffer.len(),
                bbox: line.bbox,
            });
        }

        indexed
    }
}

/// Shorten text for log lines without splitting a character
pub(crate) fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PageSize, RegionKind, TextBlock, TextLine, TextSpan};

    fn line(y: f32, spans: &[(&str, f32)]) -> TextLine {
        TextLine {
            bbox: BoundingBox::new(72.0, y, 540.0, y + 12.0),
            spans: spans
                .iter()
                .map(|(text, size)| TextSpan::new(*text, *size))
                .collect(),
        }
    }

    fn page(lines: Vec<TextLine>) -> StructuredText {
        StructuredText {
            page_index: 0,
            size: PageSize::new(612.0, 792.0),
            blocks: vec![TextBlock {
                bbox: BoundingBox::new(72.0, 0.0, 540.0, 792.0),
                lines,
            }],
        }
    }

    #[test]
    fn test_is_heading_requires_upper_case_and_size() {
        assert!(is_heading("CLIMATE RISK DISCLOSURE", 18.0, 16.0));
        assert!(is_heading("SCOPE 3", 20.0, 16.0));
        assert!(!is_heading("Climate Risk", 18.0, 16.0));
        assert!(!is_heading("CLIMATE RISK", 16.0, 16.0));
        assert!(!is_heading("2024", 24.0, 16.0));
    }

    #[test]
    fn test_heading_lines_are_emitted_not_buffered() {
        let indexer = PageTextIndexer::default();
        let indexed = indexer.index(
            1,
            &page(vec![
                line(700.0, &[("CLIMATE RISK DISCLOSURE", 24.0)]),
                line(650.0, &[("The company reduced", 10.0), ("emissions.", 10.0)]),
            ]),
        );

        assert_eq!(indexed.headings.len(), 1);
        assert_eq!(indexed.headings[0].kind, RegionKind::Heading);
        assert_eq!(indexed.headings[0].font_size, Some(24.0));
        assert_eq!(indexed.buffer, "The company reduced emissions. ");
        assert_eq!(indexed.spans.len(), 1);
    }

    #[test]
    fn test_spans_are_trimmed_and_joined() {
        let indexer = PageTextIndexer::default();
        let indexed = indexer.index(
            1,
            &page(vec![line(650.0, &[("  Net ", 10.0), ("   ", 10.0), (" zero", 10.0)])]),
        );
        assert_eq!(indexed.buffer, "Net zero ");
    }

    #[test]
    fn test_line_ranges_map_back_to_buffer() {
        let indexer = PageTextIndexer::default();
        let indexed = indexer.index(
            1,
            &page(vec![
                line(650.0, &[("First line", 10.0)]),
                line(636.0, &[("second line", 10.0)]),
            ]),
        );

        let first = indexed.spans[0];
        let second = indexed.spans[1];
        assert_eq!(&indexed.buffer[first.start..first.end], "First line ");
        assert_eq!(&indexed.buffer[second.start..second.end], "second line ");
        assert_eq!(first.bbox.y0, 650.0);
        assert_eq!(second.bbox.y0, 636.0);
    }

    #[test]
    fn test_empty_lines_contribute_nothing() {
        let indexer = PageTextIndexer::default();
        let indexed = indexer.index(
            1,
            &page(vec![line(650.0, &[("", 10.0), ("  ", 12.0)]), line(600.0, &[])]),
        );
        assert!(indexed.buffer.is_empty());
        assert!(indexed.spans.is_empty());
        assert!(indexed.headings.is_empty());
    }

    #[test]
    fn test_line_span_overlap_is_half_open() {
        let span = LineSpan {
            start: 10,
            end: 20,
            bbox: BoundingBox::default(),
        };
        assert!(span.overlaps(19, 25));
        assert!(span.overlaps(0, 11));
        assert!(!span.overlaps(20, 30));
        assert!(!span.overlaps(0, 10));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("émissions", 3), "émi");
        assert_eq!(truncate("CO2", 10), "CO2");
    }
}
