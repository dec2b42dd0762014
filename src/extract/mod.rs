//! Region extraction
//!
//! Turns page geometry into located headings and sentences.
//!
//! # Architecture
//!
//! ```text
//!  StructuredText ──► PageTextIndexer ──► headings
//!                          │
//!                   buffer + line spans
//!                          ▼
//!                SentenceBoundaryMapper ──► SpatialConsolidator ──► sentences
//! ```
//!
//! When the vector path finds nothing in the whole document, the pipeline
//! switches to the OCR path (see [`crate::ocr::OcrFallbackAdapter`]).
//! Both paths emit regions in the same page space.

mod consolidate;
mod indexer;
mod mapper;
mod sentences;

use serde::Serialize;

pub use consolidate::{SpatialConsolidator, DEFAULT_VERTICAL_TOLERANCE};
pub use indexer::{is_heading, PageTextIndexer, DEFAULT_HEADING_FONT_SIZE};
pub use mapper::{MappingStats, SentenceBoundaryMapper};
pub use sentences::{PunctSentenceSplitter, SentenceSplitter};

use crate::document::{PageSource, PipelineError, Region, Result, Stage, StructuredText};

/// Which extraction path produced a region list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPath {
    /// Text drawn with fonts, read from the PDF content
    Vector,
    /// Words recognized on rendered page images
    Ocr,
}

/// Regions of a whole document together with the path that produced them
#[derive(Debug, Clone)]
pub struct Extraction {
    pub path: ExtractionPath,
    pub regions: Vec<Region>,
}

/// Vector-text region extractor
pub struct RegionExtractor {
    indexer: PageTextIndexer,
    splitter: Box<dyn SentenceSplitter>,
    consolidator: SpatialConsolidator,
}

impl Default for RegionExtractor {
    fn default() -> Self {
        Self::new(
            PageTextIndexer::default(),
            Box::new(PunctSentenceSplitter::default()),
            SpatialConsolidator::default(),
        )
    }
}

impl RegionExtractor {
    pub fn new(
        indexer: PageTextIndexer,
        splitter: Box<dyn SentenceSplitter>,
        consolidator: SpatialConsolidator,
    ) -> Self {
        Self {
            indexer,
            splitter,
            consolidator,
        }
    }

    /// Extract headings then sentences from one page. `page_number` is 1-based.
    pub fn extract_page(&self, page_number: usize, page: &StructuredText) -> Vec<Region> {
        let indexed = self.indexer.index(page_number, page);
        tracing::debug!(
            "Page {}: assembled {} line spans ({} headings)",
            page_number,
            indexed.spans.len(),
            indexed.headings.len()
        );

        let mapper = SentenceBoundaryMapper::new(self.splitter.as_ref(), &self.consolidator);
        let (sentences, stats) = mapper.map(page_number, page.size, &indexed);
        tracing::debug!(
            "Page {}: {} sentences located, {} unresolved, {} without geometry",
            page_number,
            stats.resolved,
            stats.unresolved_offset,
            stats.no_geometry
        );

        let mut regions = indexed.headings;
        regions.extend(sentences);
        regions
    }

    /// Extract regions from every page of a document
    pub fn extract(&self, source: &dyn PageSource) -> Result<Vec<Region>> {
        let mut regions = Vec::new();

        for page_index in 0..source.page_count() {
            let page = source
                .structured_text(page_index)
                .map_err(|e| PipelineError::provider(Stage::Geometry, e))?;
            tracing::debug!(
                "Processing page {} (size: {:.1} x {:.1})",
                page_index + 1,
                page.size.width,
                page.size.height
            );
            regions.extend(self.extract_page(page_index + 1, &page));
        }

        tracing::info!(
            "Vector extraction completed: {} regions from {} pages",
            regions.len(),
            source.page_count()
        );
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        BoundingBox, MockPageSource, PageSize, RegionKind, TextBlock, TextLine, TextSpan,
    };

    fn line(x0: f32, y: f32, x1: f32, text: &str, size: f32) -> TextLine {
        TextLine {
            bbox: BoundingBox::new(x0, y, x1, y + size),
            spans: vec![TextSpan::new(text, size)],
        }
    }

    fn page(index: usize, blocks: Vec<Vec<TextLine>>) -> StructuredText {
        StructuredText {
            page_index: index,
            size: PageSize::new(612.0, 792.0),
            blocks: blocks
                .into_iter()
                .map(|lines| TextBlock {
                    bbox: BoundingBox::new(0.0, 0.0, 612.0, 792.0),
                    lines,
                })
                .collect(),
        }
    }

    #[test]
    fn test_heading_and_sentence_on_one_page() {
        let extractor = RegionExtractor::default();
        let regions = extractor.extract_page(
            1,
            &page(
                0,
                vec![vec![
                    line(72.0, 720.0, 400.0, "CLIMATE RISK DISCLOSURE", 20.0),
                    line(72.0, 690.0, 380.0, "The company reduced emissions by 10%.", 10.0),
                ]],
            ),
        );

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].kind, RegionKind::Heading);
        assert_eq!(regions[0].text, "CLIMATE RISK DISCLOSURE");
        assert_eq!(regions[1].kind, RegionKind::Sentence);
        assert_eq!(regions[1].text, "The company reduced emissions by 10%.");
        assert_eq!(regions[1].bbox, BoundingBox::new(72.0, 690.0, 380.0, 700.0));
        assert_eq!(regions[1].font_size, None);
    }

    #[test]
    fn test_sentence_across_columns_drops_distant_block() {
        // A left-column line and a right-column fragment far below it end up
        // adjacent in the buffer; the third line anchors the median.
        let extractor = RegionExtractor::default();
        let regions = extractor.extract_page(
            1,
            &page(
                0,
                vec![
                    vec![
                        line(50.0, 90.0, 300.0, "Water use in our", 20.0),
                        line(60.0, 92.0, 200.0, "plants", 16.0),
                    ],
                    vec![line(320.0, 490.0, 560.0, "fell sharply.", 20.0)],
                ],
            ),
        );

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].text, "Water use in our plants fell sharply.");
        assert_eq!(regions[0].bbox, BoundingBox::new(50.0, 90.0, 300.0, 110.0));
    }

    #[test]
    fn test_regions_keep_page_order_and_numbers() {
        let source = MockPageSource::new(vec![
            page(0, vec![vec![line(72.0, 700.0, 300.0, "First page text.", 10.0)]]),
            page(1, vec![]),
            page(2, vec![vec![line(72.0, 700.0, 300.0, "Third page text.", 10.0)]]),
        ]);

        let regions = RegionExtractor::default().extract(&source).unwrap();
        let pages: Vec<usize> = regions.iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![1, 3]);
    }

    #[test]
    fn test_regions_stay_inside_page() {
        let source = MockPageSource::new(vec![page(
            0,
            vec![vec![line(-10.0, 785.0, 640.0, "Overflowing line of text.", 12.0)]],
        )]);

        for region in RegionExtractor::default().extract(&source).unwrap() {
            let b = region.bbox;
            assert!(b.x0 <= b.x1 && b.y0 <= b.y1);
            assert!(b.x0 >= 0.0 && b.x1 <= region.page_size.width);
            assert!(b.y0 >= 0.0 && b.y1 <= region.page_size.height);
        }
    }

    #[test]
    fn test_empty_document_yields_no_regions() {
        let source = MockPageSource::new(vec![page(0, vec![])]);
        assert!(RegionExtractor::default().extract(&source).unwrap().is_empty());
    }
}
