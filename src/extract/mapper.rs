//! Sentence to geometry mapping
//!
//! Segments a page buffer into sentences, finds each sentence's byte range
//! in the buffer, and resolves the line boxes overlapping that range into
//! one rectangle.
//!
//! Offsets are resolved with a forward cursor: each lookup starts where
//! the previous sentence ended, so a sentence repeated verbatim resolves to
//! its own occurrence instead of the first one in the buffer. A lookup that
//! misses after the cursor retries from the start of the buffer.

use crate::document::{BoundingBox, PageSize, Region};

use super::consolidate::SpatialConsolidator;
use super::indexer::{truncate, IndexedPage};
use super::sentences::SentenceSplitter;

/// Per-page mapping counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingStats {
    /// Sentences that became regions
    pub resolved: usize,
    /// Sentences whose text could not be found in the buffer
    pub unresolved_offset: usize,
    /// Sentences with no overlapping line box
    pub no_geometry: usize,
}

/// Maps segmented sentences back onto line geometry
pub struct SentenceBoundaryMapper<'a> {
    splitter: &'a dyn SentenceSplitter,
    consolidator: &'a SpatialConsolidator,
}

impl<'a> SentenceBoundaryMapper<'a> {
    pub fn new(splitter: &'a dyn SentenceSplitter, consolidator: &'a SpatialConsolidator) -> Self {
        Self {
            splitter,
            consolidator,
        }
    }

    /// Produce sentence regions for one indexed page
    pub(crate) fn map(
        &self,
        page_number: usize,
        page_size: PageSize,
        indexed: &IndexedPage,
    ) -> (Vec<Region>, MappingStats) {
        let buffer = indexed.buffer.as_str();
        let mut regions = Vec::new();
        let mut stats = MappingStats::default();
        let mut cursor = 0;

        for sentence in self.splitter.split(buffer) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            let Some(start) = locate(buffer, sentence, cursor) else {
                stats.unresolved_offset += 1;
                tracing::debug!(
                    "Page {}: sentence not found in buffer: '{}'",
                    page_number,
                    truncate(sentence, 32)
                );
                continue;
            };
            let end = start + sentence.len();
            cursor = end;

            let candidates: Vec<BoundingBox> = indexed
                .spans
                .iter()
                .filter(|span| span.overlaps(start, end))
                .map(|span| span.bbox)
                .collect();

            let Some(bbox) = self.consolidator.consolidate(&candidates) else {
                stats.no_geometry += 1;
                tracing::debug!(
                    "Page {}: skipped sentence (no bbox): '{}'",
                    page_number,
                    truncate(sentence, 32)
                );
                continue;
            };

            stats.resolved += 1;
            regions.push(Region::sentence(page_number, sentence, bbox, page_size));
        }

        (regions, stats)
    }
}

/// Byte offset of `needle` at or after `cursor`, else anywhere in `haystack`
fn locate(haystack: &str, needle: &str, cursor: usize) -> Option<usize> {
    haystack
        .get(cursor..)
        .and_then(|rest| rest.find(needle))
        .map(|idx| idx + cursor)
        .or_else(|| haystack.find(needle))
}
