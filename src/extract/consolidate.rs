//! Spatial consolidation of candidate boxes
//!
//! A sentence cut from a flattened page buffer can touch lines that sit in
//! unrelated columns or blocks. Boxes whose vertical center is far from the
//! median center are dropped before the rest are merged.

use crate::document::BoundingBox;

/// Default maximum distance (points) between a box's vertical center and the median
pub const DEFAULT_VERTICAL_TOLERANCE: f32 = 50.0;

/// Merges the line boxes of one sentence into a single rectangle
#[derive(Debug, Clone)]
pub struct SpatialConsolidator {
    tolerance: f32,
}

impl Default for SpatialConsolidator {
    fn default() -> Self {
        Self::new(DEFAULT_VERTICAL_TOLERANCE)
    }
}

impl SpatialConsolidator {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Consolidate candidates into one box.
    ///
    /// Returns `None` only for an empty candidate list.
    pub fn consolidate(&self, candidates: &[BoundingBox]) -> Option<BoundingBox> {
        match candidates {
            [] => None,
            [single] => Some(*single),
            _ => {
                let kept = self.filter_outliers(candidates);
                let pool = if kept.is_empty() {
                    tracing::warn!(
                        "Vertical filter rejected all {} boxes, using unfiltered union",
                        candidates.len()
                    );
                    candidates.to_vec()
                } else {
                    kept
                };
                merge(&pool)
            }
        }
    }

    fn filter_outliers(&self, candidates: &[BoundingBox]) -> Vec<BoundingBox> {
        let centers: Vec<f32> = candidates.iter().map(BoundingBox::vertical_center).collect();
        let Some(median) = median(&centers) else {
            return Vec::new();
        };

        candidates
            .iter()
            .zip(&centers)
            .filter(|(_, center)| (*center - median).abs() < self.tolerance)
            .map(|(bbox, _)| *bbox)
            .collect()
    }
}

/// Median of a list; the mean of the two middle values for even lengths
fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn merge(boxes: &[BoundingBox]) -> Option<BoundingBox> {
    let (first, rest) = boxes.split_first()?;
    Some(rest.iter().fold(*first, |acc, bbox| acc.union(bbox)))
}
