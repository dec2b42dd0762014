//! Document analysis pipeline
//!
//! Vector extraction, OCR fallback, then relevance scoring. One pipeline
//! is built at startup and shared; every call is independent.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{Config, EmbeddingBackend, ScoringConfig};
use crate::document::{PageSource, PipelineError, Result, ScoredRegion, Stage};
use crate::extract::{
    Extraction, ExtractionPath, PageTextIndexer, PunctSentenceSplitter, RegionExtractor,
    SpatialConsolidator,
};
use crate::mupdf::{MupdfPageSource, DEFAULT_RENDER_SCALE};
use crate::ocr::{OcrFallbackAdapter, TesseractProvider};
use crate::relevance::{Embedder, OllamaEmbedder, RelevanceScorer};

/// Result of analyzing one document
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Path that produced the regions
    pub path: ExtractionPath,
    pub pages: usize,
    /// Regions found before relevance filtering
    pub extracted: usize,
    /// Relevant regions in extraction order
    pub regions: Vec<ScoredRegion>,
}

pub struct Pipeline {
    extractor: RegionExtractor,
    ocr: OcrFallbackAdapter,
    scorer: Arc<RelevanceScorer>,
    render_scale: f32,
}

impl Pipeline {
    pub fn new(extractor: RegionExtractor, ocr: OcrFallbackAdapter, scorer: Arc<RelevanceScorer>) -> Self {
        Self {
            extractor,
            ocr,
            scorer,
            render_scale: DEFAULT_RENDER_SCALE,
        }
    }

    pub fn with_render_scale(mut self, render_scale: f32) -> Self {
        self.render_scale = render_scale;
        self
    }

    /// Build every component from configuration.
    ///
    /// Embeds the keyword basis, so the embedding backend must be reachable.
    /// Blocking; run off the async runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let extraction = &config.extraction;
        let extractor = RegionExtractor::new(
            PageTextIndexer::new(extraction.heading_font_size),
            Box::new(PunctSentenceSplitter::default()),
            SpatialConsolidator::new(extraction.vertical_tolerance),
        );
        let ocr = OcrFallbackAdapter::new(
            Arc::new(TesseractProvider::new(&extraction.ocr_language)),
            &extraction.ocr_language,
        );

        let embedder = build_embedder(&config.scoring)?;
        let scorer = RelevanceScorer::new(
            embedder,
            config.scoring.keywords.as_slice(),
            config.scoring.similarity_threshold,
        )?;

        Ok(Self::new(extractor, ocr, Arc::new(scorer)).with_render_scale(extraction.render_scale))
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// Extract regions, switching to OCR when the document has no vector text
    pub fn extract(&self, source: &dyn PageSource) -> Result<Extraction> {
        let regions = self.extractor.extract(source)?;
        if !regions.is_empty() {
            return Ok(Extraction {
                path: ExtractionPath::Vector,
                regions,
            });
        }

        tracing::warn!(
            "No vector text in {} pages, falling back to OCR",
            source.page_count()
        );
        let regions = self.ocr.extract(source)?;
        if regions.is_empty() {
            return Err(PipelineError::NoExtractableContent);
        }

        Ok(Extraction {
            path: ExtractionPath::Ocr,
            regions,
        })
    }

    /// Extract and score a document
    pub fn analyze(&self, source: &dyn PageSource) -> Result<Analysis> {
        let Extraction { path, regions } = self.extract(source)?;
        let extracted = regions.len();
        let regions = self.scorer.score(regions)?;

        tracing::info!(
            "Analysis complete via {:?} path: {} of {} regions relevant",
            path,
            regions.len(),
            extracted
        );

        Ok(Analysis {
            path,
            pages: source.page_count(),
            extracted,
            regions,
        })
    }

    /// Open a PDF with MuPDF and analyze it
    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<Analysis> {
        let path = path.as_ref();
        tracing::debug!("Opening {}", path.display());
        let source = MupdfPageSource::open(path, self.render_scale)
            .map_err(|e| PipelineError::provider(Stage::Geometry, e))?;
        self.analyze(&source)
    }

    /// Analyze a PDF held in memory.
    ///
    /// The document is read from `data` only, so a file on disk with the same
    /// name can be replaced while this runs.
    pub fn analyze_bytes(&self, data: Vec<u8>) -> Result<Analysis> {
        tracing::debug!("Opening {} byte document", data.len());
        let source = MupdfPageSource::from_bytes(data, self.render_scale)
            .map_err(|e| PipelineError::provider(Stage::Geometry, e))?;
        self.analyze(&source)
    }
}

fn build_embedder(scoring: &ScoringConfig) -> Result<Arc<dyn Embedder>> {
    match scoring.backend {
        EmbeddingBackend::Ollama => Ok(Arc::new(OllamaEmbedder::new(
            &scoring.ollama_url,
            &scoring.ollama_model,
        ))),
        #[cfg(feature = "local-embeddings")]
        EmbeddingBackend::Local => {
            let embedder = crate::relevance::LocalEmbedder::new()
                .map_err(|e| PipelineError::provider(Stage::Embedding, e))?;
            Ok(Arc::new(embedder))
        }
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingBackend::Local => Err(PipelineError::Config(
            "local embeddings require the `local-embeddings` feature".to_string(),
        )),
    }
}
