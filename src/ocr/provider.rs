//! OCR Providers
//!
//! Defines the provider trait and the Tesseract implementation.

use std::process::Command;

use crate::document::RasterPage;

use super::types::{OcrError, OcrProvider, OcrWord, PixelRect};

/// OCR provider trait
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    fn is_available(&self) -> bool;

    /// Recognize words on a rendered page, in raster pixel space
    fn recognize(&self, image: &RasterPage, language: Option<&str>) -> Result<Vec<OcrWord>, OcrError>;
}

/// Tesseract OCR provider
///
/// Shells out to the `tesseract` binary and reads its TSV report, which
/// carries one row per recognized word with a pixel bounding box.
pub struct TesseractProvider {
    /// Default language
    default_language: String,
    /// Binary to invoke
    command: String,
}

impl TesseractProvider {
    pub fn new(default_language: &str) -> Self {
        Self {
            default_language: default_language.to_string(),
            command: "tesseract".to_string(),
        }
    }

    /// Use a binary other than `tesseract` from `PATH`
    pub fn with_command(mut self, command: &str) -> Self {
        self.command = command.to_string();
        self
    }
}

impl OcrProviderTrait for TesseractProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn recognize(&self, image: &RasterPage, language: Option<&str>) -> Result<Vec<OcrWord>, OcrError> {
        if image.data.is_empty() {
            return Err(OcrError::InvalidRaster("empty image".to_string()));
        }

        let lang = language.unwrap_or(&self.default_language);

        // Create temporary file for image
        let input_path = std::env::temp_dir().join(format!("ocr_input_{}.png", uuid::Uuid::new_v4()));
        std::fs::write(&input_path, &image.data)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        let output = Command::new(&self.command)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(lang)
            .arg("--psm")
            .arg("3")
            .arg("tsv")
            .output();

        // Clean up input file
        let _ = std::fs::remove_file(&input_path);

        let output = output.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => OcrError::ProviderNotAvailable(self.command.clone()),
            _ => OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!("Tesseract failed: {}", stderr)));
        }

        Ok(parse_tsv(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse word rows (level 5) out of a Tesseract TSV report
pub fn parse_tsv(tsv: &str) -> Vec<OcrWord> {
    tsv.lines()
        .skip_while(|line| line.starts_with("level"))
        .filter_map(parse_tsv_row)
        .collect()
}

fn parse_tsv_row(line: &str) -> Option<OcrWord> {
    let cols: Vec<&str> = line.splitn(12, '\t').collect();
    if cols.len() < 11 || cols[0] != "5" {
        return None;
    }

    let num = |idx: usize| cols[idx].trim().parse::<u32>().ok();
    Some(OcrWord {
        text: cols.get(11).map(|t| t.trim().to_string()).unwrap_or_default(),
        confidence: cols[10].trim().parse().unwrap_or(-1.0),
        bounds: PixelRect {
            x: num(6)?,
            y: num(7)?,
            width: num(8)?,
            height: num(9)?,
        },
    })
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockOcrProvider {
    pub words: Vec<OcrWord>,
    pub available: bool,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockOcrProvider {
    pub fn new(words: Vec<OcrWord>) -> Self {
        Self {
            words,
            available: true,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl OcrProviderTrait for MockOcrProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn recognize(&self, _image: &RasterPage, _language: Option<&str>) -> Result<Vec<OcrWord>, OcrError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.words.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t1200\t1550\t-1\t
4\t1\t1\t1\t1\t0\t10\t20\t300\t15\t-1\t
5\t1\t1\t1\t1\t1\t10\t20\t30\t15\t96.5\tScope
5\t1\t1\t1\t1\t2\t45\t20\t60\t15\t91\temissions
5\t1\t1\t1\t1\t3\t110\t20\t5\t15\t-1\t ";

    #[test]
    fn test_parse_tsv_keeps_word_rows() {
        let words = parse_tsv(SAMPLE_TSV);
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "Scope");
        assert_eq!(words[0].bounds, PixelRect { x: 10, y: 20, width: 30, height: 15 });
        assert_eq!(words[0].confidence, 96.5);
        assert_eq!(words[1].text, "emissions");
        assert!(words[2].text.is_empty());
    }

    #[test]
    fn test_parse_tsv_ignores_malformed_rows() {
        assert!(parse_tsv("5\t1\t1\n5\t1\t1\t1\t1\t1\tx\t0\t1\t1\t90\tbad").is_empty());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let provider = TesseractProvider::new("eng").with_command("definitely-not-tesseract-binary");
        assert!(!provider.is_available());
        assert_eq!(provider.provider_type(), OcrProvider::Tesseract);
    }

    #[test]
    fn test_missing_binary_fails_recognition() {
        let provider = TesseractProvider::new("eng").with_command("definitely-not-tesseract-binary");
        let raster = RasterPage { data: vec![0u8; 4], width: 1, height: 1 };
        assert!(matches!(
            provider.recognize(&raster, None),
            Err(OcrError::ProviderNotAvailable(_))
        ));
    }

    #[test]
    fn test_empty_raster_is_rejected() {
        let provider = TesseractProvider::new("eng");
        let raster = RasterPage { data: Vec::new(), width: 0, height: 0 };
        assert!(matches!(
            provider.recognize(&raster, None),
            Err(OcrError::InvalidRaster(_))
        ));
    }
}
