//! Thread-safe document wrapper for MuPDF
//!
//! MuPDF documents are not thread-safe. This wrapper keeps the source
//! (bytes or path), opens a fresh document for each operation, and
//! serializes access with a `parking_lot::Mutex`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mupdf::{Document, Page};
use parking_lot::Mutex;

use crate::document::ProviderError;

const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

/// Source data for a document
#[derive(Clone)]
pub enum DocumentSource {
    /// Document loaded from owned bytes
    Bytes(Arc<Vec<u8>>),
    /// Document loaded from a file path
    Path(PathBuf),
}

impl DocumentSource {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::Bytes(Arc::new(data))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }
}

/// Thread-safe PDF handle
pub struct SafeDocument {
    source: DocumentSource,
    page_count: usize,
    _lock: Mutex<()>,
}

// SAFETY: the only fields are owned bytes or a path, a count and a mutex.
// No MuPDF object is stored; every operation opens its own document under
// `_lock` and drops it before returning, so nothing MuPDF-owned crosses threads.
unsafe impl Send for SafeDocument {}
unsafe impl Sync for SafeDocument {}

impl SafeDocument {
    /// Open a PDF held in memory
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ProviderError> {
        if !data.starts_with(PDF_MAGIC) {
            return Err(ProviderError::UnsupportedFormat("Not a PDF document".into()));
        }

        let doc = Document::from_bytes(&data, PDF_MIME)?;
        let page_count = doc.page_count()? as usize;

        Ok(Self {
            source: DocumentSource::from_bytes(data),
            page_count,
            _lock: Mutex::new(()),
        })
    }

    /// Open a PDF on disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let path_buf = path.as_ref().to_path_buf();

        let is_pdf = path_buf
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(ProviderError::UnsupportedFormat(format!(
                "Expected a .pdf file: {}",
                path_buf.display()
            )));
        }
        if !path_buf.is_file() {
            return Err(ProviderError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("No such file: {}", path_buf.display()),
            )));
        }

        let doc = Document::open(&*path_buf.to_string_lossy())
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        let page_count = doc.page_count()? as usize;

        Ok(Self {
            source: DocumentSource::from_path(path_buf),
            page_count,
            _lock: Mutex::new(()),
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn open_document(&self) -> Result<Document, ProviderError> {
        match &self.source {
            DocumentSource::Bytes(data) => Document::from_bytes(data, PDF_MIME).map_err(Into::into),
            DocumentSource::Path(path) => Document::open(&*path.to_string_lossy()).map_err(Into::into),
        }
    }

    /// Execute a closure with access to a freshly opened document
    pub fn with_doc<F, R>(&self, f: F) -> Result<R, ProviderError>
    where
        F: FnOnce(&Document) -> Result<R, ProviderError>,
    {
        let _guard = self._lock.lock();
        let doc = self.open_document()?;
        f(&doc)
    }

    /// Execute a closure with one loaded page
    pub fn with_page<F, R>(&self, page_index: usize, f: F) -> Result<R, ProviderError>
    where
        F: FnOnce(&Page) -> Result<R, ProviderError>,
    {
        if page_index >= self.page_count {
            return Err(ProviderError::PageNotFound(page_index));
        }
        self.with_doc(|doc| {
            let page = doc.load_page(page_index as i32)?;
            f(&page)
        })
    }
}
