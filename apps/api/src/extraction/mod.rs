//! Text extraction: turns an uploaded, page-oriented document into plain text.
//!
//! Backends implement `DocumentExtractor` and are looked up by `DocumentFormat`
//! in the `ExtractorRegistry`. Parsing is CPU-bound, so the registry runs it on
//! the blocking pool. The upload bytes are moved into that task and dropped when
//! it finishes, whether parsing succeeded, failed or panicked.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub mod pdf;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not read {format} document: {message}")]
    Format {
        format: DocumentFormat,
        message: String,
    },

    #[error("unsupported document format: {0}")]
    Unsupported(String),

    #[error("extraction worker failed: {0}")]
    Worker(anyhow::Error),
}

/// Document formats a backend can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
        }
    }
}

impl DocumentFormat {
    /// Resolves the declared format of an upload. Either a PDF content type or a
    /// `.pdf` file name is enough; a generic or missing content type on a file
    /// without an extension is also taken as PDF. The parser's header check
    /// catches anything that slips through.
    pub fn from_declared(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, ExtractionError> {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty());

        let named_pdf = file_name.map(|n| has_extension(n, "pdf")).unwrap_or(false);
        let unnamed = file_name.map(|n| !n.contains('.')).unwrap_or(true);

        match mime.as_deref() {
            Some(ct) if PDF_MIME_TYPES.contains(&ct) => Ok(DocumentFormat::Pdf),
            _ if named_pdf => Ok(DocumentFormat::Pdf),
            None => {
                if unnamed {
                    Ok(DocumentFormat::Pdf)
                } else {
                    Err(ExtractionError::Unsupported(format!(
                        "file '{}' is not a PDF",
                        file_name.unwrap_or_default()
                    )))
                }
            }
            Some(ct) if GENERIC_MIME_TYPES.contains(&ct) && unnamed => Ok(DocumentFormat::Pdf),
            Some(ct) => Err(ExtractionError::Unsupported(ct.to_string())),
        }
    }
}

const PDF_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/x-pdf",
    "application/acrobat",
    "applications/vnd.pdf",
    "text/pdf",
    "text/x-pdf",
];

// Sent by clients that do not know or do not say what the file is.
const GENERIC_MIME_TYPES: &[&str] = &[
    "application/octet-stream",
    "binary/octet-stream",
    "application/x-download",
    "application/force-download",
];

fn has_extension(name: &str, ext: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, e)| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Raw bytes of one upload plus the format it was declared as.
/// Lives only for the duration of a single request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Bytes,
    pub format: DocumentFormat,
    pub file_name: Option<String>,
}

/// A parser for one document format. Returns page texts in document order.
pub trait DocumentExtractor: Send + Sync {
    fn format(&self) -> DocumentFormat;

    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Concatenates page texts in order and trims the surrounding whitespace.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.as_ref().len()).sum());
    for page in pages {
        text.push_str(page.as_ref());
    }
    text.trim().to_string()
}

/// Maps each supported `DocumentFormat` to its backend.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    backends: HashMap<DocumentFormat, Arc<dyn DocumentExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in backend.
    pub fn with_defaults() -> Self {
        Self::new().register(Arc::new(pdf::PdfExtractor))
    }

    /// Adds a backend, replacing any previous one for the same format.
    pub fn register(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.backends.insert(extractor.format(), extractor);
        self
    }

    /// Extracts the full text of `document`. An empty document yields `""`.
    pub async fn extract(&self, document: UploadedDocument) -> Result<String, ExtractionError> {
        let format = document.format;
        let extractor = self
            .backends
            .get(&format)
            .cloned()
            .ok_or_else(|| ExtractionError::Unsupported(format.to_string()))?;

        let bytes = document.bytes;
        let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    ExtractionError::Format {
                        format,
                        message: "document parser aborted on malformed input".to_string(),
                    }
                } else {
                    ExtractionError::Worker(anyhow::anyhow!(e))
                }
            })??;

        let text = join_pages(&pages);
        debug!(
            pages = pages.len(),
            chars = text.chars().count(),
            "Extracted resume text"
        );
        Ok(text)
    }
}
