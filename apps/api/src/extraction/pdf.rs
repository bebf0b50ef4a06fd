//! PDF backend built on `pdf-extract`. Works entirely from memory.

use super::{DocumentExtractor, DocumentFormat, ExtractionError};

/// How far into the upload the `%PDF-` marker may appear.
const HEADER_SCAN_BYTES: usize = 1024;

pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        if !has_pdf_header(bytes) {
            return Err(format_error("missing %PDF header"));
        }

        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| format_error(e.to_string()))
    }
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SCAN_BYTES)];
    window.windows(5).any(|w| w == b"%PDF-")
}

fn format_error(message: impl Into<String>) -> ExtractionError {
    ExtractionError::Format {
        format: DocumentFormat::Pdf,
        message: message.into(),
    }
}
