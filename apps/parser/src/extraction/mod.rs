//! Text extraction — turns a PDF or DOCX resume into one flat string.

pub mod docx;
pub mod pdf;

use std::path::Path;

use tracing::debug;

use crate::errors::ExtractionError;
use crate::models::{DocumentFormat, RawDocument};

/// Extracts the text of `path`, read as `format`.
pub fn extract(path: &Path, format: DocumentFormat) -> Result<String, ExtractionError> {
    let text = match format {
        DocumentFormat::Pdf => pdf::extract_pdf(path)?,
        DocumentFormat::Docx => docx::extract_docx(path)?,
    };
    debug!(path = %path.display(), %format, text_len = text.len(), "Extracted text");
    Ok(text)
}

pub fn extract_document(doc: &RawDocument) -> Result<String, ExtractionError> {
    extract(&doc.path, doc.format)
}

/// Reads the whole file up front; the handle is closed before parsing starts.
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, ExtractionError> {
    std::fs::read(path).map_err(|source| ExtractionError::Open {
        path: path.to_path_buf(),
        source,
    })
}
