use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a document on disk into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("PDF has no pages")]
    NoPages,

    #[error("PDF page {page} has no extractable text layer")]
    EmptyPage { page: usize },

    #[error("DOCX error: {0}")]
    Docx(String),
}

/// Pipeline-level error. Every variant aborts the current document only.
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("NER model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database write error: {0}")]
    Write(#[source] sqlx::Error),
}

impl ResumeError {
    /// Name of the pipeline stage that produced this error, for reporting.
    pub fn stage(&self) -> &'static str {
        match self {
            ResumeError::Extraction(_) => "extract",
            ResumeError::ModelUnavailable(_) => "entities",
            ResumeError::Connection(_) | ResumeError::Write(_) => "store",
        }
    }
}
