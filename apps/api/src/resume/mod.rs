//! Resume text extraction.
//!
//! The document format is chosen from the filename extension only (no content
//! sniffing). Parsers live in a registry built once at startup and carried in
//! `AppState`; tests swap individual parsers via `with_parser`.

pub mod docx;
pub mod pdf;

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

/// A resume format the service knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Registration order, which is also the order used in error messages.
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Pdf, DocumentFormat::Docx];

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
        }
    }

    /// Case-insensitive lookup on the text after the last `.` of `filename`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        let ext = format!(".{}", ext.to_ascii_lowercase());
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::Docx => write!(f, "DOCX"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: {filename}. Use {supported}.")]
    UnsupportedFormat { filename: String, supported: String },

    #[error("Could not read {format} document: {reason}")]
    Unreadable {
        format: DocumentFormat,
        reason: String,
    },
}

/// A parser turns the raw bytes of one format into plain text.
pub type ParseFn = fn(&[u8]) -> Result<String, ExtractError>;

/// Format → parser registry.
#[derive(Clone)]
pub struct ResumeExtractor {
    parsers: HashMap<DocumentFormat, ParseFn>,
}

impl ResumeExtractor {
    /// Registry with the production PDF and DOCX parsers.
    pub fn standard() -> Self {
        Self {
            parsers: HashMap::new(),
        }
        .with_parser(DocumentFormat::Pdf, pdf::extract_text)
        .with_parser(DocumentFormat::Docx, docx::extract_text)
    }

    pub fn with_parser(mut self, format: DocumentFormat, parser: ParseFn) -> Self {
        self.parsers.insert(format, parser);
        self
    }

    /// Comma-separated list of the registered extensions, e.g. `.pdf, .docx`.
    pub fn supported_extensions(&self) -> String {
        DocumentFormat::ALL
            .into_iter()
            .filter(|f| self.parsers.contains_key(f))
            .map(DocumentFormat::extension)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn parser_for(&self, filename: &str) -> Result<(DocumentFormat, ParseFn), ExtractError> {
        DocumentFormat::from_filename(filename)
            .and_then(|format| self.parsers.get(&format).map(|p| (format, *p)))
            .ok_or_else(|| ExtractError::UnsupportedFormat {
                filename: filename.to_string(),
                supported: self.supported_extensions(),
            })
    }

    /// Extracts plain text on the blocking pool. A parser panic on malformed
    /// input is reported as `Unreadable` instead of tearing down the request.
    pub async fn extract(
        &self,
        data: Bytes,
        filename: &str,
    ) -> Result<String, ExtractError> {
        let (format, parser) = self.parser_for(filename)?;
        info!("Parsing resume '{filename}' ({})", format.extension());

        tokio::task::spawn_blocking(move || parser(&data))
            .await
            .map_err(|e| ExtractError::Unreadable {
                format,
                reason: if e.is_panic() {
                    "the document is malformed".to_string()
                } else {
                    e.to_string()
                },
            })?
    }
}
