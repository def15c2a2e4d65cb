/// Document decoding and processing
///
/// Uploaded documents are decoded to raw text and run through the contact extractor on
/// the blocking thread pool. If the caller stops waiting, the result is simply dropped
/// and nothing downstream (such as lead creation) happens.

use crate::extractor::{ContactExtractor, ExtractedContact};
use std::{fmt, sync::Arc};
use thiserror::Error;

/// Document processing error
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Content type the service cannot read
    #[error("unsupported document type: {0}")]
    UnsupportedFormat(String),

    /// Image uploaded but no OCR engine is wired in
    #[error("no OCR engine configured for image documents")]
    OcrUnavailable,

    /// The bytes could not be turned into text
    #[error("failed to decode document: {0}")]
    Decode(String),

    /// The blocking task panicked or was cancelled
    #[error("document processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Supported document families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
    Text,
}

impl DocumentKind {
    /// Classify a `Content-Type` header value (parameters are ignored)
    pub fn from_content_type(content_type: &str) -> Result<Self, DocumentError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/pdf" {
            Ok(DocumentKind::Pdf)
        } else if essence.starts_with("image/") {
            Ok(DocumentKind::Image)
        } else if essence.starts_with("text/") {
            Ok(DocumentKind::Text)
        } else {
            Err(DocumentError::UnsupportedFormat(content_type.to_string()))
        }
    }
}

/// "Decode document to raw text", the only contract expected from PDF and OCR engines
pub trait TextDecoder: Send + Sync + fmt::Debug {
    fn decode(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

/// Text layer of every page via lopdf, one line per page
#[derive(Debug, Default)]
pub struct PdfTextDecoder;

impl TextDecoder for PdfTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| DocumentError::Decode(format!("invalid PDF: {}", e)))?;

        let mut text = String::new();
        for page_number in document.get_pages().keys() {
            let page_text = document
                .extract_text(&[*page_number])
                .map_err(|e| DocumentError::Decode(format!("page {}: {}", page_number, e)))?;
            text.push_str(page_text.trim_end());
            text.push('\n');
        }

        Ok(text)
    }
}

/// UTF-8 text, decoded lossily
#[derive(Debug, Default)]
pub struct PlainTextDecoder;

impl TextDecoder for PlainTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Decodes uploaded documents and extracts a contact from them
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    extractor: Arc<ContactExtractor>,
    pdf: Arc<dyn TextDecoder>,
    text: Arc<dyn TextDecoder>,
    /// External OCR engine; images are rejected without one
    ocr: Option<Arc<dyn TextDecoder>>,
}

impl DocumentProcessor {
    pub fn new(extractor: Arc<ContactExtractor>) -> Self {
        Self {
            extractor,
            pdf: Arc::new(PdfTextDecoder),
            text: Arc::new(PlainTextDecoder),
            ocr: None,
        }
    }

    /// Plug in an OCR engine for image documents
    pub fn with_ocr(mut self, ocr: Arc<dyn TextDecoder>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn extractor(&self) -> &ContactExtractor {
        &self.extractor
    }

    fn decoder_for(&self, kind: DocumentKind) -> Result<Arc<dyn TextDecoder>, DocumentError> {
        match kind {
            DocumentKind::Pdf => Ok(Arc::clone(&self.pdf)),
            DocumentKind::Text => Ok(Arc::clone(&self.text)),
            DocumentKind::Image => self.ocr.clone().ok_or(DocumentError::OcrUnavailable),
        }
    }

    /// Decode `bytes` and extract a contact on the blocking pool
    pub async fn process(
        &self,
        kind: DocumentKind,
        bytes: Vec<u8>,
    ) -> Result<Option<ExtractedContact>, DocumentError> {
        let decoder = self.decoder_for(kind)?;
        let extractor = Arc::clone(&self.extractor);

        tracing::info!("📄 Processing {:?} document ({} bytes)", kind, bytes.len());
        let outcome = tokio::task::spawn_blocking(move || -> Result<_, DocumentError> {
            let text = decoder.decode(&bytes)?;
            tracing::debug!("Decoded {} chars of text", text.chars().count());
            Ok(extractor.extract(&text))
        })
        .await?;

        outcome
    }
}
