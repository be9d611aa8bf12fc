//! Reduce downloaded file bytes to plain text for the generator.
//!
//! Each format has a backend behind [`TextExtractor`]; [`ContentExtractor`]
//! picks one by [`FileType`]. Backends degrade to [`PlainTextExtractor`]
//! when their format-specific path fails, so only bytes with no readable text
//! are an error.

mod pdf;
mod plain_text;
mod pptx;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::features::files::models::FileType;

pub use pdf::PdfExtractor;
pub use plain_text::PlainTextExtractor;
pub use pptx::PptxExtractor;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, raw: &[u8]) -> Result<String>;
}

pub struct ContentExtractor {
    pdf: Arc<dyn TextExtractor>,
    pptx: Arc<dyn TextExtractor>,
    video: Arc<dyn TextExtractor>,
}

impl ContentExtractor {
    pub fn new(
        pdf: Arc<dyn TextExtractor>,
        pptx: Arc<dyn TextExtractor>,
        video: Arc<dyn TextExtractor>,
    ) -> Self {
        Self { pdf, pptx, video }
    }

    pub async fn extract(&self, raw: &[u8], file_type: FileType) -> Result<String> {
        let backend = match file_type {
            FileType::Pdf => &self.pdf,
            FileType::Pptx => &self.pptx,
            // Transcription is not wired up; uploads with a text payload still work
            FileType::Video => &self.video,
        };

        let text = backend.extract(raw).await?;
        if text.trim().is_empty() {
            return Err(AppError::Extraction(
                "No text could be extracted from the file".to_string(),
            ));
        }

        Ok(text)
    }

    /// Production backends; `tool_timeout` bounds external tools such as `pdftotext`
    pub fn standard(tool_timeout: Duration) -> Self {
        Self::new(
            Arc::new(PdfExtractor::new(tool_timeout)),
            Arc::new(PptxExtractor),
            Arc::new(PlainTextExtractor),
        )
    }
}
