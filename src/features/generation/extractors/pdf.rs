use async_trait::async_trait;
use std::time::Duration;
use tempfile::TempPath;
use tokio::process::Command;

use super::plain_text::decode_utf8;
use super::TextExtractor;
use crate::core::error::Result;

/// Runs `pdftotext` over a scratch copy of the document
pub struct PdfExtractor {
    timeout: Duration,
}

impl PdfExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

async fn write_scratch(raw: &[u8]) -> std::io::Result<TempPath> {
    let path = tokio::task::spawn_blocking(|| {
        tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .map(|file| file.into_temp_path())
    })
    .await
    .map_err(std::io::Error::other)??;

    tokio::fs::write(&path, raw).await?;
    Ok(path)
}

async fn run_pdftotext(raw: &[u8], timeout: Duration) -> std::io::Result<Option<String>> {
    let scratch = write_scratch(raw).await?;

    // kill_on_drop reaps the child when the timeout drops the future
    let child = Command::new("pdftotext")
        .args(["-layout", "-enc", "UTF-8"])
        .arg(&*scratch)
        .arg("-")
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, child).await {
        Ok(output) => output?,
        Err(_) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("pdftotext exceeded {}s", timeout.as_secs_f64()),
            ))
        }
    };

    if output.status.success() {
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    } else {
        tracing::warn!(
            "pdftotext failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Ok(None)
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String> {
        match run_pdftotext(raw, self.timeout).await {
            Ok(Some(text)) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("pdftotext is not installed, treating PDF as text");
            }
            Err(e) => {
                tracing::warn!("PDF extraction failed, treating PDF as text: {}", e);
            }
        }

        decode_utf8(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_payload_survives_without_a_real_pdf() {
        // Either pdftotext rejects the input or is absent; both fall back
        let text = PdfExtractor::new(Duration::from_secs(5))
            .extract(b"Chapter 1: Thermodynamics")
            .await
            .unwrap();
        assert!(text.contains("Thermodynamics"));
    }

    #[tokio::test]
    async fn test_scratch_copy_holds_the_bytes() {
        let path = write_scratch(b"%PDF-1.4 body").await.unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4 body");
        assert!(path.to_string_lossy().ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_zero_timeout_falls_back_to_text() {
        let text = PdfExtractor::new(Duration::ZERO)
            .extract(b"Entropy always increases")
            .await
            .unwrap();
        assert_eq!(text, "Entropy always increases");
    }
}
