use async_trait::async_trait;

use super::TextExtractor;
use crate::core::error::{AppError, Result};

/// Treats the bytes as UTF-8 text, replacing invalid sequences
pub struct PlainTextExtractor;

fn is_usable(c: char) -> bool {
    c != char::REPLACEMENT_CHARACTER && !c.is_whitespace() && !c.is_control()
}

/// Lossy decode; an error only when nothing readable survives
pub(super) fn decode_utf8(raw: &[u8]) -> Result<String> {
    let text = String::from_utf8_lossy(raw);
    // Strip a leading byte-order mark
    let text = text.trim_start_matches('\u{feff}');

    if !text.chars().any(is_usable) {
        return Err(AppError::Extraction(
            "File content is not readable text".to_string(),
        ));
    }

    Ok(text.to_string())
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String> {
        decode_utf8(raw)
    }
}
