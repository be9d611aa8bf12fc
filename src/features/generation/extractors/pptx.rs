use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use super::plain_text::decode_utf8;
use super::TextExtractor;
use crate::core::error::Result;

lazy_static! {
    /// DrawingML text run: <a:t>text</a:t>, optionally with attributes
    static ref TEXT_RUN_RE: Regex = Regex::new(r"<a:t(?:\s[^>]*)?>([^<]*)</a:t>").unwrap();
}

/// Collects slide text runs from a PPTX archive, in slide order
pub struct PptxExtractor;

fn slide_number(entry_name: &str) -> Option<u32> {
    entry_name
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn slide_text(xml: &str) -> String {
    TEXT_RUN_RE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| unescape_xml(m.as_str()))
        .filter(|run| !run.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_slides(raw: &[u8]) -> std::result::Result<String, zip::result::ZipError> {
    let mut archive = ZipArchive::new(Cursor::new(raw))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    let mut sections = Vec::with_capacity(slides.len());
    for (number, name) in slides {
        let mut xml = String::new();
        archive.by_name(&name)?.read_to_string(&mut xml)?;

        let text = slide_text(&xml);
        if !text.is_empty() {
            sections.push(format!("Slide {}:\n{}", number, text));
        }
    }

    Ok(sections.join("\n\n"))
}

#[async_trait]
impl TextExtractor for PptxExtractor {
    async fn extract(&self, raw: &[u8]) -> Result<String> {
        match extract_slides(raw) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!("Not a readable PPTX archive, treating as text: {}", e);
                decode_utf8(raw)
            }
        }
    }
}
