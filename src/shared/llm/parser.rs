use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

lazy_static! {
    /// Regex for trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// Regex for JavaScript string concatenation ("str1" + "str2")
    static ref JS_STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();
}

/// Extract JSON string from text (handles multiple formats)
///
/// Tries in order:
/// 1. JSON in markdown code block: ```json ... ```
/// 2. Generic markdown code block: ``` ... ```
/// 3. Plain JSON starting with {
/// 4. JSON embedded anywhere in text (first { to last })
pub fn extract_json_string(text: &str) -> Result<String, String> {
    if text.contains("```json") {
        return text
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| "Failed to extract JSON from markdown code block".to_string());
    }

    if let Some(start) = text.find("```") {
        let block_start = start + 3;
        // Skip optional language identifier on the same line
        if let Some(newline_offset) = text[block_start..].find('\n') {
            let json_start = block_start + newline_offset + 1;
            if let Some(end_offset) = text[json_start..].find("```") {
                return Ok(text[json_start..json_start + end_offset].trim().to_string());
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    let start = text
        .find('{')
        .ok_or_else(|| "No JSON object found in response".to_string())?;

    let end = text
        .rfind('}')
        .ok_or_else(|| "Incomplete JSON object in response".to_string())?;

    if start < end {
        Ok(text[start..=end].to_string())
    } else {
        Err("Invalid JSON boundaries in response".to_string())
    }
}

/// Fix trailing commas in JSON (common LLM mistake)
///
/// Example: `{"name": "John",}` -> `{"name": "John"}`
pub fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

/// Merge `"str1" + "str2"` into `"str1str2"`
pub fn fix_js_string_concatenation(json_str: &str) -> String {
    JS_STRING_CONCAT_RE.replace_all(json_str, "").to_string()
}

fn apply_quick_fixes(json_str: &str) -> String {
    let fixed = fix_js_string_concatenation(json_str);
    fix_trailing_commas(&fixed)
}

/// Attempt a syntactic repair with `llm_json`; `None` when it fails or panics
fn try_repair_json(json_str: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json_str, &options)
    }));

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("JSON repair panicked");
            None
        }
    }
}

/// Parse model output into `T`.
///
/// The JSON object is located (raw, fenced, or embedded), then parsed
/// directly, after quick fixes, and finally after `llm_json` repair.
/// Repairs only touch syntax: deserialization stays strict, so a missing
/// required field is still an error.
pub fn parse_llm_json<T>(text: &str) -> Result<T, String>
where
    T: DeserializeOwned,
{
    let json_str = extract_json_string(text)?;

    tracing::debug!(
        "Extracted JSON (first 500 chars): {}",
        json_str.chars().take(500).collect::<String>()
    );

    let first_error = match serde_json::from_str::<T>(&json_str) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e,
    };

    // A well-formed document that fails on shape will not be fixed by repair
    if !first_error.is_syntax() && !first_error.is_eof() {
        return Err(format!("Response does not match schema: {}", first_error));
    }

    let fixed_json = apply_quick_fixes(&json_str);
    if let Ok(parsed) = serde_json::from_str::<T>(&fixed_json) {
        tracing::debug!("JSON parsed successfully after quick fixes");
        return Ok(parsed);
    }

    if let Some(repaired) = try_repair_json(&json_str) {
        match serde_json::from_str::<T>(&repaired) {
            Ok(parsed) => {
                tracing::debug!("JSON parsed successfully after llm_json repair");
                return Ok(parsed);
            }
            Err(e) => return Err(format!("Response does not match schema: {}", e)),
        }
    }

    Err(format!(
        "Failed to parse JSON after all repair attempts: {}. Original: {}",
        first_error,
        json_str.chars().take(200).collect::<String>()
    ))
}

/// Parse model output into `T` without repair.
///
/// The JSON object is located the same way as [`parse_llm_json`] and only
/// the quick fixes are applied. A document that is cut short stays an
/// error instead of being closed up by `llm_json`.
pub fn parse_llm_json_strict<T>(text: &str) -> Result<T, String>
where
    T: DeserializeOwned,
{
    let json_str = extract_json_string(text)?;

    let first_error = match serde_json::from_str::<T>(&json_str) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e,
    };

    if !first_error.is_syntax() && !first_error.is_eof() {
        return Err(format!("Response does not match schema: {}", first_error));
    }

    serde_json::from_str::<T>(&apply_quick_fixes(&json_str))
        .map_err(|_| format!("Response is not valid JSON: {}", first_error))
}
