//! Model response cleanup before JSON parsing.

/// Strips a Markdown code fence (```json ... ``` or ``` ... ```) around a response.
/// Text without a fence is returned trimmed.
pub fn clean_response(raw: &str) -> &str {
    let trimmed = raw.trim();
    let inner = if let Some((_, rest)) = trimmed.split_once("```json") {
        rest
    } else if let Some((_, rest)) = trimmed.split_once("```") {
        rest
    } else {
        return trimmed;
    };
    inner.split("```").next().unwrap_or(inner).trim()
}
