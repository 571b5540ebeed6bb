//! JSON extraction from free-form AI responses
//!
//! Models wrap answers in prose, markdown fences, or illustrative examples
//! followed by the real payload. Extraction runs an ordered list of
//! strategies from strict to loose and returns the first parse that
//! succeeds; no partial or merged results.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref JSON_FENCE: Regex =
        Regex::new(r"```json\s*([\s\S]*?)```").expect("json fence pattern");
    static ref ANY_FENCE: Regex =
        Regex::new(r"```[A-Za-z0-9_-]*\s*([\s\S]*?)```").expect("generic fence pattern");
}

/// Attempts to locate and parse a JSON value inside `text`.
///
/// Strategy order:
/// 1. the trimmed text as-is
/// 2. the first ```` ```json ```` fenced block
/// 3. the first fenced block with any (or no) language tag
/// 4. when several ```` ```json ```` blocks exist, each from last to first
///    (responses often show an example block before the real answer)
/// 5. the substring between the first `{` and the last `}` inclusive
///
/// Returns `None` when every strategy fails. Pure; same input, same result.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(caps) = JSON_FENCE.captures(trimmed) {
        if let Ok(value) = serde_json::from_str(caps[1].trim()) {
            return Some(value);
        }
    }

    if let Some(caps) = ANY_FENCE.captures(trimmed) {
        if let Ok(value) = serde_json::from_str(caps[1].trim()) {
            return Some(value);
        }
    }

    let json_blocks: Vec<&str> = JSON_FENCE
        .captures_iter(trimmed)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    if json_blocks.len() > 1 {
        for block in json_blocks.iter().rev() {
            if let Ok(value) = serde_json::from_str(block.trim()) {
                return Some(value);
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&trimmed[start..=end]) {
                return Some(value);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn parses_bare_json() {
        let value = extract_json(r#"  {"a": 1}  "#);
        assert_eq!(value, Some(json!({"a": 1})));
    }

    #[rstest]
    #[case("```json\n{\"a\": 1}\n```")]
    #[case("```json{\"a\": 1}```")]
    #[case("Sure, here you go:\n\n```json\n  {\"a\": 1}\n```\n\nLet me know!")]
    fn parses_json_fence(#[case] text: &str) {
        assert_eq!(extract_json(text), Some(json!({"a": 1})));
    }

    #[test]
    fn parses_generic_fence() {
        let text = "result:\n```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text), Some(json!({"a": 1})));
    }

    #[test]
    fn prefers_last_parseable_json_fence() {
        let text = "Example (do not copy):\n```json\n{broken\n```\nActual answer:\n```json\n{\"real\": true}\n```";
        assert_eq!(extract_json(text), Some(json!({"real": true})));
    }

    #[test]
    fn falls_back_to_brace_matching() {
        let text = "The analysis is {\"a\": [1, 2]} as requested.";
        assert_eq!(extract_json(text), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn returns_none_for_junk() {
        assert_eq!(extract_json("no structured content here"), None);
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("{ not json }"), None);
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "prefix {\"k\": \"v\"} suffix";
        assert_eq!(extract_json(text), extract_json(text));
    }
}
