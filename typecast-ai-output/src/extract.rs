//! Locating JSON inside free text.
//!
//! Even with a forced-output schema, some transports hand back the payload
//! as text, often inside a markdown fence or surrounded by prose. This
//! module digs the JSON out.

use serde_json::Value as JsonValue;

use crate::error::MalformedResponseError;

/// Extract a JSON value from text that may contain markdown or prose.
///
/// Tried in order: a ` ```json ` fence, a plain ` ``` ` fence, a
/// brace-matched object, a bracket-matched array, then the whole text.
///
/// # Errors
///
/// Returns [`MalformedResponseError::NoJsonFound`] when nothing in the text
/// parses as JSON.
///
/// # Example
///
/// ```rust
/// use typecast_ai_output::extract::extract_json;
///
/// let value = extract_json("The answer: {\"data\": 7} done.").unwrap();
/// assert_eq!(value["data"], 7);
/// ```
pub fn extract_json(text: &str) -> Result<JsonValue, MalformedResponseError> {
    let text = text.trim();

    if let Some(value) = from_fence(text, "```json") {
        return Ok(value);
    }
    if let Some(value) = from_fence(text, "```") {
        return Ok(value);
    }
    if let Some(value) = from_delimited(text, '{', '}') {
        return Ok(value);
    }
    if let Some(value) = from_delimited(text, '[', ']') {
        return Ok(value);
    }
    if let Ok(value) = serde_json::from_str::<JsonValue>(text) {
        return Ok(value);
    }

    Err(MalformedResponseError::NoJsonFound)
}

/// Pull a JSON value out of a markdown fence opened by `marker`.
fn from_fence(text: &str, marker: &str) -> Option<JsonValue> {
    let start = text.find(marker)? + marker.len();
    let rest = &text[start..];
    // Skip any language identifier left on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) if marker == "```" => &rest[newline + 1..],
        _ => rest,
    };
    let end = rest.find("```")?;
    serde_json::from_str(rest[..end].trim()).ok()
}

/// Find the first balanced `open`..`close` span that parses as JSON.
///
/// Depth counting ignores delimiters inside string literals, including
/// escaped quotes.
fn from_delimited(text: &str, open: char, close: char) -> Option<JsonValue> {
    let start = text.find(open)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                // A stray closer outside any open span is just prose.
                if depth == 0 {
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..=start + i];
                    if let Ok(value) = serde_json::from_str(candidate) {
                        return Some(value);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_pure_object() {
        let value = extract_json(r#"{"data": [3, 5, 7]}"#).unwrap();
        assert_eq!(value["data"], serde_json::json!([3, 5, 7]));
    }

    #[test]
    fn test_extract_pure_array() {
        let value = extract_json("[1, 2, 3]").unwrap();
        assert_eq!(value, serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_extract_json_fence() {
        let text = "Here you go:\n```json\n{\"data\": \"ok\"}\n```\nDone.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["data"], "ok");
    }

    #[test]
    fn test_extract_plain_fence() {
        let text = "```\n{\"data\": 1}\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value["data"], 1);
    }

    #[test]
    fn test_extract_embedded_in_prose() {
        let value = extract_json(r#"The result is {"x": 1, "y": 2}, as requested."#).unwrap();
        assert_eq!(value, serde_json::json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_extract_respects_string_braces() {
        let value = extract_json(r#"{"code": "if (x) { return y; }", "ok": true}"#).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_extract_respects_escaped_quotes() {
        let value = extract_json(r#"{"msg": "he said \"hi\""}"#).unwrap();
        assert_eq!(value["msg"], "he said \"hi\"");
    }

    #[test]
    fn test_extract_first_of_several() {
        let value = extract_json(r#"First {"a": 1} then {"b": 2}"#).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_extract_nothing() {
        let err = extract_json("no structured content here").unwrap_err();
        assert!(matches!(err, MalformedResponseError::NoJsonFound));
    }
}
