use serde_json::Value;

/// Keys tried, in order, when the webhook answers with a JSON object.
pub const REPLY_KEYS: [&str; 5] = ["output", "response", "message", "text", "content"];

fn from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => REPLY_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Value::Array(items) => items.first().and_then(from_json),
        _ => None,
    }
}

/// Extracts the assistant text from a raw webhook body.
///
/// JSON objects yield their first known reply field, arrays their first element,
/// anything that is not JSON is used as trimmed text. Returns `None` for blank bodies.
pub fn normalize_reply(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Some(from_json(&value).unwrap_or_else(|| trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_uses_first_known_key() {
        let body = r#"{"text": "second", "output": "first", "other": 1}"#;
        assert_eq!(normalize_reply(body).as_deref(), Some("first"));

        let body = r#"{"response": "from response"}"#;
        assert_eq!(normalize_reply(body).as_deref(), Some("from response"));
    }

    #[test]
    fn non_string_fields_are_skipped() {
        let body = r#"{"output": {"nested": true}, "message": "fallback"}"#;
        assert_eq!(normalize_reply(body).as_deref(), Some("fallback"));
    }

    #[test]
    fn array_uses_first_element() {
        let body = r#"[{"output": "hello"}, {"output": "ignored"}]"#;
        assert_eq!(normalize_reply(body).as_deref(), Some("hello"));
    }

    #[test]
    fn plain_text_is_used_verbatim() {
        assert_eq!(
            normalize_reply("Sure, the invoice is due Friday.").as_deref(),
            Some("Sure, the invoice is due Friday.")
        );
    }

    #[test]
    fn plain_text_loses_surrounding_whitespace() {
        assert_eq!(
            normalize_reply("\n  Sure, the invoice is due Friday.\n").as_deref(),
            Some("Sure, the invoice is due Friday.")
        );
    }

    #[test]
    fn unknown_json_shape_falls_back_to_raw_body() {
        assert_eq!(
            normalize_reply(r#"{"answer": 42}"#).as_deref(),
            Some(r#"{"answer": 42}"#)
        );
    }

    #[test]
    fn blank_body_has_no_reply() {
        assert_eq!(normalize_reply("  \n"), None);
    }
}
