use serde_json::Value;

/// Longest raw body echoed back when no structured message is found
const MAX_RAW_BODY: usize = 300;

/// Extract a human-readable message from an upstream error body
///
/// Understands the common shapes `{"error": {"message": ".."}}`,
/// `{"error": ".."}` and `{"message": ".."}`. Anything else falls back
/// to the raw body, truncated.
pub fn upstream_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let candidates = [
            value.pointer("/error/message"),
            value.get("error").filter(|e| e.is_string()),
            value.get("message"),
        ];

        if let Some(message) = candidates.into_iter().flatten().find_map(Value::as_str) {
            return message.to_owned();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no error details provided".to_owned();
    }

    match trimmed.char_indices().nth(MAX_RAW_BODY) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_owned(),
    }
}
