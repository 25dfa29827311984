//! Input kind detection.

use serde_json::Value;

/// Checks whether a line is a fetchable reference: a plain URL or an
/// `ssconf://` subscription alias.
pub fn is_link(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("ssconf://")
}

/// Checks whether text is a sing-box document: a JSON object carrying an
/// `outbounds` array.
pub fn is_singbox_json(text: &str) -> bool {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => matches!(map.get("outbounds"), Some(Value::Array(_))),
        _ => false,
    }
}
