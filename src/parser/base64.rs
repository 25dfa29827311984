//! Base64 handling for subscription content.
//!
//! Subscription bodies come in standard, URL-safe, and unpadded variants,
//! so decoding tries each engine before giving up.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};

/// Decodes Base64 content, trying multiple variants.
pub fn decode_base64(content: &str) -> Option<Vec<u8>> {
    // Remove all whitespace (handles line breaks within Base64)
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    if let Ok(decoded) = STANDARD.decode(&cleaned) {
        return Some(decoded);
    }
    if let Ok(decoded) = URL_SAFE.decode(&cleaned) {
        return Some(decoded);
    }
    if let Ok(decoded) = URL_SAFE_NO_PAD.decode(&cleaned) {
        return Some(decoded);
    }

    // Retry with padding repaired
    let padded = add_base64_padding(&cleaned);
    if let Ok(decoded) = STANDARD.decode(&padded) {
        return Some(decoded);
    }
    if let Ok(decoded) = URL_SAFE.decode(&padded) {
        return Some(decoded);
    }

    None
}

/// Decodes Base64 content into UTF-8 text.
pub fn decode_base64_text(content: &str) -> Option<String> {
    decode_base64(content).and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Adds proper padding to a Base64 string if missing.
fn add_base64_padding(s: &str) -> String {
    let mut result = s.to_string();
    while !result.len().is_multiple_of(4) {
        result.push('=');
    }
    result
}

/// Checks whether a string looks like a standalone Base64 payload.
///
/// Deliberately permissive (length divisible by four, Base64 charset only):
/// short hex-like words pass this check too. Subscription tooling relies on
/// that behavior, so it is preserved; a failed decode simply leaves the text
/// untouched.
pub fn looks_like_base64(s: &str) -> bool {
    if s.is_empty() || !s.len().is_multiple_of(4) {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=')
}
