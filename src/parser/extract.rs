//! Free-text share-link extraction.
//!
//! Subscription bodies mix links with prose, blank lines, and Base64-wrapped
//! sections (sometimes nested). Extraction scans line by line, unwraps
//! Base64 layers up to a fixed depth, and finishes with a pass over the
//! newline-flattened text to catch several links sharing one line.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::base64::{decode_base64_text, looks_like_base64};

/// Every scheme prefix the extractor recognizes.
pub const SUPPORTED_SCHEMES: [&str; 6] = [
    "vmess://",
    "vless://",
    "trojan://",
    "hysteria2://",
    "hy2://",
    "ss://",
];

/// Base64 layers are unwrapped at most this many times per line; deeper
/// nesting is left as-is.
const MAX_DECODE_DEPTH: usize = 5;

static LINK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    SUPPORTED_SCHEMES
        .iter()
        .map(|scheme| Regex::new(&format!("{}{}", regex::escape(scheme), r"[^\s]+")).unwrap())
        .collect()
});

/// Collects every share-link occurring anywhere in `text`, per scheme, in
/// scheme then positional order. No Base64 unwrapping, no deduplication.
pub fn extract_from_text(text: &str) -> Vec<String> {
    let mut links = Vec::new();
    for pattern in LINK_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            links.push(m.as_str().to_string());
        }
    }
    links
}

/// Extracts all share-links from free-form input: line by line with Base64
/// unwrapping, then once more across the flattened text, deduplicated while
/// preserving first-seen order.
pub fn extract_links(input: &str) -> Vec<String> {
    let mut found = Vec::new();

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let unwrapped = unwrap_base64(line);
        for inner in unwrapped.lines() {
            found.extend(extract_from_text(&unwrap_base64(inner.trim())));
        }
    }

    // Catch links the line-based pass missed (several links on one line
    // separated by other whitespace).
    found.extend(extract_from_text(&input.replace('\n', " ")));

    dedup_preserving_order(found)
}

/// Peels Base64 layers off a line, bounded by [`MAX_DECODE_DEPTH`].
fn unwrap_base64(text: &str) -> String {
    let mut current = text.trim().to_string();
    for _ in 0..MAX_DECODE_DEPTH {
        if !looks_like_base64(&current) {
            break;
        }
        match decode_base64_text(&current) {
            Some(decoded) => current = decoded.trim().to_string(),
            None => break,
        }
    }
    current
}

fn dedup_preserving_order(links: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    links.into_iter().filter(|l| seen.insert(l.clone())).collect()
}
