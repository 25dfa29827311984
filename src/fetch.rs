//! Remote subscription retrieval.
//!
//! Fetches go direct first, then fall back through a fixed list of public
//! CORS relays, taking the first success. Bodies that look like Base64 are
//! unwrapped once before being handed back.

use anyhow::Context;
use tracing::debug;

use crate::error::{Error, Result};
use crate::get_version;
use crate::parser::base64::{decode_base64_text, looks_like_base64};

/// Relay endpoints tried in order after a failed direct fetch.
const RELAY_PREFIXES: [&str; 3] = [
    "https://corsproxy.io/?url=",
    "https://api.allorigins.win/raw?url=",
    "https://api.codetabs.com/v1/proxy?quest=",
];

/// Fetch the content behind a subscription reference.
///
/// `ssconf://` references are rewritten to `https://` before fetching.
pub async fn fetch_content(link: &str) -> Result<String> {
    let url = if let Some(rest) = link.strip_prefix("ssconf://") {
        format!("https://{rest}")
    } else {
        link.to_string()
    };

    let client = reqwest::Client::builder()
        .user_agent(format!("linkbox/{}", get_version()))
        .build()
        .map_err(|_| Error::FetchFailure { url: url.clone() })?;

    let mut attempts = vec![url.clone()];
    attempts.extend(
        RELAY_PREFIXES
            .iter()
            .map(|prefix| format!("{prefix}{}", urlencoding::encode(&url))),
    );

    for attempt in &attempts {
        match try_fetch(&client, attempt).await {
            Ok(text) => return Ok(normalize_body(&text)),
            Err(e) => debug!("Fetch attempt failed for {}: {:#}", attempt, e),
        }
    }

    Err(Error::FetchFailure { url })
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch URL: {url}"))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP request failed with status {}: {}", status, url);
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from: {url}"))
}

/// Trim the body and peel one Base64 layer when the whole body is encoded,
/// which is how most subscription endpoints respond.
fn normalize_body(text: &str) -> String {
    let trimmed = text.trim();
    if looks_like_base64(trimmed)
        && let Some(decoded) = decode_base64_text(trimmed)
    {
        return decoded;
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn test_normalize_body_plain() {
        assert_eq!(normalize_body("  vmess://abc \n"), "vmess://abc");
    }

    #[test]
    fn test_normalize_body_base64() {
        let encoded = STANDARD.encode("vmess://abc\nss://def@h:1");
        assert_eq!(normalize_body(&encoded), "vmess://abc\nss://def@h:1");
    }

    #[test]
    fn test_normalize_body_undecodable_left_alone() {
        // Looks like Base64 by the permissive heuristic but decodes to
        // non-UTF-8 garbage; the text is preserved.
        let text = "====";
        assert_eq!(normalize_body(text), text);
    }

    #[test]
    fn test_relay_attempt_urls_encode_target() {
        let url = "https://example.com/sub?a=b";
        let relayed = format!("{}{}", RELAY_PREFIXES[0], urlencoding::encode(url));
        assert!(relayed.contains("https%3A%2F%2Fexample.com"));
    }
}
