//! Conversion orchestration.
//!
//! One [`Converter`] call takes free-form input (share-link text, Base64
//! blobs, subscription URLs, or a sing-box document) and produces either a
//! routing document or a share-link list, whichever direction applies.
//! Individual bad links are skipped; only an empty result is an error.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::assemble;
use crate::config::SingBoxConfig;
use crate::config::outbound::Outbound;
use crate::error::{Error, Result};
use crate::fetch::fetch_content;
use crate::parser::{Protocol, detection, extract, link_for_outbound, parse_link};
use crate::tag::TagGenerator;

/// Batch-wide conversion options.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    /// Append region/ad-block rules and rule sets to the document.
    pub enhanced: bool,
    /// Custom tag prefix; enables deterministic per-protocol counters.
    pub tag_prefix: Option<String>,
}

/// The result of one conversion call.
#[derive(Debug)]
pub enum Conversion {
    /// Share-links recovered from a routing document.
    ShareLinks(Vec<String>),
    /// A routing document assembled from share-links.
    Document(Box<SingBoxConfig>),
}

impl Conversion {
    /// Render for display: newline-joined links, or pretty-printed JSON.
    pub fn render(&self) -> Result<String> {
        match self {
            Conversion::ShareLinks(links) => Ok(links.join("\n")),
            Conversion::Document(config) => Ok(config.to_json_pretty()?),
        }
    }
}

/// Converts share-links and routing documents into one another.
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Run one conversion over the given input text.
    pub async fn convert(&self, input: &str) -> Result<Conversion> {
        let mut input = input.trim().to_string();
        if input.is_empty() {
            return Err(Error::NoValidConfigurations);
        }

        // A single URL may point at a routing document rather than a link
        // list; peek before deciding the direction.
        if detection::is_link(&input) {
            if let Ok(content) = fetch_content(&input).await
                && detection::is_singbox_json(&content)
            {
                input = content;
            }
        }

        if detection::is_singbox_json(&input) {
            info!("Converting routing document to share links");
            return Ok(Conversion::ShareLinks(links_from_document(&input)?));
        }

        info!("Converting share links to routing document");
        let links = self.collect_links(&input).await;
        debug!("Extracted {} candidate links", links.len());

        let mut tags = TagGenerator::new(self.options.tag_prefix.clone());
        let mut outbounds = Vec::new();
        for link in &links {
            let Some(protocol) = Protocol::from_link(link) else {
                continue;
            };
            match parse_link(link) {
                Ok(mut outbound) => {
                    outbound.set_tag(tags.next(protocol));
                    outbounds.push(outbound);
                }
                Err(e) => warn!("Skipping {} link: {}", protocol, e),
            }
        }

        if outbounds.is_empty() {
            return Err(Error::NoValidConfigurations);
        }
        info!("Converted {} outbounds", outbounds.len());

        Ok(Conversion::Document(Box::new(assemble::build_document(
            outbounds,
            self.options.enhanced,
        ))))
    }

    /// Walk input lines, fetching URL lines and extracting links from
    /// everything else. Fetch failures drop the line, nothing more.
    async fn collect_links(&self, input: &str) -> Vec<String> {
        let mut found = Vec::new();
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if detection::is_link(line) {
                match fetch_content(line).await {
                    Ok(content) => found.extend(extract::extract_links(&content)),
                    Err(e) => warn!("Dropping unreachable subscription line: {}", e),
                }
            } else {
                found.extend(extract::extract_links(line));
            }
        }

        // One more pass over the flattened text catches links that share a
        // line with a URL or each other.
        found.extend(extract::extract_from_text(&input.replace('\n', " ")));

        let mut seen = std::collections::HashSet::new();
        found
            .into_iter()
            .filter(|link| seen.insert(link.clone()))
            .collect()
    }
}

/// Recover share-links from a routing document.
///
/// Unrecognized or malformed outbound entries are skipped silently; only a
/// top-level JSON syntax error propagates.
pub fn links_from_document(text: &str) -> Result<Vec<String>> {
    let document: Value = serde_json::from_str(text)?;

    let mut links = Vec::new();
    if let Some(entries) = document.get("outbounds").and_then(Value::as_array) {
        for entry in entries {
            let Ok(outbound) = serde_json::from_value::<Outbound>(entry.clone()) else {
                debug!("Skipping unconvertible outbound entry");
                continue;
            };
            if let Some(link) = link_for_outbound(&outbound) {
                links.push(link);
            }
        }
    }
    Ok(links)
}
