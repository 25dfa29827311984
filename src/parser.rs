//! Share-link and subscription parsing.
//!
//! This module provides:
//! - Input detection (sing-box JSON vs link text vs URL references)
//! - Base64 decoding with the permissive subscription heuristic
//! - Free-text share-link extraction with nested Base64 unwrapping
//! - Per-protocol link parsers and serializers with enum-keyed dispatch

pub mod base64;
pub mod detection;
pub mod extract;
pub mod protocols;

pub use extract::extract_links;
pub use protocols::{Protocol, link_for_outbound, parse_link};
