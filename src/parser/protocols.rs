//! Per-protocol share-link parsers and serializers.
//!
//! Dispatch is keyed on the [`Protocol`] enum so adding a protocol forces
//! every match site to be updated.

use std::fmt;

use crate::config::outbound::Outbound;
use crate::error::{Error, Result};

pub mod hysteria2;
pub mod shadowsocks;
pub mod trojan;
pub mod vless;
pub mod vmess;

/// Supported share-link protocols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Protocol {
    VMess,
    VLess,
    Trojan,
    Hysteria2,
    Shadowsocks,
}

impl Protocol {
    pub const ALL: [Protocol; 5] = [
        Protocol::VMess,
        Protocol::VLess,
        Protocol::Trojan,
        Protocol::Hysteria2,
        Protocol::Shadowsocks,
    ];

    /// The scheme prefixes this protocol's links start with.
    pub fn schemes(self) -> &'static [&'static str] {
        match self {
            Protocol::VMess => &["vmess://"],
            Protocol::VLess => &["vless://"],
            Protocol::Trojan => &["trojan://"],
            Protocol::Hysteria2 => &["hysteria2://", "hy2://"],
            Protocol::Shadowsocks => &["ss://"],
        }
    }

    /// The short name used in generated tags and log lines.
    pub fn tag_name(self) -> &'static str {
        match self {
            Protocol::VMess => "vmess",
            Protocol::VLess => "vless",
            Protocol::Trojan => "trojan",
            Protocol::Hysteria2 => "hysteria2",
            Protocol::Shadowsocks => "ss",
        }
    }

    /// Detects the protocol of a share-link by its scheme prefix.
    pub fn from_link(link: &str) -> Option<Protocol> {
        Protocol::ALL
            .into_iter()
            .find(|p| p.schemes().iter().any(|scheme| link.starts_with(scheme)))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Parses a single share-link into an outbound.
///
/// The returned outbound carries no tag; the caller assigns one. Failures
/// are per-item: callers skip the link and keep going.
pub fn parse_link(link: &str) -> Result<Outbound> {
    let link = link.trim();
    let protocol = Protocol::from_link(link)
        .ok_or_else(|| Error::invalid("unknown", "unrecognized scheme prefix"))?;

    match protocol {
        Protocol::VMess => vmess::parse(link),
        Protocol::VLess => vless::parse(link),
        Protocol::Trojan => trojan::parse(link),
        Protocol::Hysteria2 => hysteria2::parse(link),
        Protocol::Shadowsocks => shadowsocks::parse(link),
    }
}

/// Serializes an outbound back into its canonical share-link.
///
/// Group and direct outbounds have no link form and yield `None`.
pub fn link_for_outbound(outbound: &Outbound) -> Option<String> {
    match outbound {
        Outbound::VMess(o) => Some(vmess::serialize(o)),
        Outbound::VLess(o) => Some(vless::serialize(o)),
        Outbound::Trojan(o) => Some(trojan::serialize(o)),
        Outbound::Hysteria2(o) => Some(hysteria2::serialize(o)),
        Outbound::Shadowsocks(o) => Some(shadowsocks::serialize(o)),
        Outbound::Selector(_) | Outbound::UrlTest(_) | Outbound::Direct(_) => None,
    }
}

/// Builds a URL query string from key/value pairs, skipping empty values.
pub(crate) fn build_query(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        if !value.is_empty() {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

/// Parses a host:port string, handling IPv6 addresses in brackets.
pub(crate) fn parse_host_port(hostport: &str) -> Option<(String, u16)> {
    if hostport.starts_with('[') {
        let bracket_end = hostport.find(']')?;
        let host = hostport[1..bracket_end].to_string();
        let port = hostport.get(bracket_end + 2..)?.parse().ok()?;
        return Some((host, port));
    }

    let colon_pos = hostport.rfind(':')?;
    let host = hostport[..colon_pos].to_string();
    if host.is_empty() {
        return None;
    }
    let port = hostport[colon_pos + 1..].parse().ok()?;
    Some((host, port))
}
