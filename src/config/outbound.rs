//! Outbound configuration types for sing-box.
//!
//! The protocol outbounds double as the normalized record produced by the
//! share-link parsers: an entry is only constructed once its mandatory
//! fields (server, port, credential) are known, and it is never mutated
//! afterwards apart from tag assignment.

use serde::{Deserialize, Serialize};

use crate::config::serde_helpers::is_zero_u32;
use crate::config::shared::{OutboundTlsConfig, Transport};

/// Outbound configuration enum
///
/// Represents the outbound types the generated document uses: the group
/// outbounds (selector/urltest), direct passthrough, and the five proxy
/// protocols.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    /// Selector outbound (manual selection)
    Selector(SelectorOutbound),
    /// URLTest outbound (automatic latency-based selection)
    #[serde(rename = "urltest")]
    UrlTest(UrlTestOutbound),
    /// Direct outbound (send requests directly)
    Direct(DirectOutbound),
    /// VMess outbound
    #[serde(rename = "vmess")]
    VMess(VMessOutbound),
    /// VLESS outbound
    #[serde(rename = "vless")]
    VLess(VLessOutbound),
    /// Trojan outbound
    Trojan(TrojanOutbound),
    /// Hysteria2 outbound
    Hysteria2(Hysteria2Outbound),
    /// Shadowsocks outbound
    Shadowsocks(ShadowsocksOutbound),
}

impl Outbound {
    /// The outbound's tag, empty when not yet assigned.
    pub fn tag(&self) -> &str {
        match self {
            Outbound::Selector(o) => &o.tag,
            Outbound::UrlTest(o) => &o.tag,
            Outbound::Direct(o) => &o.tag,
            Outbound::VMess(o) => &o.tag,
            Outbound::VLess(o) => &o.tag,
            Outbound::Trojan(o) => &o.tag,
            Outbound::Hysteria2(o) => &o.tag,
            Outbound::Shadowsocks(o) => &o.tag,
        }
    }

    /// Assign the outbound's tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        match self {
            Outbound::Selector(o) => o.tag = tag,
            Outbound::UrlTest(o) => o.tag = tag,
            Outbound::Direct(o) => o.tag = tag,
            Outbound::VMess(o) => o.tag = tag,
            Outbound::VLess(o) => o.tag = tag,
            Outbound::Trojan(o) => o.tag = tag,
            Outbound::Hysteria2(o) => o.tag = tag,
            Outbound::Shadowsocks(o) => o.tag = tag,
        }
    }
}

/// Selector outbound (manual selection)
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SelectorOutbound {
    pub tag: String,

    /// Tags of the grouped outbounds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outbounds: Vec<String>,
}

/// URLTest outbound (automatic latency-based selection)
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UrlTestOutbound {
    pub tag: String,

    /// Tags of the probed outbounds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outbounds: Vec<String>,

    /// Probe URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Probe interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Latency tolerance in milliseconds before switching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<u32>,
}

/// Direct outbound (send requests directly)
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DirectOutbound {
    pub tag: String,
}

impl DirectOutbound {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

/// VMess outbound
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VMessOutbound {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    pub server: String,

    pub server_port: u16,

    pub uuid: String,

    /// Encryption method (defaults to "auto")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,

    /// Legacy alter ID (0 for AEAD)
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub alter_id: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,
}

/// VLESS outbound
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VLessOutbound {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    pub server: String,

    pub server_port: u16,

    pub uuid: String,

    /// Flow control (e.g., xtls-rprx-vision)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,
}

/// Trojan outbound
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrojanOutbound {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    pub server: String,

    pub server_port: u16,

    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,
}

/// Hysteria2 outbound
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Hysteria2Outbound {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    pub server: String,

    pub server_port: u16,

    /// Authentication password (some servers accept an empty password)
    #[serde(default)]
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTlsConfig>,
}

/// Shadowsocks outbound
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShadowsocksOutbound {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    pub server: String,

    pub server_port: u16,

    /// Encryption method
    pub method: String,

    pub password: String,
}
