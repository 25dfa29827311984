//! Shared field structures for sing-box configuration.
//!
//! This module contains reusable structures that are embedded in multiple
//! outbound types: the client TLS block and the stream transport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::serde_helpers::is_false;

/// TLS configuration for outbound (client) connections.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct OutboundTlsConfig {
    /// Enable TLS
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// Server name for verification and SNI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,

    /// Accept any server certificate (insecure)
    #[serde(default, skip_serializing_if = "is_false")]
    pub insecure: bool,

    /// List of supported ALPN protocols
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,

    /// uTLS configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utls: Option<UtlsConfig>,
}

impl OutboundTlsConfig {
    /// The TLS block used by vmess/vless/trojan outbounds: certificate
    /// verification on, HTTP/1.1 ALPN, Chrome fingerprint.
    pub fn standard(server_name: impl Into<String>) -> Self {
        Self {
            enabled: true,
            server_name: Some(server_name.into()),
            insecure: false,
            alpn: vec!["http/1.1".to_string()],
            utls: Some(UtlsConfig {
                enabled: true,
                fingerprint: Some("chrome".to_string()),
            }),
        }
    }

    /// The TLS block used by hysteria2 outbounds: no certificate
    /// verification and no fingerprint spoofing.
    pub fn permissive(server_name: impl Into<String>) -> Self {
        Self {
            enabled: true,
            server_name: Some(server_name.into()),
            insecure: true,
            ..Default::default()
        }
    }
}

/// uTLS configuration for TLS fingerprint resistance.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UtlsConfig {
    /// Enable uTLS
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// Fingerprint to use: chrome, firefox, edge, safari, ios, android, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// V2Ray stream transport configuration for outbounds.
///
/// Only WebSocket is produced by the share-link parsers; an absent transport
/// means the protocol's plain TCP default.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transport {
    /// WebSocket transport
    #[serde(rename = "ws")]
    WebSocket(WebSocketTransport),
}

impl Transport {
    /// Build a WebSocket transport with the given path and `Host` header.
    pub fn websocket(path: impl Into<String>, host: impl Into<String>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Host".to_string(), host.into());
        Transport::WebSocket(WebSocketTransport {
            path: Some(path.into()),
            headers,
        })
    }

    /// The request path, if this transport carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Transport::WebSocket(ws) => ws.path.as_deref(),
        }
    }

    /// The `Host` header, if set.
    pub fn host_header(&self) -> Option<&str> {
        match self {
            Transport::WebSocket(ws) => ws.headers.get("Host").map(String::as_str),
        }
    }
}

/// WebSocket transport configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WebSocketTransport {
    /// HTTP request path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Extra headers
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}
