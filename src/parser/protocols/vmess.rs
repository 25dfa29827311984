//! VMess share-link parser and serializer.
//!
//! VMess links are Base64-encoded JSON:
//! `vmess://BASE64({"v":"2","ps":"name","add":"host","port":443,"id":"uuid",...})`

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::outbound::{Outbound, VMessOutbound};
use crate::config::shared::{OutboundTlsConfig, Transport};
use crate::error::{Error, Result};
use crate::parser::base64::decode_base64_text;
use crate::parser::protocols::Protocol;

/// VMess link JSON payload.
///
/// Field declaration order is the canonical serialization order.
#[derive(Serialize, Deserialize, Debug, Default)]
struct VMessLink {
    #[serde(default)]
    v: String,
    /// Remark/display name
    #[serde(default)]
    ps: String,
    /// Server address
    #[serde(default)]
    add: String,
    /// Server port (appears as string or number in the wild)
    #[serde(default, deserialize_with = "deserialize_port")]
    port: Option<u16>,
    /// UUID
    #[serde(default)]
    id: String,
    /// Alter ID (string or number)
    #[serde(default, deserialize_with = "deserialize_alter_id")]
    aid: u32,
    /// Encryption method
    #[serde(default)]
    scy: String,
    /// Network type (tcp, ws, ...)
    #[serde(default)]
    net: String,
    /// WebSocket path
    #[serde(default)]
    path: String,
    /// WebSocket Host header
    #[serde(default)]
    host: String,
    /// "tls" when TLS is enabled
    #[serde(default)]
    tls: String,
    /// SNI
    #[serde(default)]
    sni: String,
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::invalid(Protocol::VMess, reason)
}

/// Parses a `vmess://` link.
pub fn parse(link: &str) -> Result<Outbound> {
    trace!("Parsing VMess link");
    let encoded = link
        .strip_prefix("vmess://")
        .ok_or_else(|| invalid("missing vmess:// prefix"))?;

    let decoded = decode_base64_text(encoded).ok_or_else(|| invalid("invalid Base64 payload"))?;

    let payload: VMessLink =
        serde_json::from_str(&decoded).map_err(|e| invalid(format!("invalid JSON payload: {e}")))?;

    if payload.add.is_empty() {
        return Err(invalid("missing server address"));
    }
    if payload.id.is_empty() {
        return Err(invalid("missing uuid"));
    }
    let server_port = match payload.port {
        Some(port) if port != 0 => port,
        _ => return Err(invalid("missing server port")),
    };

    let transport = if payload.net == "ws" {
        let path = if payload.path.is_empty() {
            "/"
        } else {
            payload.path.as_str()
        };
        let host = if payload.host.is_empty() {
            payload.add.as_str()
        } else {
            payload.host.as_str()
        };
        Some(Transport::websocket(path, host))
    } else {
        None
    };

    let tls = if payload.tls == "tls" {
        let server_name = if payload.sni.is_empty() {
            payload.add.as_str()
        } else {
            payload.sni.as_str()
        };
        Some(OutboundTlsConfig::standard(server_name))
    } else {
        None
    };

    let security = if payload.scy.is_empty() {
        "auto".to_string()
    } else {
        payload.scy
    };

    Ok(Outbound::VMess(VMessOutbound {
        tag: String::new(),
        server: payload.add,
        server_port,
        uuid: payload.id,
        security: Some(security),
        alter_id: payload.aid,
        transport,
        tls,
    }))
}

/// Serializes a VMess outbound back into its share-link form.
pub fn serialize(outbound: &VMessOutbound) -> String {
    let payload = VMessLink {
        v: "2".to_string(),
        ps: outbound.tag.clone(),
        add: outbound.server.clone(),
        port: Some(outbound.server_port),
        id: outbound.uuid.clone(),
        aid: outbound.alter_id,
        scy: outbound
            .security
            .clone()
            .unwrap_or_else(|| "auto".to_string()),
        net: match &outbound.transport {
            Some(Transport::WebSocket(_)) => "ws".to_string(),
            None => "tcp".to_string(),
        },
        path: outbound
            .transport
            .as_ref()
            .and_then(Transport::path)
            .unwrap_or_default()
            .to_string(),
        host: outbound
            .transport
            .as_ref()
            .and_then(Transport::host_header)
            .unwrap_or_default()
            .to_string(),
        tls: match &outbound.tls {
            Some(tls) if tls.enabled => "tls".to_string(),
            _ => String::new(),
        },
        sni: outbound
            .tls
            .as_ref()
            .and_then(|tls| tls.server_name.clone())
            .unwrap_or_default(),
    };

    // A struct of plain fields cannot fail to serialize.
    let json = serde_json::to_string(&payload).expect("vmess payload serialization");
    format!("vmess://{}", STANDARD.encode(json))
}

/// Custom deserializer for port (handles both string and number).
fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        String(String),
    }

    match Option::<PortValue>::deserialize(deserializer)? {
        Some(PortValue::Number(n)) => Ok(Some(n)),
        Some(PortValue::String(s)) if s.is_empty() => Ok(None),
        Some(PortValue::String(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Custom deserializer for alter ID (string or number, defaulting to 0).
fn deserialize_alter_id<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AidValue {
        Number(u32),
        String(String),
    }

    match Option::<AidValue>::deserialize(deserializer)? {
        Some(AidValue::Number(n)) => Ok(n),
        Some(AidValue::String(s)) if s.is_empty() => Ok(0),
        Some(AidValue::String(s)) => s.parse().map_err(serde::de::Error::custom),
        None => Ok(0),
    }
}
