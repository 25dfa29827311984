//! Trojan share-link parser and serializer.
//!
//! Format: `trojan://password@host:port?params#name`. Trojan always runs
//! over TLS, so the TLS block is unconditional.

use std::collections::HashMap;

use tracing::trace;
use url::Url;

use crate::config::outbound::{Outbound, TrojanOutbound};
use crate::config::shared::{OutboundTlsConfig, Transport};
use crate::error::{Error, Result};
use crate::parser::protocols::{Protocol, build_query};
use crate::parser::protocols::vless::websocket_from_params;

fn invalid(reason: impl Into<String>) -> Error {
    Error::invalid(Protocol::Trojan, reason)
}

/// Parses a `trojan://` link.
pub fn parse(link: &str) -> Result<Outbound> {
    trace!("Parsing Trojan link");
    let url = Url::parse(link).map_err(|e| invalid(format!("invalid URI: {e}")))?;

    if url.scheme() != "trojan" {
        return Err(invalid("unexpected scheme"));
    }

    let password = urlencoding::decode(url.username())
        .unwrap_or_else(|_| url.username().into())
        .into_owned();
    if password.is_empty() {
        return Err(invalid("missing password"));
    }

    let server = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| invalid("missing host"))?
        .to_string();
    let server_port = url.port().unwrap_or(443);

    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    let transport = websocket_from_params(&params, &server);

    let server_name = params
        .get("sni")
        .filter(|sni| !sni.is_empty())
        .map_or(server.as_str(), String::as_str);
    let mut tls = OutboundTlsConfig::standard(server_name);
    if let Some(alpn) = params.get("alpn").filter(|a| !a.is_empty()) {
        tls.alpn = alpn.split(',').map(|s| s.trim().to_string()).collect();
    }

    Ok(Outbound::Trojan(TrojanOutbound {
        tag: String::new(),
        server,
        server_port,
        password,
        transport,
        tls: Some(tls),
    }))
}

/// Serializes a Trojan outbound back into its share-link form.
pub fn serialize(outbound: &TrojanOutbound) -> String {
    let mut link = format!(
        "trojan://{}@{}:{}",
        outbound.password, outbound.server, outbound.server_port
    );

    let transport_type = match &outbound.transport {
        Some(Transport::WebSocket(_)) => "ws",
        None => "",
    };
    let alpn = outbound
        .tls
        .as_ref()
        .map(|tls| tls.alpn.join(","))
        .unwrap_or_default();
    let query = build_query(&[
        ("type", transport_type),
        (
            "path",
            outbound
                .transport
                .as_ref()
                .and_then(Transport::path)
                .unwrap_or_default(),
        ),
        (
            "host",
            outbound
                .transport
                .as_ref()
                .and_then(Transport::host_header)
                .unwrap_or_default(),
        ),
        (
            "sni",
            outbound
                .tls
                .as_ref()
                .and_then(|tls| tls.server_name.as_deref())
                .unwrap_or_default(),
        ),
        ("alpn", &alpn),
    ]);
    if !query.is_empty() {
        link.push('?');
        link.push_str(&query);
    }
    link
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_trojan(link: &str) -> TrojanOutbound {
        match parse(link).unwrap() {
            Outbound::Trojan(trojan) => trojan,
            _ => panic!("Expected Trojan outbound"),
        }
    }

    #[test]
    fn test_trojan_basic() {
        let trojan = parse_trojan("trojan://pwd@host.com:443");
        assert_eq!(trojan.server, "host.com");
        assert_eq!(trojan.server_port, 443);
        assert_eq!(trojan.password, "pwd");

        // TLS is unconditional for trojan
        let tls = trojan.tls.unwrap();
        assert!(tls.enabled);
        assert!(!tls.insecure);
        assert_eq!(tls.server_name.as_deref(), Some("host.com"));
    }

    #[test]
    fn test_trojan_with_sni_and_websocket() {
        let trojan = parse_trojan("trojan://pwd@host.com:443?sni=example.com&type=ws&path=/ws");
        let tls = trojan.tls.unwrap();
        assert_eq!(tls.server_name.as_deref(), Some("example.com"));

        let transport = trojan.transport.unwrap();
        assert_eq!(transport.path(), Some("/ws"));
        assert_eq!(transport.host_header(), Some("host.com"));
    }

    #[test]
    fn test_trojan_default_port() {
        let trojan = parse_trojan("trojan://pwd@host.com");
        assert_eq!(trojan.server_port, 443);
    }

    #[test]
    fn test_trojan_alpn_override() {
        let trojan = parse_trojan("trojan://pwd@host.com:443?alpn=h2,http/1.1");
        assert_eq!(trojan.tls.unwrap().alpn, vec!["h2", "http/1.1"]);
    }

    #[test]
    fn test_trojan_default_alpn() {
        let trojan = parse_trojan("trojan://pwd@host.com:443");
        assert_eq!(trojan.tls.unwrap().alpn, vec!["http/1.1"]);
    }

    #[test]
    fn test_trojan_percent_encoded_password() {
        let trojan = parse_trojan("trojan://p%40ss@host.com:443");
        assert_eq!(trojan.password, "p@ss");
    }

    #[test]
    fn test_trojan_missing_parts_fail() {
        assert!(parse("trojan://host.com:443").is_err()); // no password
        assert!(parse("trojan://").is_err());
        assert!(parse("vless://uuid@host.com:443").is_err()); // wrong scheme
    }

    #[test]
    fn test_trojan_roundtrip() {
        let original = parse_trojan(
            "trojan://pwd@host.com:443?sni=example.com&type=ws&path=%2Fws&alpn=h2",
        );
        let reparsed = parse_trojan(&serialize(&original));

        assert_eq!(reparsed.server, original.server);
        assert_eq!(reparsed.server_port, original.server_port);
        assert_eq!(reparsed.password, original.password);
        assert_eq!(
            reparsed.transport.as_ref().and_then(Transport::path),
            original.transport.as_ref().and_then(Transport::path)
        );
        let reparsed_tls = reparsed.tls.unwrap();
        let original_tls = original.tls.unwrap();
        assert_eq!(reparsed_tls.server_name, original_tls.server_name);
        assert_eq!(reparsed_tls.alpn, original_tls.alpn);
    }
}
