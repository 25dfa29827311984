//! VLESS share-link parser and serializer.
//!
//! Format: `vless://uuid@host:port?params#name`

use std::collections::HashMap;

use tracing::trace;
use url::Url;

use crate::config::outbound::{Outbound, VLessOutbound};
use crate::config::shared::{OutboundTlsConfig, Transport};
use crate::error::{Error, Result};
use crate::parser::protocols::{Protocol, build_query};

/// Ports on which TLS is assumed even without an explicit `security=tls`
/// parameter.
const TLS_PORTS: [u16; 6] = [443, 2053, 2083, 2087, 2096, 8443];

fn invalid(reason: impl Into<String>) -> Error {
    Error::invalid(Protocol::VLess, reason)
}

/// Parses a `vless://` link.
pub fn parse(link: &str) -> Result<Outbound> {
    trace!("Parsing VLESS link");
    let url = Url::parse(link).map_err(|e| invalid(format!("invalid URI: {e}")))?;

    if url.scheme() != "vless" {
        return Err(invalid("unexpected scheme"));
    }

    let uuid = url.username().to_string();
    if uuid.is_empty() {
        return Err(invalid("missing uuid"));
    }

    let server = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| invalid("missing host"))?
        .to_string();
    let server_port = url.port().unwrap_or(443);

    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    let transport = websocket_from_params(&params, &server);

    let tls_enabled = params.get("security").is_some_and(|s| s == "tls")
        || TLS_PORTS.contains(&server_port);
    let tls = tls_enabled.then(|| {
        let server_name = params
            .get("sni")
            .filter(|sni| !sni.is_empty())
            .map_or(server.as_str(), String::as_str);
        OutboundTlsConfig::standard(server_name)
    });

    let flow = params.get("flow").filter(|f| !f.is_empty()).cloned();

    Ok(Outbound::VLess(VLessOutbound {
        tag: String::new(),
        server,
        server_port,
        uuid,
        flow,
        transport,
        tls,
    }))
}

/// Serializes a VLESS outbound back into its share-link form.
pub fn serialize(outbound: &VLessOutbound) -> String {
    let mut link = format!(
        "vless://{}@{}:{}",
        outbound.uuid, outbound.server, outbound.server_port
    );

    let transport_type = match &outbound.transport {
        Some(Transport::WebSocket(_)) => "ws",
        None => "",
    };
    let query = build_query(&[
        ("flow", outbound.flow.as_deref().unwrap_or_default()),
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
    ]);
    if !query.is_empty() {
        link.push('?');
        link.push_str(&query);
    }
    link
}

/// Builds the WebSocket transport from `type=ws` query parameters, shared
/// with the trojan parser.
pub(crate) fn websocket_from_params(
    params: &HashMap<String, String>,
    server: &str,
) -> Option<Transport> {
    if params.get("type").map(String::as_str) != Some("ws") {
        return None;
    }
    let path = params
        .get("path")
        .filter(|p| !p.is_empty())
        .map_or("/", String::as_str);
    let host = params
        .get("host")
        .filter(|h| !h.is_empty())
        .map_or(server, String::as_str);
    Some(Transport::websocket(path, host))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_vless(link: &str) -> VLessOutbound {
        match parse(link).unwrap() {
            Outbound::VLess(vless) => vless,
            _ => panic!("Expected VLESS outbound"),
        }
    }

    #[test]
    fn test_vless_basic() {
        let vless = parse_vless("vless://uuid-1@example.com:8080");
        assert_eq!(vless.server, "example.com");
        assert_eq!(vless.server_port, 8080);
        assert_eq!(vless.uuid, "uuid-1");
        assert!(vless.tls.is_none());
        assert!(vless.transport.is_none());
    }

    #[test]
    fn test_vless_default_port_enables_tls() {
        // No explicit port falls back to 443, which is in the TLS port set.
        let vless = parse_vless("vless://uuid-1@example.com");
        assert_eq!(vless.server_port, 443);
        let tls = vless.tls.unwrap();
        assert!(tls.enabled);
        assert_eq!(tls.server_name.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_vless_security_param_enables_tls() {
        let vless = parse_vless("vless://uuid-1@example.com:8080?security=tls&sni=sni.example.com");
        let tls = vless.tls.unwrap();
        assert!(tls.enabled);
        assert!(!tls.insecure);
        assert_eq!(tls.server_name.as_deref(), Some("sni.example.com"));
        assert_eq!(tls.alpn, vec!["http/1.1"]);
        assert_eq!(tls.utls.unwrap().fingerprint.as_deref(), Some("chrome"));
    }

    #[test]
    fn test_vless_well_known_tls_ports() {
        for port in [2053, 2083, 2087, 2096, 8443] {
            let vless = parse_vless(&format!("vless://uuid-1@example.com:{port}"));
            assert!(vless.tls.is_some(), "port {port} should enable TLS");
        }
        assert!(parse_vless("vless://uuid-1@example.com:8080").tls.is_none());
    }

    #[test]
    fn test_vless_websocket_transport() {
        let vless =
            parse_vless("vless://uuid-1@example.com:443?type=ws&path=/ws&host=cdn.example.com");
        let transport = vless.transport.unwrap();
        assert_eq!(transport.path(), Some("/ws"));
        assert_eq!(transport.host_header(), Some("cdn.example.com"));
    }

    #[test]
    fn test_vless_websocket_defaults() {
        let vless = parse_vless("vless://uuid-1@example.com:443?type=ws");
        let transport = vless.transport.unwrap();
        assert_eq!(transport.path(), Some("/"));
        assert_eq!(transport.host_header(), Some("example.com"));
    }

    #[test]
    fn test_vless_flow() {
        let vless = parse_vless("vless://uuid-1@example.com:443?flow=xtls-rprx-vision");
        assert_eq!(vless.flow.as_deref(), Some("xtls-rprx-vision"));
    }

    #[test]
    fn test_vless_missing_parts_fail() {
        assert!(parse("vless://example.com:443").is_err()); // no uuid
        assert!(parse("vless://").is_err());
        assert!(parse("trojan://pwd@example.com:443").is_err()); // wrong scheme
    }

    #[test]
    fn test_vless_roundtrip() {
        let original = parse_vless(
            "vless://uuid-1@example.com:443?flow=xtls-rprx-vision&type=ws&path=%2Fws&host=cdn.example.com&sni=sni.example.com",
        );
        let reparsed = parse_vless(&serialize(&original));

        assert_eq!(reparsed.server, original.server);
        assert_eq!(reparsed.server_port, original.server_port);
        assert_eq!(reparsed.uuid, original.uuid);
        assert_eq!(reparsed.flow, original.flow);
        assert_eq!(
            reparsed.transport.as_ref().and_then(Transport::path),
            original.transport.as_ref().and_then(Transport::path)
        );
        assert_eq!(
            reparsed.tls.as_ref().unwrap().server_name,
            original.tls.as_ref().unwrap().server_name
        );
    }
}
