//! Shadowsocks share-link parser and serializer.
//!
//! Format: `ss://BASE64(method:password)@host:port#name`. The fragment is a
//! display name and is discarded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::trace;

use crate::config::outbound::{Outbound, ShadowsocksOutbound};
use crate::error::{Error, Result};
use crate::parser::base64::decode_base64_text;
use crate::parser::protocols::{Protocol, parse_host_port};

fn invalid(reason: impl Into<String>) -> Error {
    Error::invalid(Protocol::Shadowsocks, reason)
}

/// Parses an `ss://` link.
pub fn parse(link: &str) -> Result<Outbound> {
    trace!("Parsing Shadowsocks link");
    let body = link
        .strip_prefix("ss://")
        .ok_or_else(|| invalid("missing ss:// prefix"))?;

    // Drop the display-name fragment
    let body = body.split('#').next().unwrap_or(body);

    let (userinfo, hostport) = body
        .split_once('@')
        .ok_or_else(|| invalid("missing credential separator"))?;

    let decoded =
        decode_base64_text(userinfo).ok_or_else(|| invalid("invalid Base64 userinfo"))?;
    // Password may itself contain colons; split at the first one only.
    let (method, password) = decoded
        .split_once(':')
        .ok_or_else(|| invalid("missing method:password separator"))?;
    if method.is_empty() || password.is_empty() {
        return Err(invalid("empty method or password"));
    }

    let (server, server_port) =
        parse_host_port(hostport).ok_or_else(|| invalid("missing server or port"))?;

    Ok(Outbound::Shadowsocks(ShadowsocksOutbound {
        tag: String::new(),
        server,
        server_port,
        method: method.to_string(),
        password: password.to_string(),
    }))
}

/// Serializes a Shadowsocks outbound back into its share-link form.
pub fn serialize(outbound: &ShadowsocksOutbound) -> String {
    let userinfo = STANDARD.encode(format!("{}:{}", outbound.method, outbound.password));
    format!(
        "ss://{}@{}:{}",
        userinfo, outbound.server, outbound.server_port
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ss(link: &str) -> ShadowsocksOutbound {
        match parse(link).unwrap() {
            Outbound::Shadowsocks(ss) => ss,
            _ => panic!("Expected Shadowsocks outbound"),
        }
    }

    #[test]
    fn test_shadowsocks_basic() {
        // Base64 of "aes-128-gcm:password"
        let ss = parse_ss("ss://YWVzLTEyOC1nY206cGFzc3dvcmQ=@server.example.com:8388");
        assert_eq!(ss.server, "server.example.com");
        assert_eq!(ss.server_port, 8388);
        assert_eq!(ss.method, "aes-128-gcm");
        assert_eq!(ss.password, "password");
    }

    #[test]
    fn test_shadowsocks_fragment_discarded() {
        let ss = parse_ss("ss://YWVzLTEyOC1nY206cGFzc3dvcmQ=@server.example.com:8388#My%20Server");
        assert_eq!(ss.server, "server.example.com");
    }

    #[test]
    fn test_shadowsocks_password_with_colons() {
        let encoded = STANDARD.encode("chacha20-ietf-poly1305:pass:with:colons");
        let ss = parse_ss(&format!("ss://{encoded}@server.com:8388"));
        assert_eq!(ss.method, "chacha20-ietf-poly1305");
        assert_eq!(ss.password, "pass:with:colons");
    }

    #[test]
    fn test_shadowsocks_unpadded_userinfo() {
        // URL-safe Base64 without padding, as emitted by many providers
        let ss = parse_ss("ss://YWVzLTEyOC1nY206cGFzc3dvcmQ@server.example.com:8388");
        assert_eq!(ss.method, "aes-128-gcm");
    }

    #[test]
    fn test_shadowsocks_ipv6_host() {
        let encoded = STANDARD.encode("aes-128-gcm:pwd");
        let ss = parse_ss(&format!("ss://{encoded}@[::1]:8388"));
        assert_eq!(ss.server, "::1");
        assert_eq!(ss.server_port, 8388);
    }

    #[test]
    fn test_shadowsocks_missing_parts_fail() {
        assert!(parse("ss://YWVzLTEyOC1nY206cGFzc3dvcmQ=").is_err()); // no @
        assert!(parse("ss://YWVzLTEyOC1nY206cGFzc3dvcmQ=@server.com").is_err()); // no port
        assert!(parse("ss://bm9jb2xvbg==@server.com:8388").is_err()); // no colon in userinfo
        assert!(parse("ss://!!!@server.com:8388").is_err()); // bad base64
    }

    #[test]
    fn test_shadowsocks_roundtrip() {
        let original = parse_ss("ss://YWVzLTEyOC1nY206cGFzc3dvcmQ=@server.example.com:8388#Name");
        let link = serialize(&original);
        // Serialization drops the display name
        assert!(!link.contains('#'));
        let reparsed = parse_ss(&link);
        assert_eq!(reparsed.server, original.server);
        assert_eq!(reparsed.server_port, original.server_port);
        assert_eq!(reparsed.method, original.method);
        assert_eq!(reparsed.password, original.password);
    }
}
