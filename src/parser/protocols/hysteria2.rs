//! Hysteria2 share-link parser and serializer.
//!
//! Format: `hysteria2://auth@host:port?params#name` (scheme alias `hy2://`).
//! Hysteria2 runs over QUIC with TLS but certificate verification is off
//! and no fingerprint spoofing applies.

use std::collections::HashMap;

use tracing::trace;
use url::Url;

use crate::config::outbound::{Hysteria2Outbound, Outbound};
use crate::config::shared::OutboundTlsConfig;
use crate::error::{Error, Result};
use crate::parser::protocols::{Protocol, build_query};

fn invalid(reason: impl Into<String>) -> Error {
    Error::invalid(Protocol::Hysteria2, reason)
}

/// Parses a `hysteria2://` or `hy2://` link.
pub fn parse(link: &str) -> Result<Outbound> {
    trace!("Parsing Hysteria2 link");
    let url = Url::parse(link).map_err(|e| invalid(format!("invalid URI: {e}")))?;

    if url.scheme() != "hysteria2" && url.scheme() != "hy2" {
        return Err(invalid("unexpected scheme"));
    }

    let server = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| invalid("missing host"))?
        .to_string();
    let server_port = url.port().ok_or_else(|| invalid("missing port"))?;

    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    let userinfo = urlencoding::decode(url.username())
        .unwrap_or_else(|_| url.username().into())
        .into_owned();
    let password = if userinfo.is_empty() {
        params.get("password").cloned().unwrap_or_default()
    } else {
        userinfo
    };

    let server_name = params
        .get("sni")
        .filter(|sni| !sni.is_empty())
        .map_or_else(|| server.clone(), String::clone);

    Ok(Outbound::Hysteria2(Hysteria2Outbound {
        tag: String::new(),
        server,
        server_port,
        password,
        tls: Some(OutboundTlsConfig::permissive(server_name)),
    }))
}

/// Serializes a Hysteria2 outbound back into its share-link form.
pub fn serialize(outbound: &Hysteria2Outbound) -> String {
    let mut link = String::from("hysteria2://");
    if !outbound.password.is_empty() {
        link.push_str(&outbound.password);
        link.push('@');
    }
    link.push_str(&format!("{}:{}", outbound.server, outbound.server_port));

    let query = build_query(&[(
        "sni",
        outbound
            .tls
            .as_ref()
            .and_then(|tls| tls.server_name.as_deref())
            .unwrap_or_default(),
    )]);
    if !query.is_empty() {
        link.push('?');
        link.push_str(&query);
    }
    link
}
