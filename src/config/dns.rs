//! DNS configuration types for sing-box.

use serde::{Deserialize, Serialize};

use crate::config::serde_helpers::string_or_vec;

/// DNS configuration for sing-box
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Dns {
    /// Default DNS server tag. The first server will be used if empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#final: Option<String>,

    /// List of DNS rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<DnsRule>,

    /// List of DNS servers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<DnsServer>,

    /// Default domain strategy for resolving domain names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

/// Domain resolution strategy
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    PreferIpv4,
    PreferIpv6,
    Ipv4Only,
    Ipv6Only,
}

/// DNS server configuration.
///
/// Uses the address-based server form (`"tls://..."`, `"local"`,
/// `"rcode://success"`), which every sing-box release accepts.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DnsServer {
    /// DNS server address (e.g., "local", "tls://208.67.222.123", "rcode://success")
    pub address: String,

    /// Tag of another server used to resolve the domain name in the address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_resolver: Option<String>,

    /// Tag of an outbound for connecting to the DNS server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detour: Option<String>,

    pub tag: String,
}

impl DnsServer {
    pub fn new(tag: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            address: address.into(),
            ..Default::default()
        }
    }

    /// Set the address resolver server tag.
    pub fn with_address_resolver(mut self, resolver: impl Into<String>) -> Self {
        self.address_resolver = Some(resolver.into());
        self
    }

    /// Set the outbound detour.
    pub fn with_detour(mut self, detour: impl Into<String>) -> Self {
        self.detour = Some(detour.into());
        self
    }
}

/// A DNS rule that matches queries and routes them to a server.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DnsRule {
    /// Match Clash mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clash_mode: Option<String>,

    /// Match rule sets
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub rule_set: Vec<String>,

    /// Match source IP CIDR
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub source_ip_cidr: Vec<String>,

    /// Target DNS server tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl DnsRule {
    /// Create a rule targeting the given server.
    pub fn to_server(server: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            ..Default::default()
        }
    }

    /// Match a Clash mode.
    pub fn match_clash_mode(mut self, mode: impl Into<String>) -> Self {
        self.clash_mode = Some(mode.into());
        self
    }

    /// Match rule sets.
    pub fn match_rule_set(mut self, rule_sets: Vec<String>) -> Self {
        self.rule_set = rule_sets;
        self
    }

    /// Match source IP CIDRs.
    pub fn match_source_ip_cidr(mut self, cidrs: Vec<String>) -> Self {
        self.source_ip_cidr = cidrs;
        self
    }
}
