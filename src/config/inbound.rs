//! Inbound configuration types for sing-box.
//!
//! Only the two listeners the generated document uses are modeled: the TUN
//! interface and the local mixed proxy.

use serde::{Deserialize, Serialize};

use crate::config::serde_helpers::is_false;

/// Inbound configuration enum
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inbound {
    /// TUN interface
    Tun(TunInbound),
    /// Mixed SOCKS/HTTP listener
    Mixed(MixedInbound),
}

/// TUN inbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TunInbound {
    /// Interface addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<String>,

    /// Set the default route to the TUN interface
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_route: bool,

    /// Enable endpoint-independent NAT
    #[serde(default, skip_serializing_if = "is_false")]
    pub endpoint_independent_nat: bool,

    /// Maximum transmission unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,

    /// Platform-specific settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<TunPlatform>,

    /// Enable protocol sniffing
    #[serde(default, skip_serializing_if = "is_false")]
    pub sniff: bool,

    /// TCP/IP stack: system, gvisor, or mixed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    /// Enforce strict routing rules
    #[serde(default, skip_serializing_if = "is_false")]
    pub strict_route: bool,
}

/// TUN platform configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TunPlatform {
    /// System HTTP proxy settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<HttpProxy>,
}

/// System HTTP proxy announced by the TUN platform integration
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct HttpProxy {
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    pub server: String,

    pub server_port: u16,
}

/// Mixed SOCKS/HTTP inbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MixedInbound {
    /// Listen address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen: Option<String>,

    /// Listen port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_port: Option<u16>,

    /// Enable protocol sniffing
    #[serde(default, skip_serializing_if = "is_false")]
    pub sniff: bool,
}

impl MixedInbound {
    pub fn listen(addr: impl Into<String>, port: u16) -> Self {
        Self {
            listen: Some(addr.into()),
            listen_port: Some(port),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tun_inbound_serialization() {
        let tun = Inbound::Tun(TunInbound {
            address: vec!["172.19.0.1/30".to_string()],
            auto_route: true,
            mtu: Some(9000),
            sniff: true,
            stack: Some("system".to_string()),
            platform: Some(TunPlatform {
                http_proxy: Some(HttpProxy {
                    enabled: true,
                    server: "127.0.0.1".to_string(),
                    server_port: 2080,
                }),
            }),
            ..Default::default()
        });
        let json = serde_json::to_string(&tun).unwrap();
        assert!(json.contains(r#""type":"tun""#));
        assert!(json.contains(r#""auto_route":true"#));
        assert!(json.contains(r#""mtu":9000"#));
        assert!(json.contains(r#""server_port":2080"#));
        // false defaults are skipped
        assert!(!json.contains("strict_route"));
        assert!(!json.contains("endpoint_independent_nat"));
    }

    #[test]
    fn test_mixed_inbound_serialization() {
        let mut mixed = MixedInbound::listen("127.0.0.1", 2080);
        mixed.sniff = true;
        let json = serde_json::to_string(&Inbound::Mixed(mixed)).unwrap();
        assert!(json.contains(r#""type":"mixed""#));
        assert!(json.contains(r#""listen":"127.0.0.1""#));
        assert!(json.contains(r#""listen_port":2080"#));
        assert!(json.contains(r#""sniff":true"#));
    }

    #[test]
    fn test_inbound_roundtrip() {
        let json = r#"{"type": "mixed", "listen": "127.0.0.1", "listen_port": 7890}"#;
        let inbound: Inbound = serde_json::from_str(json).unwrap();
        match inbound {
            Inbound::Mixed(mixed) => {
                assert_eq!(mixed.listen.as_deref(), Some("127.0.0.1"));
                assert_eq!(mixed.listen_port, Some(7890));
            }
            Inbound::Tun(_) => panic!("Expected mixed inbound"),
        }
    }
}
