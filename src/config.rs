use serde::{Deserialize, Serialize};

use crate::config::dns::Dns;
use crate::config::inbound::Inbound;
use crate::config::outbound::Outbound;
use crate::config::route::Route;

pub mod dns;
pub mod inbound;
pub mod outbound;
pub mod route;
pub mod serde_helpers;
pub mod shared;

/// Main sing-box configuration structure
///
/// This struct represents the sections of the sing-box configuration file
/// this tool produces. All fields are omitted from serialization when unset.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SingBoxConfig {
    /// DNS configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<Dns>,

    /// Inbound configurations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inbounds: Vec<Inbound>,

    /// Outbound configurations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outbounds: Vec<Outbound>,

    /// Route configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

impl SingBoxConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder
    pub fn builder() -> SingBoxConfigBuilder {
        SingBoxConfigBuilder::new()
    }

    /// Serialize the configuration to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the configuration to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Builder for SingBoxConfig
#[derive(Default)]
pub struct SingBoxConfigBuilder {
    config: SingBoxConfig,
}

impl SingBoxConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set DNS configuration
    pub fn dns(mut self, dns: Dns) -> Self {
        self.config.dns = Some(dns);
        self
    }

    /// Add an inbound
    pub fn inbound(mut self, inbound: Inbound) -> Self {
        self.config.inbounds.push(inbound);
        self
    }

    /// Add an outbound
    pub fn outbound(mut self, outbound: Outbound) -> Self {
        self.config.outbounds.push(outbound);
        self
    }

    /// Add multiple outbounds
    pub fn outbounds(mut self, outbounds: impl IntoIterator<Item = Outbound>) -> Self {
        self.config.outbounds.extend(outbounds);
        self
    }

    /// Set route configuration
    pub fn route(mut self, route: Route) -> Self {
        self.config.route = Some(route);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SingBoxConfig {
        self.config
    }
}
