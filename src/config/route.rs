//! Route configuration types for sing-box.
//!
//! This module contains typed configuration for routing rules, rule sets,
//! and rule actions.

use serde::{Deserialize, Serialize};

use crate::config::serde_helpers::{is_false, string_or_vec};

/// Main route configuration.
///
/// Rules are evaluated in order, first match wins; `final` names the
/// catch-all outbound.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Route {
    /// Bind outbound connections to the default NIC
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_detect_interface: bool,

    /// Default outbound tag (first outbound used if empty)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "final")]
    pub final_outbound: Option<String>,

    /// List of route rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RouteRule>,

    /// List of rule sets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_set: Vec<RuleSet>,
}

impl Route {
    /// Create a new empty route configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route rule.
    pub fn add_rule(mut self, rule: RouteRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a rule set.
    pub fn add_rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_set.push(rule_set);
        self
    }

    /// Set the final/default outbound.
    pub fn with_final(mut self, outbound: impl Into<String>) -> Self {
        self.final_outbound = Some(outbound.into());
        self
    }

    /// Enable auto interface detection.
    pub fn with_auto_detect_interface(mut self) -> Self {
        self.auto_detect_interface = true;
        self
    }
}

/// A route rule that matches connections and specifies where they go.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RouteRule {
    /// Match Clash mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clash_mode: Option<String>,

    /// Match sniffed protocol
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub protocol: Vec<String>,

    /// Match domain suffix
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub domain_suffix: Vec<String>,

    /// Match rule sets
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub rule_set: Vec<String>,

    /// Rule action (for non-route actions like hijack-dns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,

    /// Target outbound tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound: Option<String>,
}

impl RouteRule {
    /// Create a new empty rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the action.
    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the target outbound.
    pub fn with_outbound(mut self, outbound: impl Into<String>) -> Self {
        self.outbound = Some(outbound.into());
        self
    }

    /// Match a Clash mode.
    pub fn match_clash_mode(mut self, mode: impl Into<String>) -> Self {
        self.clash_mode = Some(mode.into());
        self
    }

    /// Match sniffed protocols.
    pub fn match_protocol(mut self, protocols: Vec<String>) -> Self {
        self.protocol = protocols;
        self
    }

    /// Match domain suffixes.
    pub fn match_domain_suffix(mut self, suffixes: Vec<String>) -> Self {
        self.domain_suffix = suffixes;
        self
    }

    /// Match rule sets.
    pub fn match_rule_set(mut self, rule_sets: Vec<String>) -> Self {
        self.rule_set = rule_sets;
        self
    }
}

/// Non-route rule actions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RuleAction {
    /// Redirect matched DNS traffic to the internal DNS module
    HijackDns,
    /// Reject the connection
    Reject,
}

/// Rule set declaration.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleSet {
    /// Remotely hosted, periodically refreshed rule set
    Remote(RemoteRuleSet),
}

/// Remote rule set configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RemoteRuleSet {
    pub tag: String,

    /// File format: binary (.srs) or source (.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<RuleSetFormat>,

    /// Download URL
    pub url: String,

    /// Outbound tag used for downloading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_detour: Option<String>,

    /// Refresh interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_interval: Option<String>,
}

impl RemoteRuleSet {
    pub fn new(tag: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the format.
    pub fn with_format(mut self, format: RuleSetFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the download detour outbound.
    pub fn with_download_detour(mut self, detour: impl Into<String>) -> Self {
        self.download_detour = Some(detour.into());
        self
    }

    /// Set the update interval.
    pub fn with_update_interval(mut self, interval: impl Into<String>) -> Self {
        self.update_interval = Some(interval.into());
        self
    }
}

/// Rule set file format.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetFormat {
    Binary,
    Source,
}
