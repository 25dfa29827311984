//! Document assembly.
//!
//! Builds the full sing-box configuration around a batch of converted
//! outbounds: the DNS/inbound/route skeleton, a manual selector over every
//! tag, and an automatic latency-probing group. Enhanced mode appends
//! region and ad/malware blocking rules backed by remote rule sets.

use crate::config::SingBoxConfig;
use crate::config::dns::{Dns, DnsRule, DnsServer, Strategy};
use crate::config::inbound::{HttpProxy, Inbound, MixedInbound, TunInbound, TunPlatform};
use crate::config::outbound::{
    DirectOutbound, Outbound, SelectorOutbound, UrlTestOutbound,
};
use crate::config::route::{
    RemoteRuleSet, Route, RouteRule, RuleAction, RuleSet, RuleSetFormat,
};

pub const PROXY_TAG: &str = "proxy";
pub const AUTO_TAG: &str = "auto";
pub const DIRECT_TAG: &str = "direct";

const PROXY_DNS_TAG: &str = "proxy-dns";
const LOCAL_DNS_TAG: &str = "local-dns";
const DIRECT_DNS_TAG: &str = "direct-dns";
const BLOCK_DNS_TAG: &str = "block";

const PROXY_DNS_ADDRESS: &str = "tls://208.67.222.123";
const TUN_SOURCE_CIDR: &str = "172.19.0.0/30";
const PROBE_URL: &str = "http://www.gstatic.com/generate_204";
const LOCAL_PROXY_PORT: u16 = 2080;

const RULE_SET_BASE_URL: &str =
    "https://raw.githubusercontent.com/Chocolate4U/Iran-sing-box-rules/rule-set";

const REGION_GEOSITE: &str = "geosite-ir";
const REGION_GEOIP: &str = "geoip-ir";
const BLOCKED_GEOSITES: [&str; 4] = [
    "geosite-category-ads-all",
    "geosite-malware",
    "geosite-phishing",
    "geosite-cryptominers",
];
const BLOCKED_GEOIPS: [&str; 2] = ["geoip-malware", "geoip-phishing"];

/// Build the full routing document for a batch of converted outbounds.
///
/// Outbound order is fixed: selector, urltest, direct, then the converted
/// outbounds in their original encounter order.
pub fn build_document(outbounds: Vec<Outbound>, enhanced: bool) -> SingBoxConfig {
    let tags: Vec<String> = outbounds.iter().map(|o| o.tag().to_string()).collect();

    SingBoxConfig::builder()
        .dns(build_dns(enhanced))
        .inbound(Inbound::Tun(tun_inbound()))
        .inbound(Inbound::Mixed(mixed_inbound()))
        .outbound(Outbound::Selector(proxy_selector(&tags)))
        .outbound(Outbound::UrlTest(auto_group(&tags)))
        .outbound(Outbound::Direct(DirectOutbound::new(DIRECT_TAG)))
        .outbounds(outbounds)
        .route(build_route(enhanced))
        .build()
}

fn build_dns(enhanced: bool) -> Dns {
    let mut rules = vec![
        DnsRule::to_server(PROXY_DNS_TAG)
            .match_clash_mode("Global")
            .match_source_ip_cidr(vec![TUN_SOURCE_CIDR.to_string()]),
        DnsRule::to_server(PROXY_DNS_TAG)
            .match_source_ip_cidr(vec![TUN_SOURCE_CIDR.to_string()]),
        DnsRule::to_server(DIRECT_DNS_TAG).match_clash_mode("Direct"),
    ];

    if enhanced {
        rules.push(
            DnsRule::to_server(DIRECT_DNS_TAG).match_rule_set(vec![REGION_GEOSITE.to_string()]),
        );
        rules.push(
            DnsRule::to_server(BLOCK_DNS_TAG)
                .match_rule_set(BLOCKED_GEOSITES.iter().map(ToString::to_string).collect()),
        );
    }

    Dns {
        r#final: Some(LOCAL_DNS_TAG.to_string()),
        rules,
        servers: vec![
            DnsServer::new(PROXY_DNS_TAG, PROXY_DNS_ADDRESS)
                .with_address_resolver(LOCAL_DNS_TAG)
                .with_detour(PROXY_TAG),
            DnsServer::new(LOCAL_DNS_TAG, "local").with_detour(DIRECT_TAG),
            DnsServer::new(BLOCK_DNS_TAG, "rcode://success"),
            DnsServer::new(DIRECT_DNS_TAG, "local").with_detour(DIRECT_TAG),
        ],
        strategy: Some(Strategy::PreferIpv4),
    }
}

fn tun_inbound() -> TunInbound {
    TunInbound {
        address: vec![
            "172.19.0.1/30".to_string(),
            "fdfe:dcba:9876::1/126".to_string(),
        ],
        auto_route: true,
        endpoint_independent_nat: false,
        mtu: Some(9000),
        platform: Some(TunPlatform {
            http_proxy: Some(HttpProxy {
                enabled: true,
                server: "127.0.0.1".to_string(),
                server_port: LOCAL_PROXY_PORT,
            }),
        }),
        sniff: true,
        stack: Some("system".to_string()),
        strict_route: false,
    }
}

fn mixed_inbound() -> MixedInbound {
    let mut mixed = MixedInbound::listen("127.0.0.1", LOCAL_PROXY_PORT);
    mixed.sniff = true;
    mixed
}

/// The manual selector: automatic group first, every converted tag, then
/// direct as the escape hatch.
fn proxy_selector(tags: &[String]) -> SelectorOutbound {
    let mut outbounds = Vec::with_capacity(tags.len() + 2);
    outbounds.push(AUTO_TAG.to_string());
    outbounds.extend(tags.iter().cloned());
    outbounds.push(DIRECT_TAG.to_string());
    SelectorOutbound {
        tag: PROXY_TAG.to_string(),
        outbounds,
    }
}

fn auto_group(tags: &[String]) -> UrlTestOutbound {
    UrlTestOutbound {
        tag: AUTO_TAG.to_string(),
        outbounds: tags.to_vec(),
        url: Some(PROBE_URL.to_string()),
        interval: Some("10m".to_string()),
        tolerance: Some(50),
    }
}

fn build_route(enhanced: bool) -> Route {
    let mut route = Route::new()
        .with_auto_detect_interface()
        .with_final(PROXY_TAG)
        .add_rule(
            RouteRule::new()
                .match_clash_mode("Direct")
                .with_outbound(DIRECT_TAG),
        )
        .add_rule(
            RouteRule::new()
                .match_clash_mode("Global")
                .with_outbound(PROXY_TAG),
        )
        .add_rule(
            RouteRule::new()
                .match_protocol(vec!["dns".to_string()])
                .with_action(RuleAction::HijackDns),
        );

    if enhanced {
        route = route
            .add_rule(
                RouteRule::new()
                    .match_domain_suffix(vec![".ir".to_string()])
                    .with_outbound(DIRECT_TAG),
            )
            .add_rule(
                RouteRule::new()
                    .match_rule_set(vec![REGION_GEOIP.to_string(), REGION_GEOSITE.to_string()])
                    .with_outbound(DIRECT_TAG),
            )
            .add_rule(
                RouteRule::new()
                    .match_rule_set(
                        BLOCKED_GEOSITES
                            .iter()
                            .chain(BLOCKED_GEOIPS.iter())
                            .map(ToString::to_string)
                            .collect(),
                    )
                    .with_outbound(BLOCK_DNS_TAG),
            );

        for tag in std::iter::once(REGION_GEOSITE)
            .chain(BLOCKED_GEOSITES)
            .chain(std::iter::once(REGION_GEOIP))
            .chain(BLOCKED_GEOIPS)
        {
            route = route.add_rule_set(RuleSet::Remote(
                RemoteRuleSet::new(tag, format!("{RULE_SET_BASE_URL}/{tag}.srs"))
                    .with_format(RuleSetFormat::Binary)
                    .with_download_detour(DIRECT_TAG)
                    .with_update_interval("1d"),
            ));
        }
    }

    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::outbound::ShadowsocksOutbound;

    fn sample_outbounds(n: usize) -> Vec<Outbound> {
        (0..n)
            .map(|i| {
                Outbound::Shadowsocks(ShadowsocksOutbound {
                    tag: format!("ss-{}", i + 1),
                    server: format!("server{i}.example.com"),
                    server_port: 8388,
                    method: "aes-128-gcm".to_string(),
                    password: "pwd".to_string(),
                })
            })
            .collect()
    }

    fn selector_of(config: &SingBoxConfig) -> &SelectorOutbound {
        match &config.outbounds[0] {
            Outbound::Selector(s) => s,
            _ => panic!("Expected selector first"),
        }
    }

    #[test]
    fn test_outbound_order() {
        let config = build_document(sample_outbounds(2), false);
        let tags: Vec<&str> = config.outbounds.iter().map(Outbound::tag).collect();
        assert_eq!(tags, vec!["proxy", "auto", "direct", "ss-1", "ss-2"]);
    }

    #[test]
    fn test_selector_groups_all_tags() {
        let config = build_document(sample_outbounds(3), false);
        let selector = selector_of(&config);
        // auto + N tags + direct
        assert_eq!(
            selector.outbounds,
            vec!["auto", "ss-1", "ss-2", "ss-3", "direct"]
        );
    }

    #[test]
    fn test_auto_group_probes_converted_tags() {
        let config = build_document(sample_outbounds(2), false);
        match &config.outbounds[1] {
            Outbound::UrlTest(auto) => {
                assert_eq!(auto.outbounds, vec!["ss-1", "ss-2"]);
                assert_eq!(auto.url.as_deref(), Some(PROBE_URL));
                assert_eq!(auto.interval.as_deref(), Some("10m"));
                assert_eq!(auto.tolerance, Some(50));
            }
            _ => panic!("Expected urltest second"),
        }
    }

    #[test]
    fn test_dns_skeleton() {
        let config = build_document(sample_outbounds(1), false);
        let dns = config.dns.unwrap();
        assert_eq!(dns.r#final.as_deref(), Some("local-dns"));
        assert_eq!(dns.servers.len(), 4);
        assert_eq!(dns.rules.len(), 3);
        assert_eq!(dns.strategy, Some(Strategy::PreferIpv4));

        let proxy_dns = &dns.servers[0];
        assert_eq!(proxy_dns.tag, "proxy-dns");
        assert_eq!(proxy_dns.address, PROXY_DNS_ADDRESS);
        assert_eq!(proxy_dns.detour.as_deref(), Some("proxy"));
    }

    #[test]
    fn test_inbound_listeners() {
        let config = build_document(sample_outbounds(1), false);
        assert_eq!(config.inbounds.len(), 2);
        match &config.inbounds[0] {
            Inbound::Tun(tun) => {
                assert!(tun.auto_route);
                assert_eq!(tun.mtu, Some(9000));
                let proxy = tun.platform.as_ref().unwrap().http_proxy.as_ref().unwrap();
                assert_eq!(proxy.server_port, LOCAL_PROXY_PORT);
            }
            Inbound::Mixed(_) => panic!("Expected tun first"),
        }
        match &config.inbounds[1] {
            Inbound::Mixed(mixed) => {
                assert_eq!(mixed.listen_port, Some(LOCAL_PROXY_PORT));
            }
            Inbound::Tun(_) => panic!("Expected mixed second"),
        }
    }

    #[test]
    fn test_route_skeleton() {
        let config = build_document(sample_outbounds(1), false);
        let route = config.route.unwrap();
        assert!(route.auto_detect_interface);
        assert_eq!(route.final_outbound.as_deref(), Some("proxy"));
        assert_eq!(route.rules.len(), 3);
        assert!(route.rule_set.is_empty());
        assert_eq!(route.rules[2].action, Some(RuleAction::HijackDns));
    }

    #[test]
    fn test_enhanced_mode_appends_rules() {
        let default = build_document(sample_outbounds(2), false);
        let enhanced = build_document(sample_outbounds(2), true);

        let default_route = default.route.unwrap();
        let enhanced_route = enhanced.route.unwrap();
        assert!(enhanced_route.rules.len() > default_route.rules.len());
        assert_eq!(enhanced_route.rule_set.len(), 8);

        let default_dns = default.dns.unwrap();
        let enhanced_dns = enhanced.dns.unwrap();
        assert!(enhanced_dns.rules.len() > default_dns.rules.len());

        // Default rules are a prefix of the enhanced rules, and the
        // catch-all final target is the same.
        for (i, rule) in default_route.rules.iter().enumerate() {
            assert_eq!(
                serde_json::to_string(rule).unwrap(),
                serde_json::to_string(&enhanced_route.rules[i]).unwrap()
            );
        }
        assert_eq!(default_route.final_outbound, enhanced_route.final_outbound);
        assert_eq!(default_dns.r#final, enhanced_dns.r#final);
    }

    #[test]
    fn test_enhanced_rule_sets_are_remote_binary() {
        let config = build_document(sample_outbounds(1), true);
        let route = config.route.unwrap();
        for rule_set in &route.rule_set {
            let RuleSet::Remote(remote) = rule_set;
            assert_eq!(remote.format, Some(RuleSetFormat::Binary));
            assert_eq!(remote.download_detour.as_deref(), Some("direct"));
            assert_eq!(remote.update_interval.as_deref(), Some("1d"));
            assert!(remote.url.ends_with(".srs"));
            assert!(remote.url.contains(&remote.tag));
        }
    }

    #[test]
    fn test_empty_batch_still_builds_skeleton() {
        // The converter rejects empty batches before assembly; the
        // assembler itself has no such precondition.
        let config = build_document(Vec::new(), false);
        let selector = selector_of(&config);
        assert_eq!(selector.outbounds, vec!["auto", "direct"]);
    }
}
