//! Zone setting convergence
//!
//! Settings are patched with the raw requested value, but change detection
//! runs on a recursive merge of the requested value into the current one,
//! so partial object updates only count as a change when they actually
//! alter something.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;
use zoneflow_api::ApiClient;

use crate::error::{ConvergeError, Result};
use crate::zone::ZoneOps;

/// Identifier of a configurable zone setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingId {
    AdvancedDdos,
    Aegis,
    AlwaysOnline,
    AlwaysUseHttps,
    AutomaticHttpsRewrites,
    AutomaticPlatformOptimization,
    Brotli,
    BrowserCacheTtl,
    BrowserCheck,
    CacheLevel,
    ChallengeTtl,
    Ciphers,
    DevelopmentMode,
    EarlyHints,
    EmailObfuscation,
    Fonts,
    H2Prioritization,
    HotlinkProtection,
    Http2,
    Http3,
    ImageResizing,
    IpGeolocation,
    Ipv6,
    MinTlsVersion,
    Mirage,
    Nel,
    OpportunisticEncryption,
    OpportunisticOnion,
    OrangeToOrange,
    OriginErrorPagePassThru,
    OriginMaxHttpVersion,
    Polish,
    PrefetchPreload,
    ProxyReadTimeout,
    PseudoIpv4,
    ResponseBuffering,
    RocketLoader,
    SecurityHeader,
    SecurityLevel,
    ServerSideExclude,
    SortQueryStringForCache,
    Ssl,
    SslRecommender,
    Tls13,
    TlsClientAuth,
    TrueClientIpHeader,
    Waf,
    Webp,
    Websockets,
    ZeroRtt,
}

impl SettingId {
    pub const ALL: [SettingId; 50] = [
        SettingId::AdvancedDdos,
        SettingId::Aegis,
        SettingId::AlwaysOnline,
        SettingId::AlwaysUseHttps,
        SettingId::AutomaticHttpsRewrites,
        SettingId::AutomaticPlatformOptimization,
        SettingId::Brotli,
        SettingId::BrowserCacheTtl,
        SettingId::BrowserCheck,
        SettingId::CacheLevel,
        SettingId::ChallengeTtl,
        SettingId::Ciphers,
        SettingId::DevelopmentMode,
        SettingId::EarlyHints,
        SettingId::EmailObfuscation,
        SettingId::Fonts,
        SettingId::H2Prioritization,
        SettingId::HotlinkProtection,
        SettingId::Http2,
        SettingId::Http3,
        SettingId::ImageResizing,
        SettingId::IpGeolocation,
        SettingId::Ipv6,
        SettingId::MinTlsVersion,
        SettingId::Mirage,
        SettingId::Nel,
        SettingId::OpportunisticEncryption,
        SettingId::OpportunisticOnion,
        SettingId::OrangeToOrange,
        SettingId::OriginErrorPagePassThru,
        SettingId::OriginMaxHttpVersion,
        SettingId::Polish,
        SettingId::PrefetchPreload,
        SettingId::ProxyReadTimeout,
        SettingId::PseudoIpv4,
        SettingId::ResponseBuffering,
        SettingId::RocketLoader,
        SettingId::SecurityHeader,
        SettingId::SecurityLevel,
        SettingId::ServerSideExclude,
        SettingId::SortQueryStringForCache,
        SettingId::Ssl,
        SettingId::SslRecommender,
        SettingId::Tls13,
        SettingId::TlsClientAuth,
        SettingId::TrueClientIpHeader,
        SettingId::Waf,
        SettingId::Webp,
        SettingId::Websockets,
        SettingId::ZeroRtt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingId::AdvancedDdos => "advanced_ddos",
            SettingId::Aegis => "aegis",
            SettingId::AlwaysOnline => "always_online",
            SettingId::AlwaysUseHttps => "always_use_https",
            SettingId::AutomaticHttpsRewrites => "automatic_https_rewrites",
            SettingId::AutomaticPlatformOptimization => "automatic_platform_optimization",
            SettingId::Brotli => "brotli",
            SettingId::BrowserCacheTtl => "browser_cache_ttl",
            SettingId::BrowserCheck => "browser_check",
            SettingId::CacheLevel => "cache_level",
            SettingId::ChallengeTtl => "challenge_ttl",
            SettingId::Ciphers => "ciphers",
            SettingId::DevelopmentMode => "development_mode",
            SettingId::EarlyHints => "early_hints",
            SettingId::EmailObfuscation => "email_obfuscation",
            SettingId::Fonts => "fonts",
            SettingId::H2Prioritization => "h2_prioritization",
            SettingId::HotlinkProtection => "hotlink_protection",
            SettingId::Http2 => "http2",
            SettingId::Http3 => "http3",
            SettingId::ImageResizing => "image_resizing",
            SettingId::IpGeolocation => "ip_geolocation",
            SettingId::Ipv6 => "ipv6",
            SettingId::MinTlsVersion => "min_tls_version",
            SettingId::Mirage => "mirage",
            SettingId::Nel => "nel",
            SettingId::OpportunisticEncryption => "opportunistic_encryption",
            SettingId::OpportunisticOnion => "opportunistic_onion",
            SettingId::OrangeToOrange => "orange_to_orange",
            SettingId::OriginErrorPagePassThru => "origin_error_page_pass_thru",
            SettingId::OriginMaxHttpVersion => "origin_max_http_version",
            SettingId::Polish => "polish",
            SettingId::PrefetchPreload => "prefetch_preload",
            SettingId::ProxyReadTimeout => "proxy_read_timeout",
            SettingId::PseudoIpv4 => "pseudo_ipv4",
            SettingId::ResponseBuffering => "response_buffering",
            SettingId::RocketLoader => "rocket_loader",
            SettingId::SecurityHeader => "security_header",
            SettingId::SecurityLevel => "security_level",
            SettingId::ServerSideExclude => "server_side_exclude",
            SettingId::SortQueryStringForCache => "sort_query_string_for_cache",
            SettingId::Ssl => "ssl",
            SettingId::SslRecommender => "ssl_recommender",
            SettingId::Tls13 => "tls_1_3",
            SettingId::TlsClientAuth => "tls_client_auth",
            SettingId::TrueClientIpHeader => "true_client_ip_header",
            SettingId::Waf => "waf",
            SettingId::Webp => "webp",
            SettingId::Websockets => "websockets",
            SettingId::ZeroRtt => "0rtt",
        }
    }
}

impl FromStr for SettingId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SettingId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown zone setting '{s}'"))
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SettingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Name of a JSON value kind, for type mismatch reporting
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Merge a requested value into the current one.
///
/// Objects merge key by key, recursively; anything else is replaced
/// outright. Keys absent from the request keep their current value.
pub fn merge_setting_value(current: &Value, requested: &Value) -> Value {
    match (current, requested) {
        (Value::Object(cur), Value::Object(req)) => {
            let mut merged = cur.clone();
            for (key, value) in req {
                let base = cur.get(key).unwrap_or(&Value::Null);
                merged.insert(key.clone(), merge_setting_value(base, value));
            }
            Value::Object(merged)
        }
        _ => requested.clone(),
    }
}

/// Setting name and value reported to the caller
#[derive(Debug, Serialize)]
pub struct SettingView {
    pub name: SettingId,
    pub value: Value,
}

/// Outcome of a setting set
#[derive(Debug, Serialize)]
pub struct SettingOutcome {
    pub changed: bool,
    pub setting: SettingView,
}

/// Outcome of a setting get
#[derive(Debug, Serialize)]
pub struct SettingInfoOutcome {
    pub setting: SettingView,
}

/// Zone setting operations
pub struct SettingOps<'a> {
    client: &'a ApiClient,
}

impl<'a> SettingOps<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    async fn zone_id(&self, zone_name: &str) -> Result<String> {
        let zone = ZoneOps::new(self.client)
            .find(zone_name)
            .await?
            .ok_or_else(|| ConvergeError::ZoneNotFound(zone_name.to_string()))?;
        Ok(zone.id)
    }

    /// Report the current value of a setting
    pub async fn get(&self, zone_name: &str, setting: SettingId) -> Result<SettingInfoOutcome> {
        let zone_id = self.zone_id(zone_name).await?;
        let current = self
            .client
            .get_zone_setting(&zone_id, setting.as_str())
            .await?;
        Ok(SettingInfoOutcome {
            setting: SettingView {
                name: setting,
                value: current.value,
            },
        })
    }

    /// Drive a setting to the requested value.
    ///
    /// The requested value must have the same JSON kind as the current
    /// one. Object values may be partial; omitted keys are left alone.
    pub async fn set(
        &self,
        zone_name: &str,
        setting: SettingId,
        requested: &Value,
        dry_run: bool,
    ) -> Result<SettingOutcome> {
        let zone_id = self.zone_id(zone_name).await?;
        let current = self
            .client
            .get_zone_setting(&zone_id, setting.as_str())
            .await?;

        if dry_run {
            return Ok(SettingOutcome {
                changed: false,
                setting: SettingView {
                    name: setting,
                    value: current.value,
                },
            });
        }

        let expected = json_kind(&current.value);
        let given = json_kind(requested);
        if expected != given {
            return Err(ConvergeError::SettingTypeMismatch {
                setting: setting.to_string(),
                expected,
                given,
            });
        }

        let merged = merge_setting_value(&current.value, requested);
        if merged == current.value {
            tracing::debug!("Setting {} already has the requested value", setting);
            return Ok(SettingOutcome {
                changed: false,
                setting: SettingView {
                    name: setting,
                    value: current.value,
                },
            });
        }

        tracing::info!("Updating setting {} on zone {}", setting, zone_name);
        let updated = self
            .client
            .edit_zone_setting(&zone_id, setting.as_str(), requested)
            .await?;
        if updated.value == current.value {
            return Err(ConvergeError::SettingUnchanged(setting.to_string()));
        }

        Ok(SettingOutcome {
            changed: true,
            setting: SettingView {
                name: setting,
                value: updated.value,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_setting_id_parses_known_names() {
        assert_eq!("ssl".parse::<SettingId>().unwrap(), SettingId::Ssl);
        assert_eq!("tls_1_3".parse::<SettingId>().unwrap(), SettingId::Tls13);
        assert_eq!("0rtt".parse::<SettingId>().unwrap(), SettingId::ZeroRtt);
        assert!("not_a_setting".parse::<SettingId>().is_err());
    }

    #[test]
    fn test_setting_id_strings_round_trip() {
        for id in SettingId::ALL {
            assert_eq!(id.as_str().parse::<SettingId>().unwrap(), id);
        }
    }

    #[test]
    fn test_json_kind_names() {
        assert_eq!(json_kind(&json!("off")), "string");
        assert_eq!(json_kind(&json!(14400)), "number");
        assert_eq!(json_kind(&json!(true)), "boolean");
        assert_eq!(json_kind(&json!({"strict_transport_security": {}})), "object");
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&Value::Null), "null");
    }

    #[test]
    fn test_merge_replaces_scalars() {
        assert_eq!(merge_setting_value(&json!("off"), &json!("on")), json!("on"));
        assert_eq!(merge_setting_value(&json!(300), &json!(600)), json!(600));
    }

    #[test]
    fn test_merge_is_recursive_for_objects() {
        let current = json!({
            "strict_transport_security": {
                "enabled": false,
                "max_age": 86400,
                "include_subdomains": false,
            }
        });
        let requested = json!({
            "strict_transport_security": {
                "enabled": true,
            }
        });
        let merged = merge_setting_value(&current, &requested);
        assert_eq!(
            merged,
            json!({
                "strict_transport_security": {
                    "enabled": true,
                    "max_age": 86400,
                    "include_subdomains": false,
                }
            })
        );
    }

    #[test]
    fn test_merge_adds_new_keys() {
        let current = json!({"enabled": true});
        let requested = json!({"cache_by_device_type": false});
        assert_eq!(
            merge_setting_value(&current, &requested),
            json!({"enabled": true, "cache_by_device_type": false})
        );
    }

    #[test]
    fn test_merge_detects_no_change() {
        let current = json!({"enabled": true, "max_age": 0});
        let requested = json!({"enabled": true});
        assert_eq!(merge_setting_value(&current, &requested), current);
    }
}
