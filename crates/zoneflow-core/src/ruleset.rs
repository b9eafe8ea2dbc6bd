//! Ruleset convergence
//!
//! Rulesets are created and deleted whole. An existing ruleset is never
//! reshaped here; its rules are managed one at a time through
//! [`crate::rule::RuleOps`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use zoneflow_api::{ApiClient, ResourceScope, Ruleset};

use crate::error::Result;

/// Phase a ruleset runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesetPhase {
    DdosL4,
    DdosL7,
    HttpConfigSettings,
    HttpCustomErrors,
    HttpLogCustomFields,
    HttpRatelimit,
    HttpRequestCacheSettings,
    HttpRequestDynamicRedirect,
    HttpRequestFirewallCustom,
    HttpRequestFirewallManaged,
    HttpRequestLateTransform,
    HttpRequestOrigin,
    HttpRequestRedirect,
    HttpRequestSanitize,
    HttpRequestSbfm,
    HttpRequestTransform,
    HttpResponseCompression,
    HttpResponseFirewallManaged,
    HttpResponseHeadersTransform,
    MagicTransit,
    MagicTransitIdsManaged,
    MagicTransitManaged,
    MagicTransitRatelimit,
}

impl RulesetPhase {
    pub const ALL: [RulesetPhase; 23] = [
        RulesetPhase::DdosL4,
        RulesetPhase::DdosL7,
        RulesetPhase::HttpConfigSettings,
        RulesetPhase::HttpCustomErrors,
        RulesetPhase::HttpLogCustomFields,
        RulesetPhase::HttpRatelimit,
        RulesetPhase::HttpRequestCacheSettings,
        RulesetPhase::HttpRequestDynamicRedirect,
        RulesetPhase::HttpRequestFirewallCustom,
        RulesetPhase::HttpRequestFirewallManaged,
        RulesetPhase::HttpRequestLateTransform,
        RulesetPhase::HttpRequestOrigin,
        RulesetPhase::HttpRequestRedirect,
        RulesetPhase::HttpRequestSanitize,
        RulesetPhase::HttpRequestSbfm,
        RulesetPhase::HttpRequestTransform,
        RulesetPhase::HttpResponseCompression,
        RulesetPhase::HttpResponseFirewallManaged,
        RulesetPhase::HttpResponseHeadersTransform,
        RulesetPhase::MagicTransit,
        RulesetPhase::MagicTransitIdsManaged,
        RulesetPhase::MagicTransitManaged,
        RulesetPhase::MagicTransitRatelimit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RulesetPhase::DdosL4 => "ddos_l4",
            RulesetPhase::DdosL7 => "ddos_l7",
            RulesetPhase::HttpConfigSettings => "http_config_settings",
            RulesetPhase::HttpCustomErrors => "http_custom_errors",
            RulesetPhase::HttpLogCustomFields => "http_log_custom_fields",
            RulesetPhase::HttpRatelimit => "http_ratelimit",
            RulesetPhase::HttpRequestCacheSettings => "http_request_cache_settings",
            RulesetPhase::HttpRequestDynamicRedirect => "http_request_dynamic_redirect",
            RulesetPhase::HttpRequestFirewallCustom => "http_request_firewall_custom",
            RulesetPhase::HttpRequestFirewallManaged => "http_request_firewall_managed",
            RulesetPhase::HttpRequestLateTransform => "http_request_late_transform",
            RulesetPhase::HttpRequestOrigin => "http_request_origin",
            RulesetPhase::HttpRequestRedirect => "http_request_redirect",
            RulesetPhase::HttpRequestSanitize => "http_request_sanitize",
            RulesetPhase::HttpRequestSbfm => "http_request_sbfm",
            RulesetPhase::HttpRequestTransform => "http_request_transform",
            RulesetPhase::HttpResponseCompression => "http_response_compression",
            RulesetPhase::HttpResponseFirewallManaged => "http_response_firewall_managed",
            RulesetPhase::HttpResponseHeadersTransform => "http_response_headers_transform",
            RulesetPhase::MagicTransit => "magic_transit",
            RulesetPhase::MagicTransitIdsManaged => "magic_transit_ids_managed",
            RulesetPhase::MagicTransitManaged => "magic_transit_managed",
            RulesetPhase::MagicTransitRatelimit => "magic_transit_ratelimit",
        }
    }
}

impl FromStr for RulesetPhase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RulesetPhase::ALL
            .iter()
            .copied()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| format!("unknown ruleset phase '{s}'"))
    }
}

impl fmt::Display for RulesetPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RulesetPhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Kind of a ruleset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesetKind {
    Managed,
    Custom,
    Root,
    Zone,
}

impl RulesetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesetKind::Managed => "managed",
            RulesetKind::Custom => "custom",
            RulesetKind::Root => "root",
            RulesetKind::Zone => "zone",
        }
    }
}

impl FromStr for RulesetKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "managed" => Ok(RulesetKind::Managed),
            "custom" => Ok(RulesetKind::Custom),
            "root" => Ok(RulesetKind::Root),
            "zone" => Ok(RulesetKind::Zone),
            other => Err(format!("unknown ruleset kind '{other}'")),
        }
    }
}

impl fmt::Display for RulesetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RulesetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of a ruleset ensure/remove
#[derive(Debug, Serialize)]
pub struct RulesetOutcome {
    pub changed: bool,
    pub ruleset: Option<Ruleset>,
}

/// Outcome of a ruleset info lookup; a missing ruleset reports as empty
#[derive(Debug, Serialize)]
pub struct RulesetInfoOutcome {
    pub ruleset: Option<Ruleset>,
}

/// Ruleset convergence operations
pub struct RulesetOps<'a> {
    client: &'a ApiClient,
}

impl<'a> RulesetOps<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Find a ruleset by exact name
    pub async fn find_by_name(&self, scope: &ResourceScope, name: &str) -> Result<Option<Ruleset>> {
        let rulesets = self.client.list_rulesets(scope).await?;
        Ok(rulesets.into_iter().find(|r| r.name == name))
    }

    /// Make sure a ruleset exists.
    ///
    /// An existing ruleset is reported as-is, whatever its kind and
    /// phase; drift on those fields is not reconciled.
    pub async fn ensure(
        &self,
        scope: &ResourceScope,
        name: &str,
        kind: RulesetKind,
        phase: RulesetPhase,
        description: Option<&str>,
        dry_run: bool,
    ) -> Result<RulesetOutcome> {
        let existing = self.find_by_name(scope, name).await?;
        if dry_run || existing.is_some() {
            if existing.is_some() {
                tracing::debug!("Ruleset already exists: {}", name);
            }
            return Ok(RulesetOutcome {
                changed: false,
                ruleset: existing,
            });
        }

        tracing::info!("Creating {} ruleset {} in phase {}", kind, name, phase);
        let created = self
            .client
            .create_ruleset(scope, name, kind.as_str(), phase.as_str(), description)
            .await?;
        Ok(RulesetOutcome {
            changed: true,
            ruleset: Some(created),
        })
    }

    /// Remove a ruleset if it exists
    pub async fn remove(
        &self,
        scope: &ResourceScope,
        name: &str,
        dry_run: bool,
    ) -> Result<RulesetOutcome> {
        let existing = self.find_by_name(scope, name).await?;
        let Some(ruleset) = existing else {
            tracing::debug!("Ruleset not found, nothing to delete: {}", name);
            return Ok(RulesetOutcome {
                changed: false,
                ruleset: None,
            });
        };
        if dry_run {
            return Ok(RulesetOutcome {
                changed: false,
                ruleset: Some(ruleset),
            });
        }

        tracing::info!("Deleting ruleset {}", name);
        self.client.delete_ruleset(scope, &ruleset.id).await?;
        Ok(RulesetOutcome {
            changed: true,
            ruleset: Some(ruleset),
        })
    }

    /// Report a ruleset by name and phase, rules included.
    ///
    /// The listing endpoint strips rules, so a match is fetched again
    /// by id to get the full document.
    pub async fn info(
        &self,
        scope: &ResourceScope,
        name: &str,
        phase: RulesetPhase,
    ) -> Result<RulesetInfoOutcome> {
        let rulesets = self.client.list_rulesets(scope).await?;
        let found = rulesets
            .into_iter()
            .find(|r| r.name == name && r.phase == phase.as_str());
        let Some(summary) = found else {
            tracing::debug!("No ruleset named {} in phase {}", name, phase);
            return Ok(RulesetInfoOutcome { ruleset: None });
        };

        let full = self.client.get_ruleset(scope, &summary.id).await?;
        Ok(RulesetInfoOutcome {
            ruleset: Some(full),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_strings_round_trip() {
        for phase in RulesetPhase::ALL {
            assert_eq!(phase.as_str().parse::<RulesetPhase>().unwrap(), phase);
        }
        assert!("http_request_magic".parse::<RulesetPhase>().is_err());
    }

    #[test]
    fn test_kind_parses_known_names() {
        assert_eq!("root".parse::<RulesetKind>().unwrap(), RulesetKind::Root);
        assert_eq!("zone".parse::<RulesetKind>().unwrap(), RulesetKind::Zone);
        assert!("shared".parse::<RulesetKind>().is_err());
    }
}
