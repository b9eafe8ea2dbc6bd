//! Individual ruleset rule convergence
//!
//! Rules are addressed by their `ref` within a named ruleset. Only the
//! fields the caller actually provided take part in change detection, so
//! a request that says nothing about, say, logging never fights the
//! remote value of that field.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;
use zoneflow_api::{ApiClient, ResourceScope, RulePayload, Ruleset, RulesetRule};

use crate::error::{ConvergeError, Result};
use crate::ruleset::RulesetPhase;

/// Action a rule takes when its expression matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Challenge,
    CompressResponse,
    Execute,
    JsChallenge,
    Log,
    ManagedChallenge,
    Redirect,
    Rewrite,
    Route,
    Score,
    ServeError,
    SetConfig,
    Skip,
    SetCacheSettings,
    LogCustomField,
    DdosDynamic,
    ForceConnectionClose,
}

impl RuleAction {
    pub const ALL: [RuleAction; 17] = [
        RuleAction::Challenge,
        RuleAction::CompressResponse,
        RuleAction::Execute,
        RuleAction::JsChallenge,
        RuleAction::Log,
        RuleAction::ManagedChallenge,
        RuleAction::Redirect,
        RuleAction::Rewrite,
        RuleAction::Route,
        RuleAction::Score,
        RuleAction::ServeError,
        RuleAction::SetConfig,
        RuleAction::Skip,
        RuleAction::SetCacheSettings,
        RuleAction::LogCustomField,
        RuleAction::DdosDynamic,
        RuleAction::ForceConnectionClose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleAction::Challenge => "challenge",
            RuleAction::CompressResponse => "compress_response",
            RuleAction::Execute => "execute",
            RuleAction::JsChallenge => "js_challenge",
            RuleAction::Log => "log",
            RuleAction::ManagedChallenge => "managed_challenge",
            RuleAction::Redirect => "redirect",
            RuleAction::Rewrite => "rewrite",
            RuleAction::Route => "route",
            RuleAction::Score => "score",
            RuleAction::ServeError => "serve_error",
            RuleAction::SetConfig => "set_config",
            RuleAction::Skip => "skip",
            RuleAction::SetCacheSettings => "set_cache_settings",
            RuleAction::LogCustomField => "log_custom_field",
            RuleAction::DdosDynamic => "ddos_dynamic",
            RuleAction::ForceConnectionClose => "force_connection_close",
        }
    }
}

impl FromStr for RuleAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RuleAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown rule action '{s}'"))
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Requested shape of a single rule.
///
/// `rule_ref` identifies the rule; every other field is optional and
/// only participates in the diff when provided.
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    pub rule_ref: String,
    pub description: Option<String>,
    pub action: Option<RuleAction>,
    pub action_parameters: Option<Value>,
    pub enabled: Option<bool>,
    pub exposed_credential_check: Option<Value>,
    pub expression: Option<String>,
    pub logging: Option<Value>,
    pub position: Option<Value>,
    pub ratelimit: Option<Value>,
}

fn differs<T: PartialEq>(requested: &Option<T>, existing: &Option<T>) -> bool {
    requested.is_some() && requested != existing
}

impl RuleSpec {
    /// True when any provided field disagrees with the existing rule.
    ///
    /// `position` is excluded: the remote rule does not report one, so
    /// it is only ever sent, never diffed.
    pub fn differs_from(&self, existing: &RulesetRule) -> bool {
        let action = self.action.map(|a| a.as_str().to_string());
        differs(&self.description, &existing.description)
            || differs(&action, &existing.action)
            || differs(&self.action_parameters, &existing.action_parameters)
            || differs(&self.enabled, &existing.enabled)
            || differs(
                &self.exposed_credential_check,
                &existing.exposed_credential_check,
            )
            || differs(&self.expression, &existing.expression)
            || differs(&self.logging, &existing.logging)
            || differs(&self.ratelimit, &existing.ratelimit)
    }

    fn to_payload(&self) -> RulePayload {
        RulePayload {
            rule_ref: self.rule_ref.clone(),
            description: self.description.clone(),
            action: self.action.map(|a| a.as_str().to_string()),
            action_parameters: self.action_parameters.clone(),
            enabled: self.enabled,
            exposed_credential_check: self.exposed_credential_check.clone(),
            expression: self.expression.clone(),
            logging: self.logging.clone(),
            position: self.position.clone(),
            ratelimit: self.ratelimit.clone(),
        }
    }
}

/// How to pick a rule out of a ruleset for reporting
#[derive(Debug, Clone)]
pub struct RuleSelector {
    pub rule_ref: Option<String>,
    pub description: Option<String>,
}

impl RuleSelector {
    /// Build a selector, requiring at least one of ref and description
    pub fn from_options(rule_ref: Option<String>, description: Option<String>) -> Result<Self> {
        if rule_ref.is_none() && description.is_none() {
            return Err(ConvergeError::MissingRuleSelector);
        }
        Ok(Self {
            rule_ref,
            description,
        })
    }

    fn matches(&self, rule: &RulesetRule) -> bool {
        let by_ref = self
            .rule_ref
            .as_ref()
            .is_some_and(|r| rule.rule_ref.as_deref() == Some(r.as_str()));
        let by_description = self
            .description
            .as_ref()
            .is_some_and(|d| rule.description.as_deref() == Some(d.as_str()));
        by_ref || by_description
    }
}

/// Outcome of a rule ensure/remove
#[derive(Debug, Serialize)]
pub struct RuleOutcome {
    pub changed: bool,
    pub rule: Option<RulesetRule>,
}

/// Outcome of a rule info lookup; a missing rule reports as empty
#[derive(Debug, Serialize)]
pub struct RuleInfoOutcome {
    pub rule: Option<RulesetRule>,
}

/// Ruleset rule operations
pub struct RuleOps<'a> {
    client: &'a ApiClient,
}

fn take_rule_by_ref(ruleset: Ruleset, rule_ref: &str) -> Option<RulesetRule> {
    ruleset
        .rules
        .unwrap_or_default()
        .into_iter()
        .find(|r| r.rule_ref.as_deref() == Some(rule_ref))
}

impl<'a> RuleOps<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    async fn find_full_ruleset(
        &self,
        scope: &ResourceScope,
        name: &str,
    ) -> Result<Option<Ruleset>> {
        let rulesets = self.client.list_rulesets(scope).await?;
        let Some(summary) = rulesets.into_iter().find(|r| r.name == name) else {
            return Ok(None);
        };
        let full = self.client.get_ruleset(scope, &summary.id).await?;
        Ok(Some(full))
    }

    /// Drive a rule in the named ruleset to the requested shape.
    ///
    /// The ruleset itself must already exist.
    pub async fn ensure(
        &self,
        scope: &ResourceScope,
        ruleset_name: &str,
        spec: &RuleSpec,
        dry_run: bool,
    ) -> Result<RuleOutcome> {
        let ruleset = self
            .find_full_ruleset(scope, ruleset_name)
            .await?
            .ok_or_else(|| ConvergeError::RulesetNotFound(ruleset_name.to_string()))?;
        let ruleset_id = ruleset.id.clone();
        let existing = take_rule_by_ref(ruleset, &spec.rule_ref);

        match existing {
            None => {
                if dry_run {
                    return Ok(RuleOutcome {
                        changed: false,
                        rule: None,
                    });
                }
                tracing::info!("Adding rule {} to ruleset {}", spec.rule_ref, ruleset_name);
                let updated = self
                    .client
                    .create_ruleset_rule(scope, &ruleset_id, &spec.to_payload())
                    .await?;
                Ok(RuleOutcome {
                    changed: true,
                    rule: take_rule_by_ref(updated, &spec.rule_ref),
                })
            }
            Some(rule) if spec.differs_from(&rule) => {
                if dry_run {
                    return Ok(RuleOutcome {
                        changed: false,
                        rule: Some(rule),
                    });
                }
                let rule_id = rule.id.clone().ok_or(zoneflow_api::ApiError::MissingResult)?;
                tracing::info!(
                    "Updating rule {} in ruleset {}",
                    spec.rule_ref,
                    ruleset_name
                );
                let updated = self
                    .client
                    .update_ruleset_rule(scope, &ruleset_id, &rule_id, &spec.to_payload())
                    .await?;
                Ok(RuleOutcome {
                    changed: true,
                    rule: take_rule_by_ref(updated, &spec.rule_ref),
                })
            }
            Some(rule) => {
                tracing::debug!("Rule {} already matches", spec.rule_ref);
                Ok(RuleOutcome {
                    changed: false,
                    rule: Some(rule),
                })
            }
        }
    }

    /// Remove a rule by ref; a missing ruleset or rule is a no-op
    pub async fn remove(
        &self,
        scope: &ResourceScope,
        ruleset_name: &str,
        rule_ref: &str,
        dry_run: bool,
    ) -> Result<RuleOutcome> {
        let Some(ruleset) = self.find_full_ruleset(scope, ruleset_name).await? else {
            tracing::debug!("Ruleset not found, nothing to delete: {}", ruleset_name);
            return Ok(RuleOutcome {
                changed: false,
                rule: None,
            });
        };
        let ruleset_id = ruleset.id.clone();
        let Some(rule) = take_rule_by_ref(ruleset, rule_ref) else {
            tracing::debug!("Rule {} not found in ruleset {}", rule_ref, ruleset_name);
            return Ok(RuleOutcome {
                changed: false,
                rule: None,
            });
        };
        if dry_run {
            return Ok(RuleOutcome {
                changed: false,
                rule: Some(rule),
            });
        }

        let rule_id = rule.id.clone().ok_or(zoneflow_api::ApiError::MissingResult)?;
        tracing::info!("Deleting rule {} from ruleset {}", rule_ref, ruleset_name);
        self.client
            .delete_ruleset_rule(scope, &ruleset_id, &rule_id)
            .await?;
        Ok(RuleOutcome {
            changed: true,
            rule: Some(rule),
        })
    }

    /// Report a rule from a ruleset identified by name and phase
    pub async fn info(
        &self,
        scope: &ResourceScope,
        ruleset_name: &str,
        phase: RulesetPhase,
        selector: &RuleSelector,
    ) -> Result<RuleInfoOutcome> {
        let rulesets = self.client.list_rulesets(scope).await?;
        let summary = rulesets
            .into_iter()
            .find(|r| r.name == ruleset_name && r.phase == phase.as_str())
            .ok_or_else(|| ConvergeError::RulesetNotFoundInPhase {
                name: ruleset_name.to_string(),
                phase: phase.to_string(),
            })?;

        let full = self.client.get_ruleset(scope, &summary.id).await?;
        let rule = full
            .rules
            .unwrap_or_default()
            .into_iter()
            .find(|r| selector.matches(r));
        Ok(RuleInfoOutcome { rule })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn existing_rule() -> RulesetRule {
        serde_json::from_value(json!({
            "id": "3a03d665bac047339bb530ecb439a90d",
            "ref": "block-bad-bots",
            "description": "Block bad bots",
            "action": "block",
            "expression": "cf.client.bot",
            "enabled": true,
        }))
        .unwrap()
    }

    #[test]
    fn test_rule_action_strings_round_trip() {
        for action in RuleAction::ALL {
            assert_eq!(action.as_str().parse::<RuleAction>().unwrap(), action);
        }
        assert!("block_forever".parse::<RuleAction>().is_err());
    }

    #[test]
    fn test_spec_ignores_omitted_fields() {
        let spec = RuleSpec {
            rule_ref: "block-bad-bots".to_string(),
            expression: Some("cf.client.bot".to_string()),
            ..RuleSpec::default()
        };
        assert!(!spec.differs_from(&existing_rule()));
    }

    #[test]
    fn test_spec_detects_changed_fields() {
        let spec = RuleSpec {
            rule_ref: "block-bad-bots".to_string(),
            expression: Some("cf.client.bot and not cf.verified_bot".to_string()),
            ..RuleSpec::default()
        };
        assert!(spec.differs_from(&existing_rule()));

        let spec = RuleSpec {
            rule_ref: "block-bad-bots".to_string(),
            action: Some(RuleAction::ManagedChallenge),
            ..RuleSpec::default()
        };
        assert!(spec.differs_from(&existing_rule()));

        let spec = RuleSpec {
            rule_ref: "block-bad-bots".to_string(),
            enabled: Some(false),
            ..RuleSpec::default()
        };
        assert!(spec.differs_from(&existing_rule()));
    }

    #[test]
    fn test_spec_detects_field_missing_remotely() {
        let spec = RuleSpec {
            rule_ref: "block-bad-bots".to_string(),
            logging: Some(json!({"enabled": true})),
            ..RuleSpec::default()
        };
        assert!(spec.differs_from(&existing_rule()));
    }

    #[test]
    fn test_selector_matches_ref_or_description() {
        let rule = existing_rule();

        let by_ref = RuleSelector::from_options(Some("block-bad-bots".to_string()), None).unwrap();
        assert!(by_ref.matches(&rule));

        let by_description =
            RuleSelector::from_options(None, Some("Block bad bots".to_string())).unwrap();
        assert!(by_description.matches(&rule));

        let miss = RuleSelector::from_options(Some("other".to_string()), None).unwrap();
        assert!(!miss.matches(&rule));

        assert!(RuleSelector::from_options(None, None).is_err());
    }
}
