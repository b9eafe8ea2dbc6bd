//! Ruleset and ruleset-rule endpoints
//!
//! Rulesets are scoped to an account or a zone ([`ResourceScope`]). The
//! listing endpoint omits the rules array; fetching a ruleset by id
//! returns it in full. Rule mutations answer with the updated ruleset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiClient, next_page};
use crate::error::Result;
use crate::scope::ResourceScope;

/// Cloudflare ruleset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ruleset {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RulesetRule>>,
}

/// Rule inside a ruleset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesetRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub rule_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposed_credential_check: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratelimit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Request body for creating or updating a rule
///
/// Only the fields the caller provided are serialized; `position` is a
/// placement directive understood by the create/update endpoints.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RulePayload {
    #[serde(rename = "ref")]
    pub rule_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_parameters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposed_credential_check: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratelimit: Option<Value>,
}

#[derive(Debug, Serialize)]
struct CreateRulesetRequest<'a> {
    name: &'a str,
    kind: &'a str,
    phase: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl ApiClient {
    /// List rulesets of the scope (without their rules)
    pub async fn list_rulesets(&self, scope: &ResourceScope) -> Result<Vec<Ruleset>> {
        let path = format!("{}/rulesets", scope.path_prefix());
        let mut rulesets = Vec::new();
        let mut page = 1u32;
        loop {
            let request = self
                .request(reqwest::Method::GET, &path)
                .query(&[("page", page.to_string()), ("per_page", "50".to_string())]);
            let (result, info) = self.send::<Vec<Ruleset>>(request).await?;
            rulesets.extend(result.unwrap_or_default());
            match next_page(info.as_ref(), page) {
                Some(next) => page = next,
                None => break,
            }
        }
        Ok(rulesets)
    }

    /// Fetch a ruleset by id, rules included
    pub async fn get_ruleset(&self, scope: &ResourceScope, ruleset_id: &str) -> Result<Ruleset> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("{}/rulesets/{}", scope.path_prefix(), ruleset_id),
        );
        self.fetch(request).await
    }

    /// Create an empty ruleset
    pub async fn create_ruleset(
        &self,
        scope: &ResourceScope,
        name: &str,
        kind: &str,
        phase: &str,
        description: Option<&str>,
    ) -> Result<Ruleset> {
        let request_body = CreateRulesetRequest {
            name,
            kind,
            phase,
            description,
        };
        let request = self
            .request(
                reqwest::Method::POST,
                &format!("{}/rulesets", scope.path_prefix()),
            )
            .json(&request_body);
        self.fetch(request).await
    }

    /// Delete a ruleset
    pub async fn delete_ruleset(&self, scope: &ResourceScope, ruleset_id: &str) -> Result<()> {
        let request = self.request(
            reqwest::Method::DELETE,
            &format!("{}/rulesets/{}", scope.path_prefix(), ruleset_id),
        );
        self.discard(request).await
    }

    /// Add a rule to a ruleset; returns the updated ruleset
    pub async fn create_ruleset_rule(
        &self,
        scope: &ResourceScope,
        ruleset_id: &str,
        payload: &RulePayload,
    ) -> Result<Ruleset> {
        let request = self
            .request(
                reqwest::Method::POST,
                &format!("{}/rulesets/{}/rules", scope.path_prefix(), ruleset_id),
            )
            .json(payload);
        self.fetch(request).await
    }

    /// Update a rule in place; returns the updated ruleset
    pub async fn update_ruleset_rule(
        &self,
        scope: &ResourceScope,
        ruleset_id: &str,
        rule_id: &str,
        payload: &RulePayload,
    ) -> Result<Ruleset> {
        let request = self
            .request(
                reqwest::Method::PATCH,
                &format!(
                    "{}/rulesets/{}/rules/{}",
                    scope.path_prefix(),
                    ruleset_id,
                    rule_id
                ),
            )
            .json(payload);
        self.fetch(request).await
    }

    /// Remove a rule from a ruleset; returns the updated ruleset
    pub async fn delete_ruleset_rule(
        &self,
        scope: &ResourceScope,
        ruleset_id: &str,
        rule_id: &str,
    ) -> Result<Ruleset> {
        let request = self.request(
            reqwest::Method::DELETE,
            &format!(
                "{}/rulesets/{}/rules/{}",
                scope.path_prefix(),
                ruleset_id,
                rule_id
            ),
        );
        self.fetch(request).await
    }
}
