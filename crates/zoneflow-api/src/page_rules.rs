//! Page rule endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;

/// Cloudflare page rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRule {
    pub id: String,
    pub targets: Vec<PageRuleTarget>,
    pub actions: Vec<PageRuleAction>,
    pub priority: u32,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

/// URL target of a page rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRuleTarget {
    pub target: String,
    pub constraint: PageRuleConstraint,
}

/// Matching constraint of a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRuleConstraint {
    pub operator: String,
    pub value: String,
}

/// One action of a page rule; some actions carry no value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRuleAction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Request body for creating or replacing a page rule
#[derive(Debug, Clone, Serialize)]
pub struct PageRulePayload {
    pub targets: Vec<PageRuleTarget>,
    pub actions: Vec<PageRuleAction>,
    pub priority: u32,
    pub status: String,
}

impl ApiClient {
    /// List all page rules of a zone
    pub async fn list_page_rules(&self, zone_id: &str) -> Result<Vec<PageRule>> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("zones/{}/pagerules", zone_id),
        );
        let (result, _) = self.send::<Vec<PageRule>>(request).await?;
        Ok(result.unwrap_or_default())
    }

    /// Create a page rule
    pub async fn create_page_rule(
        &self,
        zone_id: &str,
        payload: &PageRulePayload,
    ) -> Result<PageRule> {
        let request = self
            .request(
                reqwest::Method::POST,
                &format!("zones/{}/pagerules", zone_id),
            )
            .json(payload);
        self.fetch(request).await
    }

    /// Replace a page rule wholesale
    pub async fn update_page_rule(
        &self,
        zone_id: &str,
        rule_id: &str,
        payload: &PageRulePayload,
    ) -> Result<PageRule> {
        let request = self
            .request(
                reqwest::Method::PUT,
                &format!("zones/{}/pagerules/{}", zone_id, rule_id),
            )
            .json(payload);
        self.fetch(request).await
    }

    /// Delete a page rule
    pub async fn delete_page_rule(&self, zone_id: &str, rule_id: &str) -> Result<()> {
        let request = self.request(
            reqwest::Method::DELETE,
            &format!("zones/{}/pagerules/{}", zone_id, rule_id),
        );
        self.discard(request).await
    }
}
