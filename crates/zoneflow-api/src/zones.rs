//! Zone endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiClient, next_page};
use crate::error::Result;

/// Cloudflare zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub account: ZoneAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_on: Option<DateTime<Utc>>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    #[serde(default)]
    pub name_servers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name_servers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_registrar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ZoneOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_key: Option<String>,
}

/// Account block embedded in a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Owner block embedded in a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneOwner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateZoneRequest<'a> {
    name: &'a str,
    account: CreateZoneAccount<'a>,
    #[serde(rename = "type")]
    zone_type: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateZoneAccount<'a> {
    id: &'a str,
}

impl ApiClient {
    /// List zones, optionally narrowed by the server-side name filter
    pub async fn list_zones(&self, name: Option<&str>) -> Result<Vec<Zone>> {
        let mut zones = Vec::new();
        let mut page = 1u32;
        loop {
            let mut request = self
                .request(reqwest::Method::GET, "zones")
                .query(&[("page", page.to_string()), ("per_page", "50".to_string())]);
            if let Some(name) = name {
                request = request.query(&[("name", name)]);
            }
            let (result, info) = self.send::<Vec<Zone>>(request).await?;
            zones.extend(result.unwrap_or_default());
            match next_page(info.as_ref(), page) {
                Some(next) => page = next,
                None => break,
            }
        }
        Ok(zones)
    }

    /// Create a zone under the given account
    pub async fn create_zone(&self, name: &str, account_id: &str, zone_type: &str) -> Result<Zone> {
        let request_body = CreateZoneRequest {
            name,
            account: CreateZoneAccount { id: account_id },
            zone_type,
        };
        let request = self
            .request(reqwest::Method::POST, "zones")
            .json(&request_body);
        self.fetch(request).await
    }

    /// Delete a zone
    pub async fn delete_zone(&self, zone_id: &str) -> Result<()> {
        let request = self.request(reqwest::Method::DELETE, &format!("zones/{}", zone_id));
        self.discard(request).await
    }
}
