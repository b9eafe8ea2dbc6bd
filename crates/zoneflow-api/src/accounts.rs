//! Account endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiClient, next_page};
use crate::error::Result;

/// Cloudflare account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl ApiClient {
    /// List accounts visible to the credentials, optionally narrowed by
    /// the server-side name filter
    pub async fn list_accounts(&self, name: Option<&str>) -> Result<Vec<Account>> {
        let mut accounts = Vec::new();
        let mut page = 1u32;
        loop {
            let mut request = self
                .request(reqwest::Method::GET, "accounts")
                .query(&[("page", page.to_string()), ("per_page", "50".to_string())]);
            if let Some(name) = name {
                request = request.query(&[("name", name)]);
            }
            let (result, info) = self.send::<Vec<Account>>(request).await?;
            accounts.extend(result.unwrap_or_default());
            match next_page(info.as_ref(), page) {
                Some(next) => page = next,
                None => break,
            }
        }
        Ok(accounts)
    }
}
