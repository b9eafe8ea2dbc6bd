//! Rules-list endpoints
//!
//! Lists are account-level. Items are free-form JSON objects whose
//! payload field depends on the list kind (`ip`, `asn`, `hostname`,
//! `redirect`); item listings paginate with cursors, and bulk item
//! mutations are asynchronous on the Cloudflare side (the operation id
//! in the response is not polled here, matching the convergence model
//! of one shot per run).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;

/// Rules list metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesList {
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct CreateListRequest<'a> {
    name: &'a str,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteItemsRequest {
    items: Vec<DeleteItemRef>,
}

#[derive(Debug, Serialize)]
struct DeleteItemRef {
    id: String,
}

impl ApiClient {
    /// List the rules lists of an account
    pub async fn list_rules_lists(&self, account_id: &str) -> Result<Vec<RulesList>> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("accounts/{}/rules/lists", account_id),
        );
        let (result, _) = self.send::<Vec<RulesList>>(request).await?;
        Ok(result.unwrap_or_default())
    }

    /// Create a rules list
    pub async fn create_rules_list(
        &self,
        account_id: &str,
        name: &str,
        kind: &str,
        description: Option<&str>,
    ) -> Result<RulesList> {
        let request_body = CreateListRequest {
            name,
            kind,
            description,
        };
        let request = self
            .request(
                reqwest::Method::POST,
                &format!("accounts/{}/rules/lists", account_id),
            )
            .json(&request_body);
        self.fetch(request).await
    }

    /// Delete a rules list
    pub async fn delete_rules_list(&self, account_id: &str, list_id: &str) -> Result<()> {
        let request = self.request(
            reqwest::Method::DELETE,
            &format!("accounts/{}/rules/lists/{}", account_id, list_id),
        );
        self.discard(request).await
    }

    /// Fetch every item of a list, following the cursor chain
    pub async fn list_list_items(&self, account_id: &str, list_id: &str) -> Result<Vec<Value>> {
        let path = format!("accounts/{}/rules/lists/{}/items", account_id, list_id);
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut request = self.request(reqwest::Method::GET, &path);
            if let Some(after) = &cursor {
                request = request.query(&[("cursor", after.as_str())]);
            }
            let (result, info) = self.send::<Vec<Value>>(request).await?;
            items.extend(result.unwrap_or_default());
            cursor = info.and_then(|i| i.cursors).and_then(|c| c.after);
            if cursor.is_none() {
                break;
            }
        }
        Ok(items)
    }

    /// Append items to a list
    pub async fn create_list_items(
        &self,
        account_id: &str,
        list_id: &str,
        items: &[Value],
    ) -> Result<()> {
        let request = self
            .request(
                reqwest::Method::POST,
                &format!("accounts/{}/rules/lists/{}/items", account_id, list_id),
            )
            .json(items);
        self.discard(request).await
    }

    /// Replace the entire item set of a list
    pub async fn replace_list_items(
        &self,
        account_id: &str,
        list_id: &str,
        items: &[Value],
    ) -> Result<()> {
        let request = self
            .request(
                reqwest::Method::PUT,
                &format!("accounts/{}/rules/lists/{}/items", account_id, list_id),
            )
            .json(items);
        self.discard(request).await
    }

    /// Delete items from a list by id
    pub async fn delete_list_items(
        &self,
        account_id: &str,
        list_id: &str,
        item_ids: &[String],
    ) -> Result<()> {
        let request_body = DeleteItemsRequest {
            items: item_ids
                .iter()
                .map(|id| DeleteItemRef { id: id.clone() })
                .collect(),
        };
        let request = self
            .request(
                reqwest::Method::DELETE,
                &format!("accounts/{}/rules/lists/{}/items", account_id, list_id),
            )
            .json(&request_body);
        self.discard(request).await
    }
}
