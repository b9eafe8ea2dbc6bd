//! Single rules list item convergence
//!
//! Items are matched by the field that identifies them for their list
//! kind: the address for ip lists, the number for asn lists, the whole
//! hostname object for hostname lists and the source URL for redirect
//! lists. The item update endpoint replaces the whole list, so changing
//! one item means deleting and re-creating just that item.

use serde::Serialize;
use serde_json::Value;
use zoneflow_api::ApiClient;

use crate::error::{ConvergeError, Result};
use crate::list::{ListKind, ListOps};

/// True when an existing item is the one the request is about
pub fn item_matches(kind: ListKind, existing: &Value, desired: &Value) -> bool {
    let key = match kind {
        ListKind::Ip => "/ip",
        ListKind::Asn => "/asn",
        ListKind::Hostname => "/hostname",
        ListKind::Redirect => "/redirect/source_url",
    };
    match (existing.pointer(key), desired.pointer(key)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Copy of an item without the server-side bookkeeping fields
pub fn strip_bookkeeping(item: &Value) -> Value {
    let mut copy = item.clone();
    if let Some(map) = copy.as_object_mut() {
        map.remove("id");
        map.remove("created_on");
        map.remove("modified_on");
    }
    copy
}

/// Outcome of an item ensure/remove; `item` is an empty object when
/// there is nothing to report
#[derive(Debug, Serialize)]
pub struct ItemOutcome {
    pub changed: bool,
    pub item: Value,
}

/// Rules list item operations
pub struct ItemOps<'a> {
    client: &'a ApiClient,
}

struct ListContext {
    account_id: String,
    list_id: String,
    items: Vec<Value>,
}

impl<'a> ItemOps<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    async fn load_list(
        &self,
        account_name: &str,
        list_name: &str,
        kind: ListKind,
    ) -> Result<ListContext> {
        let lists = ListOps::new(self.client);
        let account_id = lists.account_id(account_name).await?;
        let list = lists
            .find(&account_id, list_name)
            .await?
            .ok_or_else(|| ConvergeError::ListNotFound(list_name.to_string()))?;
        if list.kind != kind.as_str() {
            return Err(ConvergeError::ListKindMismatch {
                name: list_name.to_string(),
                actual: list.kind,
                requested: kind.to_string(),
            });
        }

        let items = self.client.list_list_items(&account_id, &list.id).await?;
        Ok(ListContext {
            account_id,
            list_id: list.id,
            items,
        })
    }

    fn find_item(ctx: &ListContext, kind: ListKind, desired: &Value) -> Option<Value> {
        ctx.items
            .iter()
            .find(|existing| item_matches(kind, existing, desired))
            .cloned()
    }

    /// Make sure the list holds exactly this item.
    ///
    /// An item that matches by key but differs in any other field is
    /// deleted and re-created with the requested contents. Item writes
    /// are asynchronous remotely, so after a mutation the outcome
    /// carries the requested item.
    pub async fn ensure(
        &self,
        account_name: &str,
        list_name: &str,
        kind: ListKind,
        item: &Value,
        dry_run: bool,
    ) -> Result<ItemOutcome> {
        let ctx = self.load_list(account_name, list_name, kind).await?;
        let existing = Self::find_item(&ctx, kind, item);

        match existing {
            Some(found) => {
                if strip_bookkeeping(&found) == *item {
                    tracing::debug!("Item already matches in list {}", list_name);
                    return Ok(ItemOutcome {
                        changed: false,
                        item: found,
                    });
                }
                if dry_run {
                    return Ok(ItemOutcome {
                        changed: false,
                        item: found,
                    });
                }

                tracing::info!("Replacing item in list {}", list_name);
                let id = found
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or(zoneflow_api::ApiError::MissingResult)?
                    .to_string();
                self.client
                    .delete_list_items(&ctx.account_id, &ctx.list_id, &[id])
                    .await?;
                self.client
                    .create_list_items(&ctx.account_id, &ctx.list_id, std::slice::from_ref(item))
                    .await?;
            }
            None => {
                if dry_run {
                    return Ok(ItemOutcome {
                        changed: false,
                        item: Value::Object(Default::default()),
                    });
                }

                tracing::info!("Adding item to list {}", list_name);
                self.client
                    .create_list_items(&ctx.account_id, &ctx.list_id, std::slice::from_ref(item))
                    .await?;
            }
        }

        Ok(ItemOutcome {
            changed: true,
            item: item.clone(),
        })
    }

    /// Remove the matching item from the list if it is there
    pub async fn remove(
        &self,
        account_name: &str,
        list_name: &str,
        kind: ListKind,
        item: &Value,
        dry_run: bool,
    ) -> Result<ItemOutcome> {
        let ctx = self.load_list(account_name, list_name, kind).await?;
        let Some(found) = Self::find_item(&ctx, kind, item) else {
            tracing::debug!("Item not found in list {}, nothing to delete", list_name);
            return Ok(ItemOutcome {
                changed: false,
                item: Value::Object(Default::default()),
            });
        };
        if dry_run {
            return Ok(ItemOutcome {
                changed: false,
                item: found,
            });
        }

        tracing::info!("Deleting item from list {}", list_name);
        let id = found
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or(zoneflow_api::ApiError::MissingResult)?
            .to_string();
        self.client
            .delete_list_items(&ctx.account_id, &ctx.list_id, &[id])
            .await?;
        Ok(ItemOutcome {
            changed: true,
            item: found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ip_items_match_by_address() {
        let existing = json!({"id": "a1", "ip": "10.0.0.1", "comment": "office"});
        assert!(item_matches(ListKind::Ip, &existing, &json!({"ip": "10.0.0.1"})));
        assert!(!item_matches(ListKind::Ip, &existing, &json!({"ip": "10.0.0.2"})));
        assert!(!item_matches(ListKind::Ip, &existing, &json!({"comment": "office"})));
    }

    #[test]
    fn test_hostname_items_match_by_whole_object() {
        let existing = json!({"id": "a1", "hostname": {"url_hostname": "shop.example.com"}});
        assert!(item_matches(
            ListKind::Hostname,
            &existing,
            &json!({"hostname": {"url_hostname": "shop.example.com"}}),
        ));
        assert!(!item_matches(
            ListKind::Hostname,
            &existing,
            &json!({"hostname": {"url_hostname": "www.example.com"}}),
        ));
    }

    #[test]
    fn test_redirect_items_match_by_source_url() {
        let existing = json!({
            "id": "a1",
            "redirect": {
                "source_url": "example.com/old",
                "target_url": "https://example.com/new",
            },
        });
        let same_source = json!({
            "redirect": {
                "source_url": "example.com/old",
                "target_url": "https://example.com/elsewhere",
            },
        });
        assert!(item_matches(ListKind::Redirect, &existing, &same_source));

        let other_source = json!({"redirect": {"source_url": "example.com/other"}});
        assert!(!item_matches(ListKind::Redirect, &existing, &other_source));
    }

    #[test]
    fn test_strip_bookkeeping_removes_server_fields() {
        let item = json!({
            "id": "a1",
            "ip": "10.0.0.1",
            "comment": "office",
            "created_on": "2024-01-01T00:00:00Z",
            "modified_on": "2024-01-02T00:00:00Z",
        });
        assert_eq!(
            strip_bookkeeping(&item),
            json!({"ip": "10.0.0.1", "comment": "office"})
        );
    }

    #[test]
    fn test_stripped_item_comparison_detects_drift() {
        let found = json!({"id": "a1", "ip": "10.0.0.1", "comment": "office"});
        let same = json!({"ip": "10.0.0.1", "comment": "office"});
        let drifted = json!({"ip": "10.0.0.1", "comment": "datacenter"});
        assert_eq!(strip_bookkeeping(&found), same);
        assert_ne!(strip_bookkeeping(&found), drifted);
    }
}
