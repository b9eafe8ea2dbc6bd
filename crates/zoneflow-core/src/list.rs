//! Account rules list convergence
//!
//! A list is converged wholesale: when the requested items differ from
//! the remote contents in any way, the whole item set is replaced in one
//! operation. Item order never matters.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;
use zoneflow_api::{ApiClient, RulesList};

use crate::account::AccountOps;
use crate::error::{ConvergeError, Result};

/// Kind of a rules list, which dictates the shape of its items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ip,
    Asn,
    Hostname,
    Redirect,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Ip => "ip",
            ListKind::Asn => "asn",
            ListKind::Hostname => "hostname",
            ListKind::Redirect => "redirect",
        }
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ip" => Ok(ListKind::Ip),
            "asn" => Ok(ListKind::Asn),
            "hostname" => Ok(ListKind::Hostname),
            "redirect" => Ok(ListKind::Redirect),
            other => Err(format!(
                "unknown list kind '{other}' (expected ip, asn, hostname or redirect)"
            )),
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ListKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Compare list contents by the field that identifies an item of this
/// kind, ignoring order and bookkeeping fields.
///
/// The identifying field doubles as canonical JSON so object-valued
/// entries (hostname, redirect) compare structurally.
pub fn list_contents_equal(kind: ListKind, current: &[Value], desired: &[Value]) -> bool {
    let field = kind.as_str();
    let keys = |items: &[Value]| -> BTreeSet<String> {
        items
            .iter()
            .map(|item| item.get(field).unwrap_or(&Value::Null).to_string())
            .collect()
    };
    keys(current) == keys(desired)
}

/// Outcome of a list ensure/remove, reporting the list's items
#[derive(Debug, Serialize)]
pub struct ListOutcome {
    pub changed: bool,
    pub rules_list: Vec<Value>,
}

/// Rules list operations
pub struct ListOps<'a> {
    client: &'a ApiClient,
}

impl<'a> ListOps<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub(crate) async fn account_id(&self, account_name: &str) -> Result<String> {
        let account = AccountOps::new(self.client)
            .find(account_name)
            .await?
            .ok_or_else(|| ConvergeError::AccountNotFound(account_name.to_string()))?;
        Ok(account.id)
    }

    /// Find a list by exact name
    pub async fn find(&self, account_id: &str, name: &str) -> Result<Option<RulesList>> {
        let lists = self.client.list_rules_lists(account_id).await?;
        Ok(lists.into_iter().find(|l| l.name == name))
    }

    /// Make sure a list exists and holds exactly the requested items.
    ///
    /// Bulk item writes are asynchronous remotely, so after a change the
    /// outcome carries the requested items, not a re-read of the list.
    pub async fn ensure(
        &self,
        account_name: &str,
        name: &str,
        kind: ListKind,
        description: Option<&str>,
        items: Option<&[Value]>,
        dry_run: bool,
    ) -> Result<ListOutcome> {
        let items = items.ok_or(ConvergeError::MissingListItems)?;
        let account_id = self.account_id(account_name).await?;
        let existing = self.find(&account_id, name).await?;

        match existing {
            Some(list) => {
                let current = self.client.list_list_items(&account_id, &list.id).await?;
                if list_contents_equal(kind, &current, items) {
                    tracing::debug!("List {} already holds the requested items", name);
                    return Ok(ListOutcome {
                        changed: false,
                        rules_list: current,
                    });
                }
                if dry_run {
                    return Ok(ListOutcome {
                        changed: false,
                        rules_list: current,
                    });
                }

                tracing::info!("Replacing items of list {} ({} items)", name, items.len());
                self.client
                    .replace_list_items(&account_id, &list.id, items)
                    .await?;
                Ok(ListOutcome {
                    changed: true,
                    rules_list: items.to_vec(),
                })
            }
            None => {
                if dry_run {
                    return Ok(ListOutcome {
                        changed: false,
                        rules_list: Vec::new(),
                    });
                }

                tracing::info!("Creating {} list {} ({} items)", kind, name, items.len());
                let created = self
                    .client
                    .create_rules_list(&account_id, name, kind.as_str(), description)
                    .await?;
                if !items.is_empty() {
                    self.client
                        .create_list_items(&account_id, &created.id, items)
                        .await?;
                }
                Ok(ListOutcome {
                    changed: true,
                    rules_list: items.to_vec(),
                })
            }
        }
    }

    /// Remove a list if it exists, reporting the items it held
    pub async fn remove(
        &self,
        account_name: &str,
        name: &str,
        dry_run: bool,
    ) -> Result<ListOutcome> {
        let account_id = self.account_id(account_name).await?;
        let Some(list) = self.find(&account_id, name).await? else {
            tracing::debug!("List not found, nothing to delete: {}", name);
            return Ok(ListOutcome {
                changed: false,
                rules_list: Vec::new(),
            });
        };

        let items = self.client.list_list_items(&account_id, &list.id).await?;
        if dry_run {
            return Ok(ListOutcome {
                changed: false,
                rules_list: items,
            });
        }

        tracing::info!("Deleting list {}", name);
        self.client.delete_rules_list(&account_id, &list.id).await?;
        Ok(ListOutcome {
            changed: true,
            rules_list: items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_kind_parses_known_names() {
        assert_eq!("ip".parse::<ListKind>().unwrap(), ListKind::Ip);
        assert_eq!("redirect".parse::<ListKind>().unwrap(), ListKind::Redirect);
        assert!("country".parse::<ListKind>().is_err());
    }

    #[test]
    fn test_ip_contents_ignore_order_and_bookkeeping() {
        let current = vec![
            json!({"id": "a1", "ip": "10.0.0.1", "created_on": "2024-01-01T00:00:00Z"}),
            json!({"id": "a2", "ip": "10.0.0.2", "created_on": "2024-01-01T00:00:00Z"}),
        ];
        let desired = vec![json!({"ip": "10.0.0.2"}), json!({"ip": "10.0.0.1"})];
        assert!(list_contents_equal(ListKind::Ip, &current, &desired));
    }

    #[test]
    fn test_ip_contents_detect_differences() {
        let current = vec![json!({"ip": "10.0.0.1"})];
        let desired = vec![json!({"ip": "10.0.0.1"}), json!({"ip": "10.0.0.2"})];
        assert!(!list_contents_equal(ListKind::Ip, &current, &desired));
        assert!(!list_contents_equal(ListKind::Ip, &current, &[]));
    }

    #[test]
    fn test_asn_contents_compare_numbers() {
        let current = vec![json!({"id": "a1", "asn": 7922}), json!({"id": "a2", "asn": 13335})];
        let desired = vec![json!({"asn": 13335}), json!({"asn": 7922})];
        assert!(list_contents_equal(ListKind::Asn, &current, &desired));
    }

    #[test]
    fn test_redirect_contents_compare_structurally() {
        let current = vec![json!({
            "id": "a1",
            "redirect": {
                "source_url": "example.com/old",
                "target_url": "https://example.com/new",
                "status_code": 301,
            },
        })];
        let same = vec![json!({
            "redirect": {
                "status_code": 301,
                "source_url": "example.com/old",
                "target_url": "https://example.com/new",
            },
        })];
        assert!(list_contents_equal(ListKind::Redirect, &current, &same));

        let different = vec![json!({
            "redirect": {
                "source_url": "example.com/old",
                "target_url": "https://example.com/other",
                "status_code": 301,
            },
        })];
        assert!(!list_contents_equal(ListKind::Redirect, &current, &different));
    }

    #[test]
    fn test_hostname_contents_compare_structurally() {
        let current = vec![json!({"id": "a1", "hostname": {"url_hostname": "shop.example.com"}})];
        let desired = vec![json!({"hostname": {"url_hostname": "shop.example.com"}})];
        assert!(list_contents_equal(ListKind::Hostname, &current, &desired));
    }
}
