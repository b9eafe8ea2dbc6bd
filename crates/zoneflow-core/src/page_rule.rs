//! Page rule convergence
//!
//! Page rules are keyed by their target URL pattern. Priorities are the
//! awkward part: Cloudflare reshuffles sibling priorities on every edit,
//! so the requested priority has to be translated against the current
//! state before it is sent.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use zoneflow_api::{ApiClient, PageRule, PageRuleAction, PageRuleConstraint, PageRulePayload, PageRuleTarget};

use crate::error::{ConvergeError, Result};
use crate::zone::ZoneOps;

/// Translate a requested priority into the value to send.
///
/// A single rule always sits at priority 1. A request beyond the end of
/// the table pins the rule to the tail, which means keeping `old` when
/// the rule is already last, or `sibling_count + 1` otherwise. Moving a
/// rule later by one step is a Cloudflare no-op, so those moves are
/// overshot by one; moving earlier is taken literally and is stable
/// under repetition.
pub fn resolve_priority(old_priority: u32, requested_priority: u32, sibling_count: u32) -> u32 {
    if sibling_count == 1 {
        return 1;
    }
    if requested_priority > sibling_count {
        if old_priority == sibling_count {
            return old_priority;
        }
        return sibling_count + 1;
    }
    if requested_priority > old_priority {
        return requested_priority + 1;
    }
    requested_priority
}

/// Append a trailing slash to bare host targets.
///
/// Only targets ending in a lowercase letter are touched; patterns
/// ending in `*`, `/` or anything else already match the way they are
/// written.
pub fn normalize_target_url(target_url: &str) -> String {
    match target_url.chars().last() {
        Some(c) if c.is_ascii_lowercase() => format!("{target_url}/"),
        _ => target_url.to_string(),
    }
}

/// Compare two action lists by content.
///
/// Actions are an unordered id-to-value mapping as far as convergence
/// is concerned; an explicit null value and an absent one compare
/// equal.
pub fn compare_rule_actions(left: &[PageRuleAction], right: &[PageRuleAction]) -> bool {
    let as_map = |actions: &[PageRuleAction]| -> BTreeMap<String, Option<Value>> {
        actions
            .iter()
            .map(|a| (a.id.clone(), a.value.clone()))
            .collect()
    };
    as_map(left) == as_map(right)
}

fn desired_payload(
    target_url: &str,
    actions: Vec<PageRuleAction>,
    priority: u32,
    enabled: bool,
) -> PageRulePayload {
    PageRulePayload {
        targets: vec![PageRuleTarget {
            target: "url".to_string(),
            constraint: PageRuleConstraint {
                operator: "matches".to_string(),
                value: target_url.to_string(),
            },
        }],
        actions,
        priority,
        status: if enabled { "active" } else { "disabled" }.to_string(),
    }
}

/// Outcome of a page rule ensure/remove, reporting both the rule as it
/// was found and the rule as it was left
#[derive(Debug, Serialize)]
pub struct PageRuleOutcome {
    pub changed: bool,
    pub old_rule: Option<PageRule>,
    pub new_rule: Option<Value>,
}

/// Page rule operations
pub struct PageRuleOps<'a> {
    client: &'a ApiClient,
}

impl<'a> PageRuleOps<'a> {
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

    fn find_by_target(rules: &[PageRule], target_url: &str) -> Option<PageRule> {
        rules
            .iter()
            .find(|r| {
                r.targets
                    .first()
                    .is_some_and(|t| t.constraint.value == target_url)
            })
            .cloned()
    }

    /// Drive the page rule for a target URL to the requested shape
    pub async fn ensure(
        &self,
        zone_name: &str,
        target_url: &str,
        actions: Vec<PageRuleAction>,
        priority: u32,
        enabled: bool,
        dry_run: bool,
    ) -> Result<PageRuleOutcome> {
        let zone_id = self.zone_id(zone_name).await?;
        let target_url = normalize_target_url(target_url);
        let rules = self.client.list_page_rules(&zone_id).await?;
        let existing = Self::find_by_target(&rules, &target_url);
        let mut desired = desired_payload(&target_url, actions, priority, enabled);

        if dry_run {
            return Ok(PageRuleOutcome {
                changed: false,
                old_rule: existing,
                new_rule: Some(serde_json::to_value(&desired)?),
            });
        }

        match existing {
            Some(old) => {
                desired.priority =
                    resolve_priority(old.priority, desired.priority, rules.len() as u32);
                let up_to_date = compare_rule_actions(&old.actions, &desired.actions)
                    && old.priority == desired.priority
                    && old.status == desired.status;
                if up_to_date {
                    tracing::debug!("Page rule for {} already matches", target_url);
                    return Ok(PageRuleOutcome {
                        changed: false,
                        new_rule: Some(serde_json::to_value(&desired)?),
                        old_rule: Some(old),
                    });
                }

                tracing::info!("Updating page rule for {} on zone {}", target_url, zone_name);
                let updated = self
                    .client
                    .update_page_rule(&zone_id, &old.id, &desired)
                    .await?;
                Ok(PageRuleOutcome {
                    changed: true,
                    old_rule: Some(old),
                    new_rule: Some(serde_json::to_value(&updated)?),
                })
            }
            None => {
                tracing::info!("Creating page rule for {} on zone {}", target_url, zone_name);
                let created = self.client.create_page_rule(&zone_id, &desired).await?;
                Ok(PageRuleOutcome {
                    changed: true,
                    old_rule: None,
                    new_rule: Some(serde_json::to_value(&created)?),
                })
            }
        }
    }

    /// Remove the page rule for a target URL if it exists
    pub async fn remove(
        &self,
        zone_name: &str,
        target_url: &str,
        dry_run: bool,
    ) -> Result<PageRuleOutcome> {
        let zone_id = self.zone_id(zone_name).await?;
        let target_url = normalize_target_url(target_url);
        let rules = self.client.list_page_rules(&zone_id).await?;
        let Some(old) = Self::find_by_target(&rules, &target_url) else {
            tracing::debug!("No page rule for {}, nothing to delete", target_url);
            return Ok(PageRuleOutcome {
                changed: false,
                old_rule: None,
                new_rule: None,
            });
        };
        if dry_run {
            return Ok(PageRuleOutcome {
                changed: false,
                old_rule: Some(old),
                new_rule: None,
            });
        }

        tracing::info!("Deleting page rule for {} on zone {}", target_url, zone_name);
        self.client.delete_page_rule(&zone_id, &old.id).await?;
        Ok(PageRuleOutcome {
            changed: true,
            old_rule: Some(old),
            new_rule: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_rule_pins_to_one() {
        assert_eq!(resolve_priority(1, 1, 1), 1);
        assert_eq!(resolve_priority(1, 9, 1), 1);
        assert_eq!(resolve_priority(7, 3, 1), 1);
    }

    #[test]
    fn test_request_beyond_end_keeps_last_rule_in_place() {
        assert_eq!(resolve_priority(5, 9, 5), 5);
    }

    #[test]
    fn test_request_beyond_end_overshoots_for_others() {
        assert_eq!(resolve_priority(2, 9, 5), 6);
    }

    #[test]
    fn test_moving_later_overshoots_by_one() {
        assert_eq!(resolve_priority(1, 3, 5), 4);
    }

    #[test]
    fn test_moving_earlier_is_literal() {
        assert_eq!(resolve_priority(4, 2, 5), 2);
    }

    #[test]
    fn test_staying_put_is_literal() {
        assert_eq!(resolve_priority(3, 3, 5), 3);
    }

    #[test]
    fn test_moving_earlier_is_a_fixed_point() {
        for old in 2..=8u32 {
            for requested in 1..old {
                let first = resolve_priority(old, requested, 8);
                assert_eq!(first, requested);
                assert_eq!(resolve_priority(first, requested, 8), first);
            }
        }
    }

    #[test]
    fn test_normalize_appends_slash_to_bare_hosts() {
        assert_eq!(normalize_target_url("example.com"), "example.com/");
        assert_eq!(normalize_target_url("example.com/shop"), "example.com/shop/");
    }

    #[test]
    fn test_normalize_leaves_patterns_alone() {
        assert_eq!(normalize_target_url("example.com/"), "example.com/");
        assert_eq!(normalize_target_url("example.com/*"), "example.com/*");
        assert_eq!(normalize_target_url("example.com/shop?*"), "example.com/shop?*");
        assert_eq!(normalize_target_url(""), "");
    }

    fn actions(value: Value) -> Vec<PageRuleAction> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_actions_compare_by_content() {
        let left = actions(json!([
            {"id": "ssl", "value": "flexible"},
            {"id": "browser_cache_ttl", "value": 14400},
        ]));
        let right = actions(json!([
            {"id": "browser_cache_ttl", "value": 14400},
            {"id": "ssl", "value": "flexible"},
        ]));
        assert!(compare_rule_actions(&left, &right));
    }

    #[test]
    fn test_actions_compare_detects_differences() {
        let left = actions(json!([{"id": "ssl", "value": "flexible"}]));
        let right = actions(json!([{"id": "ssl", "value": "full"}]));
        assert!(!compare_rule_actions(&left, &right));

        let missing = actions(json!([{"id": "ssl"}]));
        assert!(!compare_rule_actions(&left, &missing));
        assert!(compare_rule_actions(&missing, &missing));
    }
}
