//! Zone convergence

use std::str::FromStr;

use serde::Serialize;
use zoneflow_api::{ApiClient, Zone};

use crate::error::{ConvergeError, Result};

/// Zone type, as accepted by the create endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneType {
    #[default]
    Full,
    Partial,
    Secondary,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Full => "full",
            ZoneType::Partial => "partial",
            ZoneType::Secondary => "secondary",
        }
    }
}

impl FromStr for ZoneType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "full" => Ok(ZoneType::Full),
            "partial" => Ok(ZoneType::Partial),
            "secondary" => Ok(ZoneType::Secondary),
            other => Err(format!(
                "unknown zone type '{other}' (expected full, partial or secondary)"
            )),
        }
    }
}

/// Normalized zone view reported to the caller.
///
/// Optional API fields collapse to empty strings and arrays so the
/// reported document always has the same shape.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneView {
    pub id: String,
    pub account: ZoneViewAccount,
    pub activated_on: String,
    pub created_on: String,
    pub modified_on: String,
    pub name: String,
    pub name_servers: Vec<String>,
    pub original_name_servers: Vec<String>,
    pub original_registrar: String,
    pub owner: ZoneViewOwner,
    pub paused: bool,
    pub status: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub plan: ZoneViewPlan,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneViewAccount {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneViewOwner {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub owner_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneViewPlan {
    pub id: String,
    pub name: String,
}

impl From<Zone> for ZoneView {
    fn from(zone: Zone) -> Self {
        let plan = zone.plan.unwrap_or_default();
        let plan_field = |key: &str| {
            plan.get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let owner = zone.owner.unwrap_or(zoneflow_api::ZoneOwner {
            id: None,
            name: None,
            owner_type: None,
        });
        ZoneView {
            id: zone.id,
            account: ZoneViewAccount {
                id: zone.account.id,
                name: zone.account.name.unwrap_or_default(),
            },
            activated_on: zone
                .activated_on
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            created_on: zone.created_on.to_rfc3339(),
            modified_on: zone.modified_on.to_rfc3339(),
            name: zone.name,
            name_servers: zone.name_servers,
            original_name_servers: zone.original_name_servers.unwrap_or_default(),
            original_registrar: zone.original_registrar.unwrap_or_default(),
            owner: ZoneViewOwner {
                id: owner.id.unwrap_or_default(),
                name: owner.name.unwrap_or_default(),
                owner_type: owner.owner_type.unwrap_or_default(),
            },
            paused: zone.paused.unwrap_or_default(),
            status: zone.status.unwrap_or_default(),
            zone_type: zone.zone_type.unwrap_or_default(),
            plan: ZoneViewPlan {
                id: plan_field("id"),
                name: plan_field("name"),
            },
        }
    }
}

/// Outcome of a zone ensure/remove
#[derive(Debug, Serialize)]
pub struct ZoneOutcome {
    pub changed: bool,
    pub zone: Option<ZoneView>,
}

/// Outcome of a zone info lookup
#[derive(Debug, Serialize)]
pub struct ZoneInfoOutcome {
    pub zone: ZoneView,
}

/// Zone convergence operations
pub struct ZoneOps<'a> {
    client: &'a ApiClient,
}

impl<'a> ZoneOps<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Find a zone by exact name
    pub async fn find(&self, name: &str) -> Result<Option<Zone>> {
        let zones = self.client.list_zones(Some(name)).await?;
        Ok(zones.into_iter().find(|z| z.name == name))
    }

    /// Make sure a zone exists.
    ///
    /// An existing zone is reported as-is; type drift is not reconciled.
    pub async fn ensure(
        &self,
        name: &str,
        account_id: &str,
        zone_type: ZoneType,
        dry_run: bool,
    ) -> Result<ZoneOutcome> {
        let existing = self.find(name).await?;
        if dry_run || existing.is_some() {
            if existing.is_some() {
                tracing::debug!("Zone already exists: {}", name);
            }
            return Ok(ZoneOutcome {
                changed: false,
                zone: existing.map(ZoneView::from),
            });
        }

        tracing::info!("Creating zone {} under account {}", name, account_id);
        let created = self
            .client
            .create_zone(name, account_id, zone_type.as_str())
            .await?;
        Ok(ZoneOutcome {
            changed: true,
            zone: Some(ZoneView::from(created)),
        })
    }

    /// Remove a zone if it exists
    pub async fn remove(&self, name: &str, dry_run: bool) -> Result<ZoneOutcome> {
        let existing = self.find(name).await?;
        let Some(zone) = existing else {
            tracing::debug!("Zone not found, nothing to delete: {}", name);
            return Ok(ZoneOutcome {
                changed: false,
                zone: None,
            });
        };
        if dry_run {
            return Ok(ZoneOutcome {
                changed: false,
                zone: Some(ZoneView::from(zone)),
            });
        }

        tracing::info!("Deleting zone {}", name);
        self.client.delete_zone(&zone.id).await?;
        Ok(ZoneOutcome {
            changed: true,
            zone: Some(ZoneView::from(zone)),
        })
    }

    /// Report a zone by name; a missing zone is an error here
    pub async fn info(&self, name: &str) -> Result<ZoneInfoOutcome> {
        let zone = self
            .find(name)
            .await?
            .ok_or_else(|| ConvergeError::ZoneNotFound(name.to_string()))?;
        Ok(ZoneInfoOutcome {
            zone: ZoneView::from(zone),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_type_round_trip() {
        assert_eq!("full".parse::<ZoneType>().unwrap(), ZoneType::Full);
        assert_eq!("partial".parse::<ZoneType>().unwrap(), ZoneType::Partial);
        assert_eq!(
            "secondary".parse::<ZoneType>().unwrap(),
            ZoneType::Secondary
        );
        assert!("cname".parse::<ZoneType>().is_err());
        assert_eq!(ZoneType::default().as_str(), "full");
    }

    #[test]
    fn test_zone_view_normalizes_missing_fields() {
        let zone: Zone = serde_json::from_value(serde_json::json!({
            "id": "023e105f4ecef8ad9ca31a8372d0c353",
            "name": "example.com",
            "account": {"id": "01a7362d577a6c3019a474fd6f485823"},
            "created_on": "2014-01-01T05:20:00.12345Z",
            "modified_on": "2014-01-01T05:20:00.12345Z",
        }))
        .unwrap();

        let view = ZoneView::from(zone);
        assert_eq!(view.id, "023e105f4ecef8ad9ca31a8372d0c353");
        assert_eq!(view.account.name, "");
        assert_eq!(view.activated_on, "");
        assert!(view.name_servers.is_empty());
        assert!(view.original_name_servers.is_empty());
        assert_eq!(view.owner.owner_type, "");
        assert!(!view.paused);
        assert_eq!(view.plan.id, "");
    }

    #[test]
    fn test_zone_view_keeps_populated_fields() {
        let zone: Zone = serde_json::from_value(serde_json::json!({
            "id": "023e105f4ecef8ad9ca31a8372d0c353",
            "name": "example.com",
            "account": {"id": "01a7362d577a6c3019a474fd6f485823", "name": "My Account"},
            "activated_on": "2014-01-02T00:01:00.12345Z",
            "created_on": "2014-01-01T05:20:00.12345Z",
            "modified_on": "2014-01-01T05:20:00.12345Z",
            "name_servers": ["tony.ns.cloudflare.com", "uma.ns.cloudflare.com"],
            "original_name_servers": ["ns1.example.com"],
            "original_registrar": "godaddy.com, llc (id: 146)",
            "owner": {"id": "7c5dae5552338874e5053f2534d2767a", "name": "Owner", "type": "user"},
            "paused": true,
            "status": "active",
            "type": "full",
            "plan": {"id": "0feeeeeeeeeeeeeeeeeeeeeeeeeeeeee", "name": "Free Website"},
        }))
        .unwrap();

        let view = ZoneView::from(zone);
        assert_eq!(view.account.name, "My Account");
        assert_eq!(view.name_servers.len(), 2);
        assert_eq!(view.owner.owner_type, "user");
        assert!(view.paused);
        assert_eq!(view.status, "active");
        assert_eq!(view.zone_type, "full");
        assert_eq!(view.plan.name, "Free Website");
    }
}
