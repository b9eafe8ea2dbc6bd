//! Scope selection for account- or zone-owned resources

use zoneflow_api::{ApiClient, ResourceScope};

use crate::error::{ConvergeError, Result};
use crate::zone::ZoneOps;

/// Scope as selected on the command line: an account id is used as-is,
/// a zone name still needs resolving against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSelector {
    Account(String),
    ZoneName(String),
}

impl ScopeSelector {
    /// Build a selector from the mutually exclusive option pair
    pub fn from_options(account_id: Option<String>, zone_name: Option<String>) -> Result<Self> {
        match (account_id, zone_name) {
            (Some(id), None) => Ok(ScopeSelector::Account(id)),
            (None, Some(name)) => Ok(ScopeSelector::ZoneName(name)),
            _ => Err(ConvergeError::MissingScope),
        }
    }

    /// Resolve the selector to a concrete scope, looking the zone up by
    /// name when needed
    pub async fn resolve(&self, client: &ApiClient) -> Result<ResourceScope> {
        match self {
            ScopeSelector::Account(id) => Ok(ResourceScope::Account(id.clone())),
            ScopeSelector::ZoneName(name) => {
                let zone = ZoneOps::new(client)
                    .find(name)
                    .await?
                    .ok_or_else(|| ConvergeError::ZoneNotFound(name.clone()))?;
                Ok(ResourceScope::Zone(zone.id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options() {
        let scope = ScopeSelector::from_options(Some("abc".to_string()), None).unwrap();
        assert_eq!(scope, ScopeSelector::Account("abc".to_string()));

        let scope = ScopeSelector::from_options(None, Some("example.com".to_string())).unwrap();
        assert_eq!(scope, ScopeSelector::ZoneName("example.com".to_string()));

        assert!(ScopeSelector::from_options(None, None).is_err());
        assert!(
            ScopeSelector::from_options(Some("abc".to_string()), Some("example.com".to_string()))
                .is_err()
        );
    }
}
