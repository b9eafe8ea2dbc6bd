//! Owner scope for account- or zone-level resources

/// Owner of a scoped resource.
///
/// Rulesets live under either an account or a zone; the scope decides
/// the path prefix of every ruleset endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceScope {
    Account(String),
    Zone(String),
}

impl ResourceScope {
    /// Path prefix for endpoints under this owner
    pub fn path_prefix(&self) -> String {
        match self {
            ResourceScope::Account(id) => format!("accounts/{}", id),
            ResourceScope::Zone(id) => format!("zones/{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_prefix() {
        let account = ResourceScope::Account("0123abcd".to_string());
        assert_eq!(account.path_prefix(), "accounts/0123abcd");

        let zone = ResourceScope::Zone("ffee0011".to_string());
        assert_eq!(zone.path_prefix(), "zones/ffee0011");
    }
}
