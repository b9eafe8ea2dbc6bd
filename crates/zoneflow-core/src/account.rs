//! Account lookup

use serde::Serialize;
use zoneflow_api::{Account, ApiClient};

use crate::error::Result;

/// Account lookup operations
pub struct AccountOps<'a> {
    client: &'a ApiClient,
}

/// Result of an account lookup; a missing account is an empty outcome,
/// not an error
#[derive(Debug, Serialize)]
pub struct AccountOutcome {
    pub account: Option<Account>,
}

impl<'a> AccountOps<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Find an account by exact name.
    ///
    /// The listing endpoint filters by name fragment on the server side;
    /// the exact match happens here.
    pub async fn find(&self, name: &str) -> Result<Option<Account>> {
        let accounts = self.client.list_accounts(Some(name)).await?;
        Ok(accounts.into_iter().find(|a| a.name == name))
    }

    /// Report an account by name
    pub async fn info(&self, name: &str) -> Result<AccountOutcome> {
        let account = self.find(name).await?;
        if account.is_none() {
            tracing::debug!("Account not found: {}", name);
        }
        Ok(AccountOutcome { account })
    }
}
