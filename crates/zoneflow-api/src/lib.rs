//! Cloudflare v4 API client for Zoneflow
//!
//! Thin typed client over the endpoints Zoneflow converges: zones and
//! their settings, rulesets and their rules, page rules, account-level
//! rules lists, and account lookups. One [`ApiClient`] is shared per
//! run; each resource family adds its endpoint methods in its own
//! module.
//!
//! # Example
//!
//! ```ignore
//! use zoneflow_api::{ApiClient, Credentials};
//!
//! let credentials = Credentials::from_env().expect("CLOUDFLARE_API_TOKEN not set");
//! let client = ApiClient::new(credentials);
//!
//! let zones = client.list_zones(Some("example.com")).await?;
//! ```

pub mod accounts;
pub mod client;
pub mod error;
pub mod lists;
pub mod page_rules;
pub mod rulesets;
pub mod scope;
pub mod settings;
pub mod zones;

pub use accounts::Account;
pub use client::{ApiClient, Credentials, Cursors, ResultInfo};
pub use error::{ApiError, Result};
pub use lists::RulesList;
pub use page_rules::{PageRule, PageRuleAction, PageRuleConstraint, PageRulePayload, PageRuleTarget};
pub use rulesets::{RulePayload, Ruleset, RulesetRule};
pub use scope::ResourceScope;
pub use settings::ZoneSetting;
pub use zones::{Zone, ZoneAccount, ZoneOwner};
