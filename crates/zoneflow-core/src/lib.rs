//! Convergence logic for Cloudflare resources.
//!
//! Each module drives one resource family toward a requested state: read
//! what is remote, diff it against the request, and apply the smallest
//! mutation that closes the gap. In dry-run mode the read phase still
//! runs in full but nothing is written.

pub mod account;
pub mod error;
pub mod item;
pub mod list;
pub mod page_rule;
pub mod rule;
pub mod ruleset;
pub mod scope;
pub mod setting;
pub mod zone;

pub use account::{AccountOps, AccountOutcome};
pub use error::{ConvergeError, Result};
pub use item::{ItemOps, ItemOutcome};
pub use list::{ListKind, ListOps, ListOutcome};
pub use page_rule::{PageRuleOps, PageRuleOutcome};
pub use rule::{RuleAction, RuleInfoOutcome, RuleOps, RuleOutcome, RuleSelector, RuleSpec};
pub use ruleset::{RulesetInfoOutcome, RulesetKind, RulesetOps, RulesetOutcome, RulesetPhase};
pub use scope::ScopeSelector;
pub use setting::{SettingId, SettingInfoOutcome, SettingOps, SettingOutcome};
pub use zone::{ZoneInfoOutcome, ZoneOps, ZoneOutcome, ZoneType, ZoneView};
