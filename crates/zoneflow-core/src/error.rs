//! Error types for the convergence operations

use thiserror::Error;
use zoneflow_api::ApiError;

/// Errors raised while converging a resource
#[derive(Error, Debug)]
pub enum ConvergeError {
    #[error("Zone '{0}' does not exist")]
    ZoneNotFound(String),

    #[error("Account '{0}' does not exist")]
    AccountNotFound(String),

    #[error("List '{0}' does not exist")]
    ListNotFound(String),

    #[error("Wrong kind of list: '{name}' is of kind '{actual}', while '{requested}' was specified")]
    ListKindMismatch {
        name: String,
        actual: String,
        requested: String,
    },

    #[error("Ruleset '{0}' does not exist")]
    RulesetNotFound(String),

    #[error("Ruleset '{name}' does not exist in phase {phase}")]
    RulesetNotFoundInPhase { name: String, phase: String },

    #[error("Items are required to make a list present")]
    MissingListItems,

    #[error("Wrong value type for '{setting}': {expected} expected, {given} given")]
    SettingTypeMismatch {
        setting: String,
        expected: &'static str,
        given: &'static str,
    },

    #[error("BUG: requested to change '{0}', but the actual value did not change")]
    SettingUnchanged(String),

    #[error("Either an account id or a zone name must be given")]
    MissingScope,

    #[error("Either a rule ref or a rule description must be given")]
    MissingRuleSelector,

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, ConvergeError>;
