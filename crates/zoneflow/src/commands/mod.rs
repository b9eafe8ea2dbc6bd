//! Command handlers, one module per resource family

pub mod account;
pub mod item;
pub mod list;
pub mod pagerule;
pub mod rule;
pub mod ruleset;
pub mod setting;
pub mod zone;

use anyhow::Context as _;
use serde_json::Value;
use zoneflow_config::ZoneflowConfig;

/// Parse a JSON argument, treating a leading '@' as a file path
pub fn read_json_arg(raw: &str) -> anyhow::Result<Value> {
    match raw.strip_prefix('@') {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {path}"))
        }
        None => serde_json::from_str(raw).context("Invalid JSON argument"),
    }
}

/// Parse a list items argument: a JSON array, or a single object taken
/// as a one-element array
pub fn read_items_arg(raw: &str) -> anyhow::Result<Vec<Value>> {
    match read_json_arg(raw)? {
        Value::Array(items) => Ok(items),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(anyhow::anyhow!(
            "Expected a JSON array of items, got {}",
            zoneflow_core::setting::json_kind(&other)
        )),
    }
}

/// Parse a setting value: JSON when it parses as such, a bare string
/// otherwise, so `ssl strict` works without shell quoting games
pub fn parse_setting_value(raw: &str) -> anyhow::Result<Value> {
    if raw.starts_with('@') {
        return read_json_arg(raw);
    }
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Pick the account name to work under: the flag wins over the
/// configured default
pub fn account_name(flag: Option<String>, config: &ZoneflowConfig) -> anyhow::Result<String> {
    flag.or_else(|| config.default_account.clone()).ok_or_else(|| {
        anyhow::anyhow!("No account given. Pass --account or set default_account in the config file")
    })
}

/// Print an outcome as pretty JSON
pub fn print_json<T: serde::Serialize>(outcome: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_json_arg_inline() {
        assert_eq!(read_json_arg(r#"{"ip": "10.0.0.1"}"#).unwrap(), json!({"ip": "10.0.0.1"}));
        assert!(read_json_arg("{not json").is_err());
    }

    #[test]
    fn test_read_items_arg_wraps_single_object() {
        let items = read_items_arg(r#"{"ip": "10.0.0.1"}"#).unwrap();
        assert_eq!(items, vec![json!({"ip": "10.0.0.1"})]);

        let items = read_items_arg(r#"[{"ip": "10.0.0.1"}, {"ip": "10.0.0.2"}]"#).unwrap();
        assert_eq!(items.len(), 2);

        assert!(read_items_arg("42").is_err());
    }

    #[test]
    fn test_parse_setting_value_falls_back_to_string() {
        assert_eq!(parse_setting_value("strict").unwrap(), json!("strict"));
        assert_eq!(parse_setting_value("14400").unwrap(), json!(14400));
        assert_eq!(parse_setting_value("true").unwrap(), json!(true));
        assert_eq!(
            parse_setting_value(r#"{"strict_transport_security": {"enabled": true}}"#).unwrap(),
            json!({"strict_transport_security": {"enabled": true}})
        );
    }

    #[test]
    fn test_account_name_prefers_flag() {
        let config = ZoneflowConfig {
            default_account: Some("Configured".to_string()),
            ..ZoneflowConfig::default()
        };
        assert_eq!(
            account_name(Some("Flagged".to_string()), &config).unwrap(),
            "Flagged"
        );
        assert_eq!(account_name(None, &config).unwrap(), "Configured");
        assert!(account_name(None, &ZoneflowConfig::default()).is_err());
    }
}
