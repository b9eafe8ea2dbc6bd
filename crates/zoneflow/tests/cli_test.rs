#![allow(deprecated)] // TODO: migrate Command::cargo_bin to the cargo_bin! macro

use assert_cmd::Command;
use predicates::prelude::*;

fn zflow() -> Command {
    let mut cmd = Command::cargo_bin("zflow").unwrap();
    // Keep the run hermetic: no inherited credentials or config
    cmd.env_remove("CLOUDFLARE_API_TOKEN")
        .env_remove("CLOUDFLARE_API_KEY")
        .env_remove("CLOUDFLARE_EMAIL")
        .env_remove("ZONEFLOW_CONFIG_PATH")
        .env_remove("ZONEFLOW_ACCOUNT");
    cmd
}

/// Top-level help lists the resource families
#[test]
fn test_cli_help() {
    zflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("zone"))
        .stdout(predicate::str::contains("ruleset"))
        .stdout(predicate::str::contains("pagerule"))
        .stdout(predicate::str::contains("list"));
}

/// Version prints without needing config or credentials
#[test]
fn test_cli_version() {
    zflow()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zoneflow"));
}

/// Unknown subcommands are rejected
#[test]
fn test_unknown_command() {
    zflow().arg("frobnicate").assert().failure();
}

/// zone ensure requires the owning account id
#[test]
fn test_zone_ensure_requires_account_id() {
    zflow()
        .args(["zone", "ensure", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--account-id"));
}

/// Scope flags are mutually exclusive
#[test]
fn test_ruleset_scope_flags_conflict() {
    zflow()
        .args([
            "ruleset",
            "remove",
            "my-ruleset",
            "--account-id",
            "0123456789abcdef",
            "--zone",
            "example.com",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

/// One of the scope flags must be present
#[test]
fn test_ruleset_scope_flags_required() {
    zflow()
        .args(["ruleset", "remove", "my-ruleset"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--account-id"));
}

/// Setting ids are validated at parse time
#[test]
fn test_setting_get_rejects_unknown_setting() {
    zflow()
        .args(["setting", "get", "example.com", "not_a_setting"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown zone setting"));
}

/// List kinds are validated at parse time
#[test]
fn test_item_ensure_rejects_unknown_kind() {
    zflow()
        .args([
            "item", "ensure", "blocklist", "--account", "Acme", "--kind", "country", "--item",
            "{}",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown list kind"));
}

/// Without credentials anywhere, commands that would hit the API fail
/// with a pointer at the supported sources
#[test]
fn test_missing_credentials() {
    let temp_dir = tempfile::tempdir().unwrap();
    zflow()
        .current_dir(temp_dir.path())
        // Shadow any global ~/.config/zoneflow/config.yaml
        .env("XDG_CONFIG_HOME", temp_dir.path())
        .args(["account", "info", "Acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CLOUDFLARE_API_TOKEN"));
}

/// Credentials are picked up from zoneflow.yaml in the working directory
#[test]
fn test_config_file_provides_credentials() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("zoneflow.yaml"),
        "api_token: test-token\n",
    )
    .unwrap();

    // Malformed JSON stops the command after the credential stage, so
    // the assertion never needs the network
    zflow()
        .current_dir(temp_dir.path())
        .args([
            "pagerule",
            "ensure",
            "example.com",
            "example.com/*",
            "--actions",
            "[not json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));
}

/// Malformed JSON in --item is reported before anything else happens
#[test]
fn test_item_rejects_malformed_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    zflow()
        .current_dir(temp_dir.path())
        .env("CLOUDFLARE_API_TOKEN", "test-token")
        .args([
            "item", "ensure", "blocklist", "--account", "Acme", "--kind", "ip", "--item",
            "{broken",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));
}
