pub mod error;

pub use error::*;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zoneflow_api::Credentials;

/// On-disk configuration for the zflow CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneflowConfig {
    /// API token, used on its own when present
    pub api_token: Option<String>,
    /// Legacy API key, only used together with `email`
    pub api_key: Option<String>,
    pub email: Option<String>,
    /// Account name assumed when a command does not name one
    pub default_account: Option<String>,
}

impl ZoneflowConfig {
    /// Resolve API credentials.
    ///
    /// The environment wins over the config file: CLOUDFLARE_API_TOKEN
    /// first, then the CLOUDFLARE_API_KEY and CLOUDFLARE_EMAIL pair,
    /// then the same fields from the file.
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(credentials) = Credentials::from_env() {
            return Ok(credentials);
        }

        if let Some(token) = self.api_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Credentials::Token(token.to_string()));
        }
        if let (Some(key), Some(email)) = (self.api_key.as_deref(), self.email.as_deref()) {
            if !key.is_empty() && !email.is_empty() {
                return Ok(Credentials::KeyEmail {
                    key: key.to_string(),
                    email: email.to_string(),
                });
            }
        }

        Err(ConfigError::MissingCredentials)
    }
}

/// Find the config file to use, if any.
///
/// Candidates, in order:
/// 1. The ZONEFLOW_CONFIG_PATH environment variable (direct path)
/// 2. Current directory: zoneflow.yaml, zoneflow.yml
/// 3. ./.zoneflow/config.yaml
/// 4. ~/.config/zoneflow/config.yaml (global config)
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(config_path) = std::env::var("ZONEFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Some(path);
        }
    }

    let current_dir = std::env::current_dir().ok()?;
    for filename in ["zoneflow.yaml", "zoneflow.yml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Some(path);
        }
    }

    let local_config = current_dir.join(".zoneflow").join("config.yaml");
    if local_config.exists() {
        return Some(local_config);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("zoneflow").join("config.yaml");
        if global_config.exists() {
            return Some(global_config);
        }
    }

    None
}

/// Load configuration, falling back to defaults when no file exists.
///
/// A missing file is not an error; credentials may still come from the
/// environment.
pub fn load() -> Result<ZoneflowConfig> {
    match find_config_file() {
        Some(path) => load_from(&path),
        None => Ok(ZoneflowConfig::default()),
    }
}

/// Load configuration from a specific file
pub fn load_from(path: &Path) -> Result<ZoneflowConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const NO_CREDS: [(&str, Option<&str>); 3] = [
        ("CLOUDFLARE_API_TOKEN", None),
        ("CLOUDFLARE_API_KEY", None),
        ("CLOUDFLARE_EMAIL", None),
    ];

    #[test]
    fn test_load_from_reads_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("zoneflow.yaml");
        fs::write(
            &path,
            "api_token: abc123\ndefault_account: My Account\n",
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.api_token.as_deref(), Some("abc123"));
        assert_eq!(config.default_account.as_deref(), Some("My Account"));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_load_from_rejects_bad_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("zoneflow.yaml");
        fs::write(&path, "api_token: [unterminated\n").unwrap();

        let result = load_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_from_missing_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_from(&temp_dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("zoneflow.yaml"), "api_token: x\n").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_config_file();
        assert!(result.is_some());
        assert!(result.unwrap().ends_with("zoneflow.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_config_file_yaml_wins_over_yml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("zoneflow.yaml"), "api_token: a\n").unwrap();
        fs::write(temp_dir.path().join("zoneflow.yml"), "api_token: b\n").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_config_file().unwrap();
        assert!(result.ends_with("zoneflow.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_zoneflow_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        let zoneflow_dir = temp_dir.path().join(".zoneflow");
        fs::create_dir(&zoneflow_dir).unwrap();
        fs::write(zoneflow_dir.join("config.yaml"), "api_token: x\n").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_config_file().unwrap();
        assert!(result.ends_with(".zoneflow/config.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_config_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "api_token: x\n").unwrap();

        temp_env::with_var(
            "ZONEFLOW_CONFIG_PATH",
            Some(config_path.to_str().unwrap()),
            || {
                let result = find_config_file().unwrap();
                assert_eq!(result, config_path);
            },
        );
    }

    #[test]
    #[serial]
    fn test_credentials_prefer_environment() {
        let config = ZoneflowConfig {
            api_token: Some("from-file".to_string()),
            ..ZoneflowConfig::default()
        };

        temp_env::with_vars(
            [("CLOUDFLARE_API_TOKEN", Some("from-env"))],
            || match config.credentials().unwrap() {
                Credentials::Token(token) => assert_eq!(token, "from-env"),
                other => panic!("Expected a token, got {other:?}"),
            },
        );
    }

    #[test]
    #[serial]
    fn test_credentials_fall_back_to_file() {
        let config = ZoneflowConfig {
            api_token: Some("from-file".to_string()),
            ..ZoneflowConfig::default()
        };

        temp_env::with_vars(NO_CREDS, || match config.credentials().unwrap() {
            Credentials::Token(token) => assert_eq!(token, "from-file"),
            other => panic!("Expected a token, got {other:?}"),
        });
    }

    #[test]
    #[serial]
    fn test_credentials_key_and_email_pair() {
        let config = ZoneflowConfig {
            api_key: Some("key".to_string()),
            email: Some("ops@example.com".to_string()),
            ..ZoneflowConfig::default()
        };

        temp_env::with_vars(NO_CREDS, || match config.credentials().unwrap() {
            Credentials::KeyEmail { key, email } => {
                assert_eq!(key, "key");
                assert_eq!(email, "ops@example.com");
            }
            other => panic!("Expected a key/email pair, got {other:?}"),
        });
    }

    #[test]
    #[serial]
    fn test_credentials_missing_everywhere() {
        let config = ZoneflowConfig::default();
        temp_env::with_vars(NO_CREDS, || {
            assert!(matches!(
                config.credentials(),
                Err(ConfigError::MissingCredentials)
            ));
        });
    }
}
