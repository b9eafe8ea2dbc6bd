use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error(
        "No Cloudflare credentials found. Set the CLOUDFLARE_API_TOKEN environment \
        variable (or CLOUDFLARE_API_KEY together with CLOUDFLARE_EMAIL), or put an \
        api_token in the config file"
    )]
    MissingCredentials,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
