//! Error types for the Cloudflare API client

use thiserror::Error;

/// Errors raised while talking to the Cloudflare API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent or the response body could not be read
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with `success: false`
    #[error("Cloudflare API error {code}: {message}")]
    Api { code: i32, message: String },

    /// The API reported success but the response carried no result object
    #[error("Cloudflare API returned success without a result")]
    MissingResult,

    /// The response body was not a valid API envelope
    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
