//! Cloudflare API client core
//!
//! Request plumbing shared by all endpoint groups: authentication,
//! the v4 response envelope and its pagination bookkeeping.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};

const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare API credential material
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Scoped API token, sent as `Authorization: Bearer`
    Token(String),
    /// Legacy global key, sent as `X-Auth-Key` + `X-Auth-Email`
    KeyEmail { key: String, email: String },
}

impl Credentials {
    /// Read credentials from the conventional environment variables.
    ///
    /// `CLOUDFLARE_API_TOKEN` wins over the `CLOUDFLARE_API_KEY` +
    /// `CLOUDFLARE_EMAIL` pair.
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var("CLOUDFLARE_API_TOKEN") {
            if !token.is_empty() {
                return Some(Credentials::Token(token));
            }
        }
        match (
            std::env::var("CLOUDFLARE_API_KEY"),
            std::env::var("CLOUDFLARE_EMAIL"),
        ) {
            (Ok(key), Ok(email)) if !key.is_empty() && !email.is_empty() => {
                Some(Credentials::KeyEmail { key, email })
            }
            _ => None,
        }
    }
}

/// Cloudflare v4 API client
///
/// One instance is shared by every operation in a run; endpoint groups
/// (zones, rulesets, lists, ...) hang their methods off this struct in
/// their own modules.
pub struct ApiClient {
    client: reqwest::Client,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a new client with the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    /// Start a request against an API path, authentication applied
    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", CLOUDFLARE_API_BASE, path);
        tracing::debug!("{} {}", method, url);
        let builder = self.client.request(method, &url);
        match &self.credentials {
            Credentials::Token(token) => builder.bearer_auth(token),
            Credentials::KeyEmail { key, email } => builder
                .header("X-Auth-Key", key)
                .header("X-Auth-Email", email),
        }
    }

    /// Send a request and unwrap the v4 envelope.
    ///
    /// Returns the (possibly absent) result together with the pagination
    /// info. `success: false` becomes an [`ApiError::Api`] carrying the
    /// first error message, "Unknown error" when the API sent none.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<(Option<T>, Option<ResultInfo>)> {
        let response = builder.send().await?;
        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.success {
            return Err(envelope.into_error());
        }
        Ok((envelope.result, envelope.result_info))
    }

    /// Send a request that must produce a result object
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T> {
        let (result, _) = self.send(builder).await?;
        result.ok_or(ApiError::MissingResult)
    }

    /// Send a request whose result does not matter.
    ///
    /// Some DELETE endpoints answer with an empty body instead of an
    /// envelope, so the body is only parsed when there is one.
    pub(crate) async fn discard(&self, builder: reqwest::RequestBuilder) -> Result<()> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if body.trim().is_empty() {
            if status.is_success() {
                return Ok(());
            }
            return Err(ApiError::Api {
                code: i32::from(status.as_u16()),
                message: status.to_string(),
            });
        }
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(envelope.into_error());
        }
        Ok(())
    }
}

// ============ Envelope Types ============

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiErrorBody>,
    result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    fn into_error(self) -> ApiError {
        let (code, message) = self
            .errors
            .first()
            .map(|e| (e.code, e.message.clone()))
            .unwrap_or((0, "Unknown error".to_string()));
        ApiError::Api { code, message }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i32,
    message: String,
}

/// Pagination block of a listing response
#[derive(Debug, Clone, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub cursors: Option<Cursors>,
}

/// Cursor pair used by the list-items endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
}

/// Next page number to request, if the listing is not exhausted
pub(crate) fn next_page(info: Option<&ResultInfo>, current: u32) -> Option<u32> {
    let total = info?.total_pages?;
    if current < total { Some(current + 1) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let body = r#"{"success": true, "errors": [], "result": {"id": "abc"}}"#;
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.result.unwrap()["id"], "abc");
        assert!(envelope.result_info.is_none());
    }

    #[test]
    fn test_envelope_error_message() {
        let body = r#"{
            "success": false,
            "errors": [{"code": 10000, "message": "Authentication error"}],
            "result": null
        }"#;
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
        match envelope.into_error() {
            ApiError::Api { code, message } => {
                assert_eq!(code, 10000);
                assert_eq!(message, "Authentication error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_error_without_messages() {
        let body = r#"{"success": false, "result": null}"#;
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
        match envelope.into_error() {
            ApiError::Api { code, message } => {
                assert_eq!(code, 0);
                assert_eq!(message, "Unknown error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_page_info() {
        let body = r#"{
            "success": true,
            "errors": [],
            "result": [],
            "result_info": {"page": 1, "total_pages": 3}
        }"#;
        let envelope: ApiResponse<Vec<serde_json::Value>> = serde_json::from_str(body).unwrap();
        let info = envelope.result_info.unwrap();
        assert_eq!(info.page, Some(1));
        assert_eq!(info.total_pages, Some(3));
    }

    #[test]
    fn test_next_page() {
        let info = ResultInfo {
            page: Some(1),
            total_pages: Some(3),
            cursors: None,
        };
        assert_eq!(next_page(Some(&info), 1), Some(2));
        assert_eq!(next_page(Some(&info), 3), None);
        assert_eq!(next_page(None, 1), None);

        let no_total = ResultInfo {
            page: Some(1),
            total_pages: None,
            cursors: None,
        };
        assert_eq!(next_page(Some(&no_total), 1), None);
    }
}
