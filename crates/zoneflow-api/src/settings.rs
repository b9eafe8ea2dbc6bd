//! Zone setting endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;

/// A single zone setting
///
/// The value is free-form JSON: a string for the simple on/off settings,
/// an object for the structured ones (`security_header`, `aegis`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSetting {
    pub id: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct EditSettingRequest<'a> {
    value: &'a Value,
}

impl ApiClient {
    /// Fetch one setting of a zone
    pub async fn get_zone_setting(&self, zone_id: &str, setting_id: &str) -> Result<ZoneSetting> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("zones/{}/settings/{}", zone_id, setting_id),
        );
        self.fetch(request).await
    }

    /// Change one setting of a zone.
    ///
    /// The API merges partial object values on its side; the caller sends
    /// the requested value as-is and reads the merged result back.
    pub async fn edit_zone_setting(
        &self,
        zone_id: &str,
        setting_id: &str,
        value: &Value,
    ) -> Result<ZoneSetting> {
        let request = self
            .request(
                reqwest::Method::PATCH,
                &format!("zones/{}/settings/{}", zone_id, setting_id),
            )
            .json(&EditSettingRequest { value });
        self.fetch(request).await
    }
}
