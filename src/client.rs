use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PanelError;

/// Account state returned by `GET <api-root>/user_preferences`.
///
/// `id` is `None` for anonymous sessions; every other field is only
/// meaningful when a user is logged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub webapp: String,
    #[serde(default)]
    pub remote_user: bool,
    #[serde(default)]
    pub openid: bool,
    #[serde(default)]
    pub disk_usage: String,
    #[serde(default)]
    pub quota: String,
    #[serde(default)]
    pub enable_quotas: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl AccountSummary {
    pub fn is_logged_in(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_galaxy(&self) -> bool {
        self.webapp == "galaxy"
    }
}

/// Quota fields returned by `GET <api-root>/users/{id}`. Fields the server
/// omits are left untouched on the model; `quota_percent` distinguishes an
/// omitted field (outer `None`) from an explicit `null` (inner `None`,
/// meaning quota disabled).
#[derive(Debug, Clone, Deserialize)]
pub struct UserQuotaFields {
    #[serde(default, deserialize_with = "present_field")]
    pub quota_percent: Option<Option<f64>>,
    #[serde(default)]
    pub total_disk_usage: Option<u64>,
    #[serde(default)]
    pub nice_total_disk_usage: Option<String>,
}

fn present_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone)]
pub struct AccountClient {
    http_client: Client,
    api_root: String,
}

impl AccountClient {
    pub fn new(api_root: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build account API client")?;

        Ok(Self {
            http_client,
            api_root: api_root.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub async fn fetch_preferences(&self) -> Result<AccountSummary, PanelError> {
        let url = self.url("user_preferences");
        self.get_json(&url).await
    }

    /// Fetches the payload behind a navigation link. The body is opaque to
    /// the panel; it is handed to the mounted sub-view as initial state.
    pub async fn fetch_page(&self, path: &str) -> Result<serde_json::Value, PanelError> {
        let url = self.url(path);
        self.get_json(&url).await
    }

    pub async fn fetch_user(
        &self,
        id: &str,
        extra: &[(String, String)],
    ) -> Result<UserQuotaFields, PanelError> {
        let url = self.url(&format!("users/{id}"));
        let response = self
            .http_client
            .get(&url)
            .query(extra)
            .send()
            .await
            .map_err(|source| PanelError::Request {
                url: url.clone(),
                source,
            })?;

        Self::decode(response, url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, PanelError> {
        debug!(url, "fetching account data");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| PanelError::Request {
                url: url.to_string(),
                source,
            })?;

        Self::decode(response, url.to_string()).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        url: String,
    ) -> Result<T, PanelError> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|source| PanelError::Decode { url, source })
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            Err(PanelError::Api { status, url, body })
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_on_api_root_is_normalized() {
        let client =
            AccountClient::new("http://localhost:8080/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.api_root(), "http://localhost:8080/api");
        assert_eq!(
            client.url("user_preferences"),
            "http://localhost:8080/api/user_preferences"
        );
        assert_eq!(
            client.url("/user_preferences/42/api_key"),
            "http://localhost:8080/api/user_preferences/42/api_key"
        );
    }

    #[test]
    fn quota_percent_distinguishes_omitted_from_null() {
        let omitted: UserQuotaFields =
            serde_json::from_value(serde_json::json!({ "total_disk_usage": 1 })).unwrap();
        assert_eq!(omitted.quota_percent, None);

        let disabled: UserQuotaFields =
            serde_json::from_value(serde_json::json!({ "quota_percent": null })).unwrap();
        assert_eq!(disabled.quota_percent, Some(None));

        let known: UserQuotaFields =
            serde_json::from_value(serde_json::json!({ "quota_percent": 91.5 })).unwrap();
        assert_eq!(known.quota_percent, Some(Some(91.5)));
    }

    #[test]
    fn summary_flags() {
        let summary: AccountSummary = serde_json::from_value(serde_json::json!({
            "id": "42",
            "email": "jo@example.org",
            "webapp": "galaxy"
        }))
        .unwrap();
        assert!(summary.is_logged_in());
        assert!(summary.is_galaxy());
        assert!(!summary.remote_user);

        let anonymous: AccountSummary =
            serde_json::from_value(serde_json::json!({ "id": null })).unwrap();
        assert!(!anonymous.is_logged_in());
    }
}
