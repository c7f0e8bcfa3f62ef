use crate::core::error::{Result, SyncError};
use crate::core::sheet::SheetSource;
use crate::providers::util::{USER_AGENT, with_retry};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

const RETRY_DELAY_MS: u64 = 500;

/// Credentials accepted by the Sheets values endpoint.
///
/// The credential file is JSON holding either an OAuth `access_token`
/// (issued for the spreadsheets read scope) or an `api_key` for sheets that
/// are readable by link.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SheetCredentials {
    AccessToken { access_token: String },
    ApiKey { api_key: String },
}

impl SheetCredentials {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read credentials file: {}",
                path.as_ref().display()
            )
        })?;
        serde_json::from_str(&content).with_context(|| {
            format!(
                "Credentials file {} must contain an access_token or api_key",
                path.as_ref().display()
            )
        })
    }
}

/// Reads cell values through the Google Sheets v4 REST API.
pub struct GoogleSheetsSource {
    base_url: String,
    credentials: SheetCredentials,
    timeout: Duration,
    retries: usize,
}

impl GoogleSheetsSource {
    pub fn new(
        base_url: &str,
        credentials: SheetCredentials,
        timeout: Duration,
        retries: usize,
    ) -> Self {
        GoogleSheetsSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            timeout,
            retries,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl GoogleSheetsSource {
    /// Values endpoint for one range. `sheet_id` and `range` are
    /// percent-encoded as single path segments.
    fn values_url(&self, sheet_id: &str, range: &str) -> Result<Url> {
        let invalid_base = |reason: String| {
            SyncError::Sheet(format!("invalid base url {}: {reason}", self.base_url))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid_base(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid_base("cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", sheet_id, "values", range]);
        if let SheetCredentials::ApiKey { api_key } = &self.credentials {
            url.query_pairs_mut().append_pair("key", api_key);
        }
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsSource {
    #[instrument(name = "SheetFetch", skip(self))]
    async fn fetch_values(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(sheet_id, range)?;
        let bearer = match &self.credentials {
            SheetCredentials::AccessToken { access_token } => Some(access_token.as_str()),
            SheetCredentials::ApiKey { .. } => None,
        };
        debug!("Requesting sheet values for range {}", range);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| SyncError::Sheet(format!("failed to build client: {e}")))?;

        let response = with_retry(
            || {
                let mut request = client.get(url.clone());
                if let Some(token) = bearer {
                    request = request.bearer_auth(token);
                }
                request.send()
            },
            self.retries,
            RETRY_DELAY_MS,
        )
        .await
        // The URL may carry the API key; keep it out of the error.
        .map_err(|e| {
            SyncError::Sheet(format!(
                "request for range {range} failed: {}",
                e.without_url()
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Sheet(format!(
                "HTTP {status} for range {range}: {body}"
            )));
        }

        let data = response.json::<ValueRange>().await.map_err(|e| {
            SyncError::Sheet(format!(
                "failed to parse values for range {range}: {}",
                e.without_url()
            ))
        })?;
        debug!(rows = data.values.len(), "Received sheet values");
        Ok(data.values)
    }
}
