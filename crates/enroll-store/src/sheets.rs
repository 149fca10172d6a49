//! Google Sheets backend
//!
//! Talks to the Sheets v4 `values` endpoints over `reqwest`. Credentials are
//! opaque here: the caller supplies an already-minted OAuth bearer token.

use crate::error::StoreError;
use crate::store::{Row, RowStore};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Public Sheets v4 endpoint
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Worksheet (tab) holding the registrations
pub const DEFAULT_WORKSHEET: &str = "Inscricoes";

/// Connection settings for [`SheetsStore`]
#[derive(Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Spreadsheet document ID
    pub spreadsheet_id: String,
    /// Worksheet title
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// OAuth bearer token
    pub access_token: String,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_worksheet() -> String {
    DEFAULT_WORKSHEET.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl SheetsConfig {
    /// Create config for a spreadsheet with default worksheet and endpoint
    #[must_use]
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: default_worksheet(),
            access_token: access_token.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// With worksheet title
    #[inline]
    #[must_use]
    pub fn with_worksheet(mut self, worksheet: impl Into<String>) -> Self {
        self.worksheet = worksheet.into();
        self
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("worksheet", &self.worksheet)
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Sheets `ValueRange` payload
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl ValueRange {
    fn single_row(values: &[String]) -> Self {
        Self {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: vec![values.iter().cloned().map(Value::String).collect()],
        }
    }

    fn into_rows(self) -> Vec<Row> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect()
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Row store backed by a Google Sheets worksheet
#[derive(Debug, Clone)]
pub struct SheetsStore {
    client: Client,
    config: SheetsConfig,
}

impl SheetsStore {
    /// Create store from config
    ///
    /// # Errors
    /// - `StoreError::Unavailable` if the HTTP client cannot be built
    /// - `StoreError::Rejected` if `base_url` is not a valid URL
    pub fn new(config: SheetsConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self { client, config };
        store.values_url("A1", None)?;
        Ok(store)
    }

    /// Connection settings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    /// A1-notation range scoped to the configured worksheet
    fn sheet_range(&self, cells: &str) -> String {
        let title = self.config.worksheet.replace('\'', "''");
        if cells.is_empty() {
            format!("'{title}'")
        } else {
            format!("'{title}'!{cells}")
        }
    }

    fn values_url(&self, cells: &str, action: Option<&str>) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| StoreError::Rejected {
            status: 0,
            message: format!("invalid base url: {e}"),
        })?;

        let range = self.sheet_range(cells);
        let last = match action {
            Some(action) => format!("{range}:{action}"),
            None => range,
        };

        url.path_segments_mut()
            .map_err(|()| StoreError::Rejected {
                status: 0,
                message: "base url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push(&self.config.spreadsheet_id)
            .push("values")
            .push(&last);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = request
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

fn map_transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Transient(format!("request timed out: {err}"))
    } else {
        StoreError::Unavailable(err.to_string())
    }
}

fn status_error(status: StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    StoreError::from_status(status.as_u16(), message)
}

#[async_trait::async_trait]
impl RowStore for SheetsStore {
    async fn get_all_rows(&self) -> Result<Vec<Row>, StoreError> {
        let url = self.values_url("", None)?;
        let response = self.send(self.client.get(url)).await?;
        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(body.into_rows())
    }

    async fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        let url = self.values_url("A1", Some("append"))?;
        let request = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&ValueRange::single_row(values));
        self.send(request).await?;
        Ok(())
    }

    async fn update_row(&self, index: usize, values: &[String]) -> Result<(), StoreError> {
        if index == 0 {
            return Err(StoreError::Rejected {
                status: 400,
                message: "row index is 1-based".to_string(),
            });
        }

        let url = self.values_url(&format!("A{index}"), None)?;
        let request = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&ValueRange::single_row(values));
        self.send(request).await?;
        Ok(())
    }
}
