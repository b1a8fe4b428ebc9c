use crate::domain::ports::RecordStore;
use crate::utils::error::{Result, StoreOperation, TallyError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Record store backed by a PostgREST-compatible HTTP API (e.g. Supabase).
///
/// Rows are read back ordered by their `id` column, which is the insert order.
pub struct RestRecordStore {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestRecordStore {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.endpoint, table)
    }

    async fn check_status(response: Response, table: &str, operation: StoreOperation) -> Result<Response> {
        let status = response.status();
        tracing::debug!("Store {} on '{}' returned {}", operation, table, status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TallyError::store(
            table,
            operation,
            Some(status.as_u16()),
            if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            },
        ))
    }

    fn transport_error(table: &str, operation: StoreOperation, error: reqwest::Error) -> TallyError {
        TallyError::store(table, operation, error.status().map(|s| s.as_u16()), error.to_string())
    }
}

impl RecordStore for RestRecordStore {
    async fn append<R: Serialize + Sync>(&self, table: &str, record: &R) -> Result<()> {
        let url = self.table_url(table);
        tracing::debug!("Inserting row into {}", url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|e| Self::transport_error(table, StoreOperation::Append, e))?;

        Self::check_status(response, table, StoreOperation::Append).await?;
        Ok(())
    }

    async fn fetch_all<R: DeserializeOwned + Send>(&self, table: &str) -> Result<Vec<R>> {
        let url = self.table_url(table);
        tracing::debug!("Fetching all rows from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("order", "id.asc")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Self::transport_error(table, StoreOperation::Fetch, e))?;

        let response = Self::check_status(response, table, StoreOperation::Fetch).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(table, StoreOperation::Fetch, e))?;

        serde_json::from_slice(&body).map_err(|e| {
            TallyError::store(table, StoreOperation::Fetch, None, format!("malformed rows: {}", e))
        })
    }
}
