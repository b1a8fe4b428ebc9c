use crate::domain::ports::RecordStore;
use crate::utils::error::{Result, StoreOperation, TallyError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local store. Rows are kept as JSON values so the same typed
/// boundary checks apply as for the remote store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    tables: Arc<Mutex<HashMap<String, Vec<serde_json::Value>>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.lock().await;
        tables.get(table).map(Vec::len).unwrap_or(0)
    }
}

impl RecordStore for MemoryRecordStore {
    async fn append<R: Serialize + Sync>(&self, table: &str, record: &R) -> Result<()> {
        let value = serde_json::to_value(record)?;
        let mut tables = self.tables.lock().await;
        tables.entry(table.to_string()).or_default().push(value);
        Ok(())
    }

    async fn fetch_all<R: DeserializeOwned + Send>(&self, table: &str) -> Result<Vec<R>> {
        let tables = self.tables.lock().await;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };

        rows.iter()
            .map(|row| {
                serde_json::from_value(row.clone()).map_err(|e| {
                    TallyError::store(table, StoreOperation::Fetch, None, format!("malformed row: {}", e))
                })
            })
            .collect()
    }
}
