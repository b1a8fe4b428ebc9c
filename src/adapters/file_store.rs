use crate::domain::ports::{RecordStore, Storage};
use crate::utils::error::{Result, StoreOperation, TallyError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Keeps each table as a JSON array in `<table>.json` on top of a [`Storage`].
///
/// Appends rewrite the whole file under a lock, so within one process a
/// completed append is always visible to the following fetch.
#[derive(Debug, Clone)]
pub struct FileRecordStore<S: Storage> {
    storage: S,
    write_lock: Arc<Mutex<()>>,
}

impl<S: Storage> FileRecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn file_name(table: &str) -> String {
        format!("{}.json", table)
    }

    async fn read_rows(&self, table: &str, operation: StoreOperation) -> Result<Vec<serde_json::Value>> {
        let Some(bytes) = self.storage.read_file(&Self::file_name(table)).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            TallyError::store(table, operation, None, format!("table file is not a JSON array: {}", e))
        })
    }
}

impl<S: Storage> RecordStore for FileRecordStore<S> {
    async fn append<R: Serialize + Sync>(&self, table: &str, record: &R) -> Result<()> {
        let value = serde_json::to_value(record)?;
        let _guard = self.write_lock.lock().await;

        let mut rows = self.read_rows(table, StoreOperation::Append).await?;
        rows.push(value);
        let data = serde_json::to_vec_pretty(&rows)?;
        self.storage
            .write_file(&Self::file_name(table), &data)
            .await
            .map_err(|e| TallyError::store(table, StoreOperation::Append, None, e.to_string()))?;

        tracing::debug!(table, rows = rows.len(), "Appended row to file store");
        Ok(())
    }

    async fn fetch_all<R: DeserializeOwned + Send>(&self, table: &str) -> Result<Vec<R>> {
        let rows = self.read_rows(table, StoreOperation::Fetch).await?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    TallyError::store(table, StoreOperation::Fetch, None, format!("malformed row: {}", e))
                })
            })
            .collect()
    }
}
