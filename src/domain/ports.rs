use crate::domain::model::{Day, Snapshot};
use crate::report::TallyReport;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Append-only table store. A completed `append` must be visible to the next
/// `fetch_all` on the same table, and `fetch_all` returns rows in insert order.
pub trait RecordStore: Send + Sync {
    fn append<R: Serialize + Sync>(
        &self,
        table: &str,
        record: &R,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn fetch_all<R: DeserializeOwned + Send>(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = Result<Vec<R>>> + Send;
}

/// Byte storage for report output and the file-backed record store.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn availability_table(&self) -> &str;
    fn final_vote_table(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress_output(&self) -> bool;
    fn top_n(&self) -> usize;
    fn candidate_days(&self) -> &[Day];
    fn display_time(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Snapshot>;
    async fn transform(&self, snapshot: Snapshot) -> Result<TallyReport>;
    async fn load(&self, report: TallyReport) -> Result<String>;
}
