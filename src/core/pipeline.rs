use crate::core::collector::{fetch_availability, fetch_final_votes};
use crate::domain::model::Snapshot;
use crate::domain::ports::{ConfigProvider, Pipeline, RecordStore, Storage};
use crate::report::render::{render_files, ReportFile};
use crate::report::TallyReport;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "report.zip";

/// Reads both tables, aggregates them and writes the report files.
pub struct ReportPipeline<R: RecordStore, S: Storage, C: ConfigProvider> {
    store: R,
    storage: S,
    config: C,
}

impl<R: RecordStore, S: Storage, C: ConfigProvider> ReportPipeline<R, S, C> {
    pub fn new(store: R, storage: S, config: C) -> Self {
        Self {
            store,
            storage,
            config,
        }
    }

    fn zip_files(files: &[ReportFile]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for file in files {
            zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
            zip.write_all(&file.contents)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<R: RecordStore, S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<R, S, C> {
    async fn extract(&self) -> Result<Snapshot> {
        let availability = fetch_availability(&self.store, self.config.availability_table()).await?;
        let final_votes = fetch_final_votes(&self.store, self.config.final_vote_table()).await?;

        tracing::debug!(
            "Fetched {} availability rows and {} final votes",
            availability.len(),
            final_votes.len()
        );

        Ok(Snapshot {
            availability,
            final_votes,
        })
    }

    async fn transform(&self, snapshot: Snapshot) -> Result<TallyReport> {
        Ok(TallyReport::build(
            &snapshot,
            self.config.top_n(),
            self.config.candidate_days(),
            self.config.display_time(),
        ))
    }

    async fn load(&self, report: TallyReport) -> Result<String> {
        let files = render_files(&report, self.config.output_formats())?;
        let output_dir = self.config.output_path().trim_end_matches('/');

        if self.config.compress_output() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = Self::zip_files(&files)?;
            self.storage.write_file(ARCHIVE_NAME, &zip_data).await?;
            return Ok(format!("{}/{}", output_dir, ARCHIVE_NAME));
        }

        for file in &files {
            tracing::debug!("Writing {} ({} bytes)", file.name, file.contents.len());
            self.storage.write_file(&file.name, &file.contents).await?;
        }
        Ok(output_dir.to_string())
    }
}
