pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{StoreKind, TomlConfig};

pub use adapters::{FileRecordStore, LocalStorage, MemoryRecordStore, RestRecordStore};
pub use crate::core::{collector::SubmissionCollector, engine::TallyEngine, pipeline::ReportPipeline};
pub use domain::model::{
    AvailabilityForm, AvailabilitySubmission, Day, FinalVoteForm, FinalVoteSubmission,
    PeriodPreference, TimeSlot,
};
pub use report::TallyReport;
pub use utils::error::{Result, TallyError};
