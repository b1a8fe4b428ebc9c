pub mod availability;
pub mod collector;
pub mod consensus;
pub mod engine;
pub mod pipeline;
pub mod recommend;
pub mod tally;

pub use crate::domain::model::Snapshot;
pub use crate::domain::ports::{ConfigProvider, Pipeline, RecordStore, Storage};
pub use crate::utils::error::Result;
