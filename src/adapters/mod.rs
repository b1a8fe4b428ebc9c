// Concrete implementations of the domain ports.

pub mod file_store;
pub mod local_storage;
pub mod memory_store;
pub mod rest_store;

pub use file_store::FileRecordStore;
pub use local_storage::LocalStorage;
pub use memory_store::MemoryRecordStore;
pub use rest_store::RestRecordStore;
