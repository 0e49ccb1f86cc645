//! Application layer logic for daylist.
//!
//! This crate owns the task collection, its persistence port, configuration,
//! and the onboarding samples shared by every front end.

pub mod config;
pub mod error;
pub mod samples;
pub mod storage;
pub mod task_store;

// Re-exports for convenience
pub use config::{AppConfig, ClockPolicy, TasksConfig, ViewConfig};
pub use error::{TaskStoreError, TaskStoreResult};
pub use samples::sample_tasks;
pub use storage::{KeyValueStore, MemoryStore};
pub use task_store::{STORAGE_KEY, StoreChange, TaskStore};
