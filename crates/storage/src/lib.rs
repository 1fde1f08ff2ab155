#![forbid(unsafe_code)]

pub mod progress_store;
pub mod repository;
pub mod sqlite;

pub use progress_store::{OverrideStore, ProgressStore};
pub use repository::{InMemoryRepository, SlotRepository, Storage, StorageError};
