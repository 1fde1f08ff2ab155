//! Typed access to the two fixed slots: saved progress and the override
//! dataset. No business rules live here.

use std::sync::Arc;

use quiz_core::Progress;
use serde_json::Value;

use crate::repository::{OVERRIDE_SLOT, PROGRESS_SLOT, SlotRepository, Storage, StorageError};

impl Storage {
    #[must_use]
    pub fn progress_store(&self) -> ProgressStore {
        ProgressStore::new(Arc::clone(&self.slots))
    }

    #[must_use]
    pub fn override_store(&self) -> OverrideStore {
        OverrideStore::new(Arc::clone(&self.slots))
    }
}

/// Loads, saves and clears the persisted `Progress`.
#[derive(Clone)]
pub struct ProgressStore {
    slots: Arc<dyn SlotRepository>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    /// Saved progress, or empty progress when the slot is missing, unreadable
    /// or corrupt. Never fails.
    pub async fn load(&self) -> Progress {
        match self.slots.get_slot(PROGRESS_SLOT).await {
            Ok(Some(raw)) => Progress::from_json_or_default(&raw),
            Ok(None) => Progress::default(),
            Err(err) => {
                log::warn!("progress slot unreadable, starting fresh: {err}");
                Progress::default()
            }
        }
    }

    /// Serialize and write progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn save(&self, progress: &Progress) -> Result<(), StorageError> {
        let raw = progress
            .to_json()
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.slots.put_slot(PROGRESS_SLOT, &raw).await
    }

    /// Remove the progress slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.slots.delete_slot(PROGRESS_SLOT).await
    }
}

/// Raw dataset pasted by the user, stored before normalization.
#[derive(Clone)]
pub struct OverrideStore {
    slots: Arc<dyn SlotRepository>,
}

impl OverrideStore {
    #[must_use]
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    /// The stored override when it is a non-empty JSON array.
    ///
    /// A missing slot, a non-array value or an empty array all mean "no
    /// override".
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the slot holds malformed JSON,
    /// or the backend error if it cannot be read.
    pub async fn load(&self) -> Result<Option<Vec<Value>>, StorageError> {
        let Some(raw) = self.slots.get_slot(OVERRIDE_SLOT).await? else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&raw)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        match value {
            Value::Array(records) if !records.is_empty() => Ok(Some(records)),
            _ => Ok(None),
        }
    }

    /// Store raw records as given.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn save(&self, records: &[Value]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(records)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.slots.put_slot(OVERRIDE_SLOT, &raw).await
    }

    /// Remove the override slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.slots.delete_slot(OVERRIDE_SLOT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;
    use serde_json::json;

    fn stores() -> (InMemoryRepository, ProgressStore, OverrideStore) {
        let repo = InMemoryRepository::new();
        let slots: Arc<dyn SlotRepository> = Arc::new(repo.clone());
        (
            repo,
            ProgressStore::new(Arc::clone(&slots)),
            OverrideStore::new(slots),
        )
    }

    #[tokio::test]
    async fn progress_defaults_when_missing_or_corrupt() {
        let (repo, progress, _) = stores();
        assert_eq!(progress.load().await, Progress::default());

        repo.put_slot(PROGRESS_SLOT, "{{{").await.unwrap();
        assert_eq!(progress.load().await, Progress::default());
    }

    #[tokio::test]
    async fn progress_round_trips_and_clears() {
        let (repo, store, _) = stores();
        let mut progress = Progress::default();
        progress.score = 2;
        progress.answers.insert(0, 1);
        progress.answers.insert(1, 3);

        store.save(&progress).await.unwrap();
        assert_eq!(store.load().await, progress);
        assert_eq!(
            repo.get_slot(PROGRESS_SLOT).await.unwrap().as_deref(),
            Some(r#"{"score":2,"answers":{"0":1,"1":3}}"#)
        );

        store.clear().await.unwrap();
        assert_eq!(repo.get_slot(PROGRESS_SLOT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn override_requires_non_empty_array() {
        let (repo, _, overrides) = stores();
        assert_eq!(overrides.load().await.unwrap(), None);

        repo.put_slot(OVERRIDE_SLOT, "[]").await.unwrap();
        assert_eq!(overrides.load().await.unwrap(), None);

        repo.put_slot(OVERRIDE_SLOT, "null").await.unwrap();
        assert_eq!(overrides.load().await.unwrap(), None);

        repo.put_slot(OVERRIDE_SLOT, "{\"a\":1}").await.unwrap();
        assert_eq!(overrides.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_override_is_an_error() {
        let (repo, _, overrides) = stores();
        repo.put_slot(OVERRIDE_SLOT, "[{").await.unwrap();

        assert!(matches!(
            overrides.load().await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn override_round_trips_and_clears() {
        let (_, progress, overrides) = stores();
        let records = vec![json!({"question": "Q", "options": ["a", "b"]})];

        overrides.save(&records).await.unwrap();
        assert_eq!(overrides.load().await.unwrap(), Some(records));
        assert_eq!(progress.load().await, Progress::default());

        overrides.clear().await.unwrap();
        assert_eq!(overrides.load().await.unwrap(), None);
    }
}
