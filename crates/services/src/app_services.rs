use std::sync::Arc;

use storage::Storage;

use crate::dataset_source::{DatasetFetcher, DatasetSourceConfig};
use crate::error::AppServicesError;
use crate::sessions::QuizService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz: Arc<QuizService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        source: &DatasetSourceConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, Arc::from(source.fetcher())))
    }

    /// Build services over in-memory storage.
    #[must_use]
    pub fn in_memory(fetcher: Arc<dyn DatasetFetcher>) -> Self {
        Self::from_storage(&Storage::in_memory(), fetcher)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, fetcher: Arc<dyn DatasetFetcher>) -> Self {
        let quiz = Arc::new(QuizService::new(
            storage.progress_store(),
            storage.override_store(),
            fetcher,
        ));
        Self { quiz }
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }
}
