use std::sync::Arc;

use quiz_core::{AnswerOutcome, Dataset, NavToken, SessionEvent};
use serde_json::Value;
use storage::{OverrideStore, ProgressStore};

use super::service::QuizSession;
use crate::dataset_source::DatasetFetcher;
use crate::error::{LoadError, OverrideError, QuizError};

/// Which source produced the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetOrigin {
    Override,
    Remote(String),
}

/// A booted session plus the token that must be published before any token
/// change is handled.
#[derive(Debug, Clone)]
pub struct BootedQuiz {
    pub session: QuizSession,
    pub initial_token: NavToken,
    pub origin: DatasetOrigin,
}

/// Orchestrates boot, persisted answering, restart and the override editor.
#[derive(Clone)]
pub struct QuizService {
    progress: ProgressStore,
    overrides: OverrideStore,
    fetcher: Arc<dyn DatasetFetcher>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        progress: ProgressStore,
        overrides: OverrideStore,
        fetcher: Arc<dyn DatasetFetcher>,
    ) -> Self {
        Self {
            progress,
            overrides,
            fetcher,
        }
    }

    #[must_use]
    pub fn dataset_location(&self) -> &str {
        self.fetcher.location()
    }

    /// Acquire the dataset, resume progress and pick the initial state.
    ///
    /// A stored override pre-empts the fetch entirely.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the dataset cannot be acquired, is not a JSON
    /// array, or has no valid question after normalization.
    pub async fn boot(&self) -> Result<BootedQuiz, LoadError> {
        let (records, origin) = self.acquire().await?;
        let dataset = Dataset::from_raw(&records)?;
        let progress = self.progress.load().await;
        log::info!(
            "booting {} questions ({} answered, score {})",
            dataset.len(),
            progress.answered_count(),
            progress.score
        );

        let (session, initial_token) = QuizSession::start(dataset, progress);
        Ok(BootedQuiz {
            session,
            initial_token,
            origin,
        })
    }

    async fn acquire(&self) -> Result<(Vec<Value>, DatasetOrigin), LoadError> {
        if let Some(records) = self.overrides.load().await? {
            log::info!("using local override dataset ({} records)", records.len());
            return Ok((records, DatasetOrigin::Override));
        }

        let location = self.fetcher.location().to_owned();
        log::info!("fetching dataset from {location}");
        match self.fetcher.fetch().await? {
            Value::Array(records) => Ok((records, DatasetOrigin::Remote(location))),
            _ => Err(LoadError::NotAnArray),
        }
    }

    /// Answer the active question and persist before returning.
    ///
    /// Returns the `AnswerRecorded` event, or `None` when the question was
    /// already answered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotOnQuestion` on the summary screen,
    /// `QuizError::UnknownOption` for an index past the options, or the
    /// storage error if the progress write fails.
    pub async fn answer(
        &self,
        session: &mut QuizSession,
        selected: usize,
    ) -> Result<Option<SessionEvent>, QuizError> {
        let outcome = session
            .answer_current(selected)
            .ok_or(QuizError::NotOnQuestion)?;

        match outcome {
            AnswerOutcome::Recorded { .. } => {
                self.progress.save(session.state().progress()).await?;
                Ok(session.event_for(outcome))
            }
            AnswerOutcome::AlreadyAnswered { .. } => Ok(None),
            AnswerOutcome::UnknownOption {
                question_index,
                selected,
            } => Err(QuizError::UnknownOption {
                selected,
                available: session
                    .state()
                    .dataset()
                    .get(question_index)
                    .map_or(0, |q| q.options().len()),
            }),
            AnswerOutcome::UnknownQuestion { .. } => Err(QuizError::NotOnQuestion),
        }
    }

    /// Clear saved progress and return to question 1.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the progress slot cannot be cleared; the
    /// session is left untouched in that case.
    pub async fn restart(
        &self,
        session: &mut QuizSession,
    ) -> Result<(SessionEvent, NavToken), QuizError> {
        self.progress.clear().await?;
        Ok(session.restart())
    }

    /// Clear saved progress without a live session.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the progress slot cannot be cleared.
    pub async fn reset_progress(&self) -> Result<(), QuizError> {
        self.progress.clear().await?;
        Ok(())
    }

    /// Validate and store a pasted dataset. The caller must reboot afterwards.
    ///
    /// Returns the number of raw records stored.
    ///
    /// # Errors
    ///
    /// Returns `OverrideError` if the text is not JSON or not a non-empty
    /// array; the stored override is left untouched in that case.
    pub async fn submit_override(&self, raw: &str) -> Result<usize, OverrideError> {
        let value: Value = serde_json::from_str(raw)?;
        let records = match value {
            Value::Array(records) if !records.is_empty() => records,
            _ => return Err(OverrideError::NotANonEmptyArray),
        };
        self.overrides.save(&records).await?;
        log::info!("stored override dataset ({} records)", records.len());
        Ok(records.len())
    }

    /// Remove the stored override. The caller must reboot afterwards.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the slot cannot be removed.
    pub async fn clear_override(&self) -> Result<(), OverrideError> {
        self.overrides.clear().await?;
        log::info!("cleared override dataset");
        Ok(())
    }
}
