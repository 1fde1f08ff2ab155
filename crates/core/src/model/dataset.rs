use serde_json::Value;
use thiserror::Error;

use crate::model::Question;
use crate::normalize::normalize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("dataset array is empty after normalize")]
    Empty,
}

/// Ordered, non-empty set of questions for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    questions: Vec<Question>,
}

impl Dataset {
    /// Wrap already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Empty` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, DatasetError> {
        if questions.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { questions })
    }

    /// Normalize raw records and wrap the survivors.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Empty` if no record survives normalization.
    pub fn from_raw(records: &[Value]) -> Result<Self, DatasetError> {
        let questions = normalize(records);
        log::debug!(
            "normalized {} of {} raw records",
            questions.len(),
            records.len()
        );
        Self::new(questions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
