use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted score and per-question selections.
///
/// `answers` maps a 0-based question index to the selected option index.
/// Serialized as `{"score": 1, "answers": {"0": 2}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub answers: BTreeMap<usize, usize>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.score == 0 && self.answers.is_empty()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn selected(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    /// Parse a persisted payload, falling back to empty progress.
    #[must_use]
    pub fn from_json_or_default(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(progress) => progress,
            Err(err) => {
                log::warn!("discarding unreadable progress: {err}");
                Self::default()
            }
        }
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
