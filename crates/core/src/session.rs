use crate::model::{Dataset, Progress, Question};
use crate::router::NavState;

//
// ─── OUTCOMES & EVENTS ─────────────────────────────────────────────────────────
//

/// Result of `SessionState::record_answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// First answer for this question; progress changed and must be persisted.
    Recorded {
        question_index: usize,
        selected: usize,
        correct: bool,
    },
    /// The question already had an answer; nothing changed.
    AlreadyAnswered { question_index: usize, selected: usize },
    /// The question index is outside the dataset.
    UnknownQuestion { question_index: usize },
    /// The option index is outside the question's options.
    UnknownOption { question_index: usize, selected: usize },
}

impl AnswerOutcome {
    /// True when progress was mutated.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}

/// Discrete transitions a presenter can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    AnswerRecorded {
        question_index: usize,
        selected: usize,
        correct: bool,
        score: u32,
    },
    Navigated(NavState),
    Restarted,
}

/// Where a returning user should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// 0-based index of the first unanswered question.
    Question(usize),
    Complete,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Owns the dataset, the progress and the active question pointer.
///
/// Purely in-memory. Callers persist `progress()` whenever an operation
/// reports a mutation.
#[derive(Debug, Clone)]
pub struct SessionState {
    dataset: Dataset,
    progress: Progress,
    current_index: usize,
}

impl SessionState {
    #[must_use]
    pub fn new(dataset: Dataset, progress: Progress) -> Self {
        Self {
            dataset,
            progress,
            current_index: 0,
        }
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.dataset.len()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.progress.score
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.progress.answered_count()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub(crate) fn set_current_index(&mut self, index: usize) {
        debug_assert!(index < self.dataset.len());
        self.current_index = index;
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // current_index only ever holds a valid index (see set_current_index)
        &self.dataset.questions()[self.current_index]
    }

    #[must_use]
    pub fn resolve_correct_index(question: &Question) -> Option<usize> {
        question.correct_index()
    }

    #[must_use]
    pub fn is_answered(&self, question_index: usize) -> bool {
        self.progress.answers.contains_key(&question_index)
    }

    #[must_use]
    pub fn selected(&self, question_index: usize) -> Option<usize> {
        self.progress.selected(question_index)
    }

    /// Record the first answer for a question.
    ///
    /// Later calls for the same question are ignored, so repeated clicks or
    /// racing navigation cannot change the answer or the score.
    pub fn record_answer(&mut self, question_index: usize, selected: usize) -> AnswerOutcome {
        let Some(question) = self.dataset.get(question_index) else {
            return AnswerOutcome::UnknownQuestion { question_index };
        };
        if let Some(previous) = self.progress.selected(question_index) {
            return AnswerOutcome::AlreadyAnswered {
                question_index,
                selected: previous,
            };
        }
        if selected >= question.options().len() {
            return AnswerOutcome::UnknownOption {
                question_index,
                selected,
            };
        }

        let correct = question.is_correct(selected);
        self.progress.answers.insert(question_index, selected);
        if correct {
            self.progress.score = self.progress.score.saturating_add(1);
        }

        AnswerOutcome::Recorded {
            question_index,
            selected,
            correct,
        }
    }

    /// Record an answer for the active question.
    pub fn record_current_answer(&mut self, selected: usize) -> AnswerOutcome {
        self.record_answer(self.current_index, selected)
    }

    /// First unanswered question scanning from 0, or `Resume::Complete`.
    #[must_use]
    pub fn compute_resume_index(&self) -> Resume {
        (0..self.dataset.len())
            .find(|index| !self.is_answered(*index))
            .map_or(Resume::Complete, Resume::Question)
    }

    /// Forget every answer and the score. The persisted slot is cleared by
    /// the caller.
    pub fn restart(&mut self) -> SessionEvent {
        self.progress = Progress::default();
        self.current_index = 0;
        SessionEvent::Restarted
    }

    /// Event describing a recorded answer, if any.
    #[must_use]
    pub fn event_for(&self, outcome: AnswerOutcome) -> Option<SessionEvent> {
        match outcome {
            AnswerOutcome::Recorded {
                question_index,
                selected,
                correct,
            } => Some(SessionEvent::AnswerRecorded {
                question_index,
                selected,
                correct,
                score: self.progress.score,
            }),
            _ => None,
        }
    }
}
