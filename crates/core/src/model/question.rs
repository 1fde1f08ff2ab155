use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least 2 options, got {count}")]
    TooFewOptions { count: usize },
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// How a question names its correct option.
///
/// Datasets either point at the option by position or repeat the option's
/// text. Both forms are kept as-is and resolved lazily, so a text answer that
/// matches no option stays representable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Index(i64),
    Text(String),
}

impl Default for AnswerKey {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl From<usize> for AnswerKey {
    fn from(value: usize) -> Self {
        Self::Index(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for AnswerKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AnswerKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    number: u32,
    question: String,
    options: Vec<String>,
    answer: AnswerKey,
}

impl Question {
    /// Build a question, trimming the prompt text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the trimmed text is empty and
    /// `QuestionError::TooFewOptions` if fewer than two options are given.
    pub fn new(
        number: u32,
        question: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<AnswerKey>,
    ) -> Result<Self, QuestionError> {
        let question = question.into().trim().to_owned();
        if question.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }

        Ok(Self {
            number,
            question,
            options,
            answer: answer.into(),
        })
    }

    /// Display ordinal as found in the source dataset.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerKey {
        &self.answer
    }

    /// Position of the correct option.
    ///
    /// A numeric key is used directly, even when it points past the end of
    /// `options`. A text key is matched exactly against the options. `None`
    /// means no option can ever be marked correct.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        match &self.answer {
            AnswerKey::Index(index) => usize::try_from(*index).ok(),
            AnswerKey::Text(text) => self.options.iter().position(|opt| opt == text),
        }
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        self.correct_index() == Some(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn text_answer_resolves_by_position() {
        let q = Question::new(
            2,
            "Which is prone to PSE?",
            options(&["Berkshire", "Chester White", "Pietrain", "Tamworth"]),
            "Pietrain",
        )
        .unwrap();

        assert_eq!(q.correct_index(), Some(2));
        assert!(q.is_correct(2));
    }

    #[test]
    fn unmatched_text_answer_has_no_correct_option() {
        let q = Question::new(1, "Q", options(&["a", "b"]), "c").unwrap();

        assert_eq!(q.correct_index(), None);
        assert!(!q.is_correct(0));
        assert!(!q.is_correct(1));
    }

    #[test]
    fn numeric_answer_is_used_directly() {
        let q = Question::new(1, "Q", options(&["a", "b"]), 7_usize).unwrap();
        assert_eq!(q.correct_index(), Some(7));

        let negative = Question::new(1, "Q", options(&["a", "b"]), AnswerKey::Index(-1)).unwrap();
        assert_eq!(negative.correct_index(), None);
    }

    #[test]
    fn rejects_blank_text_and_short_options() {
        assert_eq!(
            Question::new(1, "   ", options(&["a", "b"]), 0_usize),
            Err(QuestionError::EmptyText)
        );
        assert_eq!(
            Question::new(1, "Q", options(&["a"]), 0_usize),
            Err(QuestionError::TooFewOptions { count: 1 })
        );
    }

    #[test]
    fn trims_question_text() {
        let q = Question::new(1, "  Which?  ", options(&["a", "b"]), 0_usize).unwrap();
        assert_eq!(q.text(), "Which?");
    }
}
