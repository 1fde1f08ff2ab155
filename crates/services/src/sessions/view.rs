use quiz_core::{NavState, Router, SessionState};

use super::progress::ProgressView;

/// How an option should be highlighted.
///
/// Only answered questions carry marks. The correct option is always revealed
/// after answering, whatever was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Unmarked,
    ChosenCorrect,
    ChosenWrong,
    Correct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextLabel {
    Next,
    Finish,
}

impl NextLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Finish => "Finish",
        }
    }
}

/// Everything a presenter needs to draw one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position in the dataset.
    pub position: usize,
    /// Ordinal carried by the source record.
    pub source_number: u32,
    pub heading: String,
    pub options: Vec<OptionView>,
    /// Options no longer accept input.
    pub locked: bool,
    pub prev_enabled: bool,
    pub next_label: NextLabel,
    pub next_enabled: bool,
    pub progress: ProgressView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryView {
    pub score: u32,
    pub total: usize,
    pub progress: ProgressView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Question(QuestionView),
    Summary(SummaryView),
}

pub(crate) fn progress_view(state: &SessionState) -> ProgressView {
    ProgressView {
        score: state.score(),
        answered: state.answered_count(),
        total: state.total(),
    }
}

pub(crate) fn screen(state: &SessionState, router: &Router) -> Screen {
    match router.state() {
        NavState::Complete => Screen::Summary(SummaryView {
            score: state.score(),
            total: state.total(),
            progress: progress_view(state),
        }),
        NavState::Question(position) => Screen::Question(question_view(state, router, position)),
    }
}

fn question_view(state: &SessionState, router: &Router, position: usize) -> QuestionView {
    let index = position - 1;
    let question = state.current_question();
    let chosen = state.selected(index);
    let correct = question.correct_index();

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let mark = match chosen {
                None => OptionMark::Unmarked,
                Some(c) if c == i && Some(i) == correct => OptionMark::ChosenCorrect,
                Some(c) if c == i => OptionMark::ChosenWrong,
                Some(_) if Some(i) == correct => OptionMark::Correct,
                Some(_) => OptionMark::Unmarked,
            };
            OptionView {
                index: i,
                text: text.clone(),
                mark,
            }
        })
        .collect();

    QuestionView {
        position,
        source_number: question.number(),
        heading: format!("Q{position}. {}", question.text()),
        options,
        locked: chosen.is_some(),
        prev_enabled: router.can_prev(),
        next_label: if position == state.total() {
            NextLabel::Finish
        } else {
            NextLabel::Next
        },
        next_enabled: router.can_next(state),
        progress: progress_view(state),
    }
}
