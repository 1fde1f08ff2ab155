use quiz_core::{
    AnswerOutcome, Dataset, NavState, NavToken, Progress, Router, SessionEvent, SessionState,
};

use super::progress::ProgressView;
use super::view::{self, Screen};

//
// ─── SESSION CONTROLLER ────────────────────────────────────────────────────────
//

/// Owns the session state and the router for one booted dataset.
///
/// Navigation is token driven: `next`/`prev` only compute the token to
/// publish, and the state changes when that token comes back through
/// `route`, exactly like an external token change.
#[derive(Debug, Clone)]
pub struct QuizSession {
    state: SessionState,
    router: Router,
}

impl QuizSession {
    /// Seed a session and make the initial routing decision.
    ///
    /// The returned token must be published on the token channel once.
    #[must_use]
    pub fn start(dataset: Dataset, progress: Progress) -> (Self, NavToken) {
        let mut state = SessionState::new(dataset, progress);
        let (router, token) = Router::boot(&mut state);
        (Self { state, router }, token)
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn nav(&self) -> NavState {
        self.router.state()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.state.total()
    }

    #[must_use]
    pub fn progress(&self) -> ProgressView {
        view::progress_view(&self.state)
    }

    /// Handle a token change. Invalid tokens are ignored.
    pub fn route(&mut self, token: &str) -> Option<SessionEvent> {
        self.router.handle_token(token, &mut self.state)
    }

    /// Token for the Next/Finish intent, if available.
    #[must_use]
    pub fn next(&self) -> Option<NavToken> {
        self.router.next(&self.state).map(NavState::to_token)
    }

    /// Token for the Prev intent, if available.
    #[must_use]
    pub fn prev(&self) -> Option<NavToken> {
        self.router.prev().map(NavState::to_token)
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        view::screen(&self.state, &self.router)
    }

    /// Record an answer for the active question. `None` outside a question.
    pub(crate) fn answer_current(&mut self, selected: usize) -> Option<AnswerOutcome> {
        match self.router.state() {
            NavState::Question(_) => Some(self.state.record_current_answer(selected)),
            NavState::Complete => None,
        }
    }

    pub(crate) fn event_for(&self, outcome: AnswerOutcome) -> Option<SessionEvent> {
        self.state.event_for(outcome)
    }

    pub(crate) fn restart(&mut self) -> (SessionEvent, NavToken) {
        self.router.restart(&mut self.state)
    }
}
