//! Navigation state machine driven by a string token.
//!
//! The token channel carries either `complete` or a 1-based question number.
//! `NavState::from_token` / `NavState::to_token` are the only places that deal
//! with strings; `Router` works on typed states.

use std::fmt;

use crate::session::{Resume, SessionEvent, SessionState};

const COMPLETE_TOKEN: &str = "complete";

//
// ─── STATES & TOKENS ───────────────────────────────────────────────────────────
//

/// Active screen: a 1-based question number or the completion summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavState {
    Question(usize),
    Complete,
}

/// Encoded form of a `NavState`, as published on the token channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavToken(String);

impl NavToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NavState> for NavToken {
    fn from(state: NavState) -> Self {
        state.to_token()
    }
}

impl NavState {
    /// Decode a raw token for a dataset of `total` questions.
    ///
    /// A leading `#` is ignored. Numbers are read leniently: leading
    /// whitespace, an optional sign, then digits; anything after the digits
    /// is dropped. Returns `None` for unknown or out-of-range tokens.
    #[must_use]
    pub fn from_token(raw: &str, total: usize) -> Option<Self> {
        let token = raw.strip_prefix('#').unwrap_or(raw);
        if token == COMPLETE_TOKEN {
            return Some(Self::Complete);
        }
        let number = leading_integer(token)?;
        let number = usize::try_from(number).ok()?;
        (1..=total).contains(&number).then_some(Self::Question(number))
    }

    #[must_use]
    pub fn to_token(self) -> NavToken {
        match self {
            Self::Question(number) => NavToken(number.to_string()),
            Self::Complete => NavToken(COMPLETE_TOKEN.to_owned()),
        }
    }

    #[must_use]
    pub fn from_resume(resume: Resume) -> Self {
        match resume {
            Resume::Question(index) => Self::Question(index + 1),
            Resume::Complete => Self::Complete,
        }
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

fn leading_integer(token: &str) -> Option<i64> {
    let s = token.trim_start();
    let (negative, rest) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

//
// ─── ROUTER ────────────────────────────────────────────────────────────────────
//

/// Maps tokens to session transitions and computes Next/Prev targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    state: NavState,
}

impl Router {
    /// Pick the initial state from the session's resume point and position
    /// the session on it. The returned token must be published once.
    pub fn boot(session: &mut SessionState) -> (Self, NavToken) {
        let state = NavState::from_resume(session.compute_resume_index());
        if let NavState::Question(number) = state {
            session.set_current_index(number - 1);
        }
        log::info!("boot resolved to {}", state.to_token());
        (Self { state }, state.to_token())
    }

    #[must_use]
    pub fn state(&self) -> NavState {
        self.state
    }

    /// Apply an external token change. Invalid tokens are ignored.
    pub fn handle_token(&mut self, raw: &str, session: &mut SessionState) -> Option<SessionEvent> {
        let Some(state) = NavState::from_token(raw, session.total()) else {
            log::debug!("ignoring navigation token {raw:?}");
            return None;
        };
        Some(self.enter(state, session))
    }

    fn enter(&mut self, state: NavState, session: &mut SessionState) -> SessionEvent {
        if let NavState::Question(number) = state {
            session.set_current_index(number - 1);
        }
        log::debug!("navigated to {}", state.to_token());
        self.state = state;
        SessionEvent::Navigated(state)
    }

    /// Next is offered only on an answered question.
    #[must_use]
    pub fn can_next(&self, session: &SessionState) -> bool {
        match self.state {
            NavState::Question(number) => session.is_answered(number - 1),
            NavState::Complete => false,
        }
    }

    #[must_use]
    pub fn can_prev(&self) -> bool {
        matches!(self.state, NavState::Question(number) if number > 1)
    }

    /// Target of the Next intent, or `None` when unavailable.
    #[must_use]
    pub fn next(&self, session: &SessionState) -> Option<NavState> {
        if !self.can_next(session) {
            return None;
        }
        match self.state {
            NavState::Question(number) if number < session.total() => {
                Some(NavState::Question(number + 1))
            }
            NavState::Question(_) => Some(NavState::Complete),
            NavState::Complete => None,
        }
    }

    /// Target of the Prev intent, or `None` when unavailable.
    #[must_use]
    pub fn prev(&self) -> Option<NavState> {
        match self.state {
            NavState::Question(number) if number > 1 => Some(NavState::Question(number - 1)),
            _ => None,
        }
    }

    /// Reset the session and move back to the first question.
    pub fn restart(&mut self, session: &mut SessionState) -> (SessionEvent, NavToken) {
        let event = session.restart();
        self.enter(NavState::Question(1), session);
        log::info!("session restarted");
        (event, NavState::Question(1).to_token())
    }
}
