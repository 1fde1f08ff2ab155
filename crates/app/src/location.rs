use std::collections::VecDeque;

/// Navigation token channel with browser-style history.
///
/// Every change of the current token queues a change notification; `poll`
/// hands them out strictly in the order they happened. Setting the token that
/// is already current is not a change.
#[derive(Debug, Default)]
pub struct Location {
    entries: Vec<String>,
    cursor: usize,
    pending: VecDeque<String>,
}

impl Location {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Navigate to `token`, dropping any forward history.
    pub fn push(&mut self, token: &str) {
        if self.current() == Some(token) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
            self.cursor += 1;
        }
        self.entries.push(token.to_owned());
        self.pending.push_back(token.to_owned());
    }

    /// Returns `false` when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.notify_current();
        true
    }

    /// Returns `false` when there is nothing to go forward to.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        self.notify_current();
        true
    }

    /// Next token change to deliver, oldest first.
    pub fn poll(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    fn notify_current(&mut self) {
        if let Some(token) = self.entries.get(self.cursor) {
            self.pending.push_back(token.clone());
        }
    }
}
