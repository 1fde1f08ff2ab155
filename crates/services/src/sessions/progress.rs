/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressView {
    pub score: u32,
    pub answered: usize,
    pub total: usize,
}

impl ProgressView {
    /// Answered share as a whole percentage, capped at 100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.answered.min(self.total) * 100) / self.total;
        u8::try_from(pct).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down_and_caps() {
        let view = |answered, total| ProgressView {
            score: 0,
            answered,
            total,
        };

        assert_eq!(view(0, 3).percent(), 0);
        assert_eq!(view(1, 3).percent(), 33);
        assert_eq!(view(3, 3).percent(), 100);
        assert_eq!(view(5, 3).percent(), 100);
        assert_eq!(view(0, 0).percent(), 0);
    }
}
