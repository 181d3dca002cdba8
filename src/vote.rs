use std::collections::VecDeque;

/// Sliding-window vote over a boolean signal.
#[derive(Clone, Debug)]
pub struct Vote {
    window: usize,
    min_true: usize,
    history: VecDeque<bool>,
}

impl Vote {
    pub fn new(window: usize, min_true: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            min_true,
            history: VecDeque::with_capacity(window),
        }
    }

    pub fn mark(&mut self, observation: bool) {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(observation);
    }

    pub fn ok(&self) -> bool {
        self.history.iter().filter(|&&seen| seen).count() >= self.min_true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voted(marks: &[u8]) -> bool {
        let mut vote = Vote::new(5, 3);
        for &m in marks {
            vote.mark(m == 1);
        }
        vote.ok()
    }

    #[test]
    fn majority_of_window() {
        assert!(voted(&[1, 1, 1, 0, 0]));
        assert!(!voted(&[1, 1, 0, 0, 0]));
        assert!(voted(&[0, 1, 0, 1, 1]));
    }

    #[test]
    fn empty_window_is_not_ok() {
        assert!(!voted(&[]));
    }

    #[test]
    fn oldest_marks_fall_out() {
        // Three early hits are pushed out by five misses.
        assert!(!voted(&[1, 1, 1, 0, 0, 0, 0, 0]));
        // Only the last five count: [1, 0, 1, 0, 1].
        assert!(voted(&[0, 0, 0, 1, 0, 1, 0, 1]));
    }

    #[test]
    fn single_glitch_does_not_break_a_held_pose() {
        let mut vote = Vote::new(5, 3);
        for _ in 0..5 {
            vote.mark(true);
        }
        vote.mark(false);
        assert!(vote.ok());
        vote.mark(false);
        assert!(vote.ok());
        vote.mark(false);
        assert!(!vote.ok());
    }
}
