//! Score and line tracking

/// Points awarded for every cleared row
pub const LINE_CLEAR_BONUS: u64 = 100;

/// Score tracking for one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit cleared rows. Each row counts on its own: no multi-line bonus.
    pub fn add_lines(&mut self, rows: usize) {
        for _ in 0..rows {
            self.lines += 1;
            self.points += LINE_CLEAR_BONUS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        score.add_lines(1);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
    }

    #[test]
    fn test_double_clear_is_flat() {
        let mut score = Score::new();
        score.add_lines(2);
        assert_eq!(score.points, 200);
        assert_eq!(score.lines, 2);
    }

    #[test]
    fn test_no_clear() {
        let mut score = Score::new();
        score.add_lines(0);
        assert_eq!(score, Score::default());
    }
}
