//! Difficulty levels and the gravity curve

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Selectable difficulty; picks the base gravity delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Gravity delay before any line-based speed-up
    pub fn base_delay(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(900),
            Difficulty::Normal => Duration::from_millis(600),
            Difficulty::Hard => Duration::from_millis(300),
        }
    }

    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
    }

    /// Next difficulty in menu order, wrapping around
    pub fn cycled(self, forward: bool) -> Difficulty {
        let all = Self::all();
        let idx = all.iter().position(|d| *d == self).unwrap_or(0);
        let next = if forward {
            (idx + 1) % all.len()
        } else {
            (idx + all.len() - 1) % all.len()
        };
        all[next]
    }
}

/// How gravity speeds up as lines are cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityCurve {
    /// Delay removed for every 10 cleared lines
    pub step: Duration,
    /// The delay never drops below this
    pub floor: Duration,
}

impl Default for GravityCurve {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(50),
            floor: Duration::from_millis(100),
        }
    }
}

impl GravityCurve {
    /// Effective gravity delay for a difficulty after `lines` cleared lines
    pub fn interval(&self, difficulty: Difficulty, lines: u32) -> Duration {
        let speedup = self.step.saturating_mul(lines / 10);
        difficulty
            .base_delay()
            .saturating_sub(speedup)
            .max(self.floor)
    }
}
