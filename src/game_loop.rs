//! Binds the game engine to its gravity and frame timers

use crate::difficulty::Difficulty;
use crate::game::{Game, GameStatus, StepOutcome};
use crate::input::Direction;
use crate::piece::Move;
use crate::scheduler::{CancelToken, Scheduler};
use std::time::{Duration, Instant};

/// Timer kinds driving the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// One gravity step
    Gravity,
    /// Redraw; never mutates game state
    Frame,
}

/// Result of polling the loop's timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Polled {
    /// A frame tick fired since the last poll
    pub redraw: bool,
    /// The game ended during this poll
    pub finished: bool,
}

/// Game plus its timers.
///
/// Both timers run exactly while the game is `Running`: every transition
/// goes through `sync_timers`, which starts, stops or restarts them.
pub struct GameLoop {
    game: Game,
    scheduler: Scheduler<Tick>,
    gravity: Option<CancelToken>,
    frame: Option<CancelToken>,
}

impl GameLoop {
    pub fn new(game: Game, frame_interval: Duration) -> Self {
        Self {
            game,
            scheduler: Scheduler::new(frame_interval),
            gravity: None,
            frame: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_game(self) -> Game {
        self.game
    }

    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    /// Deadline of the next timer, for sizing the input poll timeout
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    #[allow(dead_code)]
    pub fn timers_running(&self) -> bool {
        self.gravity.is_some() && self.frame.is_some()
    }

    pub fn new_game(&mut self, now: Instant) {
        self.game.new_game();
        self.sync_timers(now);
    }

    pub fn pause(&mut self, now: Instant) -> bool {
        let paused = self.game.pause();
        self.sync_timers(now);
        paused
    }

    pub fn resume(&mut self, now: Instant) -> bool {
        let resumed = self.game.resume();
        self.sync_timers(now);
        resumed
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty, now: Instant) {
        self.game.set_difficulty(difficulty);
        self.sync_timers(now);
    }

    /// Map a discrete direction (arrow key or swipe) to a move and apply it
    pub fn handle_directional_input(&mut self, direction: Direction) {
        self.handle_move(direction.to_move());
    }

    pub fn handle_move(&mut self, mv: Move) {
        self.game.apply_move(mv);
    }

    pub fn change_piece(&mut self) {
        self.game.change_piece();
    }

    /// Run every timer due at `now`
    pub fn poll(&mut self, now: Instant) -> Polled {
        let mut polled = Polled::default();
        for tick in self.scheduler.poll(now) {
            match tick {
                Tick::Frame => polled.redraw = true,
                Tick::Gravity => {
                    // A gravity tick may still be queued behind the one that ended the game
                    if !self.game.is_running() {
                        continue;
                    }
                    match self.game.step() {
                        StepOutcome::GameOver { .. } => polled.finished = true,
                        StepOutcome::Locked { lines } if lines > 0 => {}
                        _ => continue,
                    }
                    // Line clears can change the gravity delay, game over stops the timers
                    self.sync_timers(now);
                }
            }
        }
        polled
    }

    /// Start, stop or restart the timers to match the game state
    fn sync_timers(&mut self, now: Instant) {
        if !self.game.is_running() {
            for token in [self.gravity.take(), self.frame.take()].into_iter().flatten() {
                self.scheduler.cancel(token);
            }
            return;
        }

        let interval = self.game.gravity_interval();
        let current = self.gravity.and_then(|token| self.scheduler.interval_of(token));
        if current != Some(interval) {
            if let Some(token) = self.gravity.take() {
                self.scheduler.cancel(token);
            }
            tracing::debug!("Gravity interval {}ms", interval.as_millis());
            self.gravity = Some(self.scheduler.schedule(now, interval, Tick::Gravity));
        }

        if self.frame.is_none() {
            self.frame = Some(self.scheduler.schedule_frame(now, Tick::Frame));
        }
    }
}
