//! Core game state and logic

use crate::board::{Board, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::difficulty::{Difficulty, GravityCurve};
use crate::piece::{Move, Piece};
use crate::randomizer::Randomizer;
use crate::score::Score;
use crate::tetromino::TetrominoType;
use std::time::Duration;

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// No game has been played yet
    Idle,
    Running,
    Paused,
    Finished,
}

/// What a single gravity step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The game is not running; nothing happened
    Skipped,
    /// The active piece fell one row
    Fell,
    /// The active piece locked and the next one took over
    Locked { lines: usize },
    /// The active piece locked and the top row is now occupied
    GameOver { lines: usize },
}

/// Parameters fixed for the lifetime of a `Game`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub difficulty: Difficulty,
    pub curve: GravityCurve,
    /// Fixed piece order when set
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            difficulty: Difficulty::default(),
            curve: GravityCurve::default(),
            seed: None,
        }
    }
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    pub active: Option<&'a Piece>,
    pub next: Option<TetrominoType>,
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub score: Score,
}

/// The main game struct; the single owner and mutator of all game state
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    /// Current falling piece, present while a game is in progress
    active: Option<Piece>,
    /// Preview of the piece that spawns after the active one locks
    next: Option<TetrominoType>,
    randomizer: Randomizer,
    score: Score,
    status: GameStatus,
    difficulty: Difficulty,
    curve: GravityCurve,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    /// Create an idle game; call `new_game` to start playing
    pub fn new(config: GameConfig) -> Self {
        let randomizer = match config.seed {
            Some(seed) => Randomizer::with_seed(seed),
            None => Randomizer::new(),
        };
        Self {
            board: Board::new(config.width, config.height),
            active: None,
            next: None,
            randomizer,
            score: Score::new(),
            status: GameStatus::Idle,
            difficulty: config.difficulty,
            curve: config.curve,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    #[allow(dead_code)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[allow(dead_code)]
    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[allow(dead_code)]
    pub fn next(&self) -> Option<TetrominoType> {
        self.next
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Snapshot for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            active: self.active.as_ref(),
            next: self.next,
            status: self.status,
            difficulty: self.difficulty,
            score: self.score,
        }
    }

    /// Current gravity delay for this difficulty and line count
    pub fn gravity_interval(&self) -> Duration {
        self.curve.interval(self.difficulty, self.score.lines)
    }

    /// Start a fresh game from any state
    pub fn new_game(&mut self) {
        self.board = Board::new(self.board.width(), self.board.height());
        self.score = Score::new();
        self.active = Some(Piece::spawn(self.randomizer.next(), self.board.width()));
        self.next = Some(self.randomizer.next());
        self.status = GameStatus::Running;
        tracing::info!(
            "New game: {} board {}x{}",
            self.difficulty.name(),
            self.board.width(),
            self.board.height()
        );
    }

    /// Running -> Paused. Returns false in any other state.
    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        self.status = GameStatus::Paused;
        tracing::info!("Paused");
        true
    }

    /// Paused -> Running. Returns false in any other state.
    pub fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Running;
        tracing::info!("Resumed");
        true
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty != difficulty {
            tracing::info!("Difficulty {} -> {}", self.difficulty.name(), difficulty.name());
            self.difficulty = difficulty;
        }
    }

    /// Apply a player move to the active piece. Ignored unless running.
    pub fn apply_move(&mut self, mv: Move) {
        if !self.is_running() {
            return;
        }
        if let Some(piece) = &self.active {
            self.active = Some(piece.apply(mv, &self.board));
        }
    }

    /// Replace the active piece with a random kind at the same position.
    /// Ignored unless running, and when the new shape would not fit.
    pub fn change_piece(&mut self) {
        if !self.is_running() {
            return;
        }
        let kind = self.randomizer.next();
        if let Some(changed) = self
            .active
            .as_ref()
            .and_then(|piece| piece.changed_to(kind, &self.board))
        {
            self.active = Some(changed);
        }
    }

    /// One gravity step: fall a row, or lock and bring in the next piece
    pub fn step(&mut self) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::Skipped;
        }
        let Some(piece) = self.active.take() else {
            return StepOutcome::Skipped;
        };

        if piece.can_fall(&self.board) {
            self.active = Some(piece.apply(Move::Down, &self.board));
            return StepOutcome::Fell;
        }

        self.board.lock(&piece.shape, piece.position, piece.color);
        let lines = self.board.clear_full_rows();
        self.score.add_lines(lines);
        tracing::debug!(
            "Locked {} at ({}, {}), cleared {} line(s)",
            piece.kind.name(),
            piece.position.x,
            piece.position.y,
            lines
        );

        // Promote the preview and draw a fresh one
        let kind = self.next.take().unwrap_or_else(|| self.randomizer.next());
        self.active = Some(Piece::spawn(kind, self.board.width()));
        self.next = Some(self.randomizer.next());

        if self.board.is_topped_out() {
            self.status = GameStatus::Finished;
            tracing::info!(
                "Game over: score {}, lines {}",
                self.score.points,
                self.score.lines
            );
            return StepOutcome::GameOver { lines };
        }

        StepOutcome::Locked { lines }
    }
}

#[cfg(test)]
impl Game {
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn score_mut(&mut self) -> &mut Score {
        &mut self.score
    }

    pub(crate) fn set_active(&mut self, kind: TetrominoType) {
        self.active = Some(Piece::spawn(kind, self.board.width()));
    }
}
