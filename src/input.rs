//! Input mapping: keyboard keys and mouse swipes to game commands

use crate::piece::Move;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Discrete direction from an arrow key or a swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Up rotates; the others shift the piece
    pub fn to_move(self) -> Move {
        match self {
            Direction::Up => Move::Rotate,
            Direction::Down => Move::Down,
            Direction::Left => Move::Left,
            Direction::Right => Move::Right,
        }
    }
}

/// Commands produced by the keyboard while a game is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Change,
    Pause,
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub move_down: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub change: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        tracing::warn!("Ignoring unknown key name {:?}", s);
                        return None;
                    }
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().filter_map(|s| Self::parse_key(s)).collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            move_down: Self::parse_keys(&settings.keys.move_down),
            rotate: Self::parse_keys(&settings.keys.rotate),
            change: Self::parse_keys(&settings.keys.change),
            pause: Self::parse_keys(&settings.keys.pause),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// Map a key press to a command; unbound keys map to nothing
    pub fn command(&self, key: KeyEvent) -> Option<Command> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        let command = if self.move_left.contains(&code) {
            Command::Move(Move::Left)
        } else if self.move_right.contains(&code) {
            Command::Move(Move::Right)
        } else if self.move_down.contains(&code) {
            Command::Move(Move::Down)
        } else if self.rotate.contains(&code) {
            Command::Move(Move::Rotate)
        } else if self.change.contains(&code) {
            Command::Change
        } else if self.pause.contains(&code) {
            Command::Pause
        } else if self.quit.contains(&code) {
            Command::Quit
        } else {
            return None;
        };
        Some(command)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Turns a left-button mouse drag into swipe directions.
///
/// The drag offset from the press point is quantized by `step` cells along
/// whichever axis dominates; a direction is emitted each time the quantized
/// offset changes. Equal magnitudes emit nothing.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    step: i32,
    start: Option<(i32, i32)>,
    delta: (i32, i32),
}

impl SwipeTracker {
    pub fn new(step: u16) -> Self {
        Self {
            step: i32::from(step.max(1)),
            start: None,
            delta: (0, 0),
        }
    }

    /// Feed a mouse event; returns a direction when the swipe advanced
    pub fn handle(&mut self, event: MouseEvent) -> Option<Direction> {
        let (col, row) = (i32::from(event.column), i32::from(event.row));
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((col, row));
                self.delta = (0, 0);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => self.drag(col, row),
            MouseEventKind::Up(MouseButton::Left) => {
                self.start = None;
                self.delta = (0, 0);
                None
            }
            _ => None,
        }
    }

    fn drag(&mut self, col: i32, row: i32) -> Option<Direction> {
        let (start_col, start_row) = self.start?;
        let (dx, dy) = (col - start_col, row - start_row);

        let mut delta = self.delta;
        if dx.abs() > dy.abs() {
            delta.0 = dx.div_euclid(self.step);
        } else {
            delta.1 = dy.div_euclid(self.step);
        }
        if delta == self.delta {
            return None;
        }
        self.delta = delta;

        let (x, y) = delta;
        if x.abs() > y.abs() {
            Some(if x > 0 { Direction::Right } else { Direction::Left })
        } else if x.abs() < y.abs() {
            Some(if y > 0 { Direction::Down } else { Direction::Up })
        } else {
            None
        }
    }
}
