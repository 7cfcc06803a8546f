//! Game board representation and collision detection

use crate::tetromino::Shape;
use ratatui::style::Color;

/// Default board dimensions
pub const DEFAULT_WIDTH: usize = 16;
pub const DEFAULT_HEIGHT: usize = 24;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Filled(color) => Some(*color),
            Cell::Empty => None,
        }
    }
}

/// Grid-space anchor: column `x`, row `y`, row 0 at the top.
/// `y` goes negative while a piece is still above the visible board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored as [row][col], row 0 is the top
    rows: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Get the cell at (x, y).
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Set the cell at (x, y).
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self
            .rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Check whether `shape` anchored at `pos` may sit on the board.
    ///
    /// Only the bottom edge, both side edges and occupied cells are checked:
    /// sub-cells above row 0 are legal, which is what lets pieces spawn
    /// partially off the top.
    pub fn is_legal(&self, shape: &Shape, pos: Position) -> bool {
        shape.cells().all(|(dx, dy)| {
            let x = pos.x + dx;
            let y = pos.y + dy;
            if y >= self.height as i32 {
                return false;
            }
            if x < 0 || x >= self.width as i32 {
                return false;
            }
            if y < 0 {
                return true;
            }
            self.get(x, y).is_some_and(|cell| cell.is_empty())
        })
    }

    /// Write `shape` into the board with `color`.
    /// Sub-cells outside the board (typically above row 0) are skipped.
    pub fn lock(&mut self, shape: &Shape, pos: Position, color: Color) {
        for (dx, dy) in shape.cells() {
            self.set(pos.x + dx, pos.y + dy, Cell::Filled(color));
        }
    }

    /// Remove every full row, shifting the rows above it down by one,
    /// and return the number removed. Height never changes.
    pub fn clear_full_rows(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !row.iter().all(Cell::is_filled));
        let cleared = before - self.rows.len();

        // Refill the top with empty rows
        for _ in 0..cleared {
            self.rows.insert(0, vec![Cell::Empty; self.width]);
        }

        cleared
    }

    /// Game over condition: any locked cell in the top row
    pub fn is_topped_out(&self) -> bool {
        self.rows
            .first()
            .is_some_and(|row| row.iter().any(Cell::is_filled))
    }

    /// Check if the board is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}
