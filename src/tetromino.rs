//! Tetromino catalog: the 7 piece kinds, their colors and occupancy matrices

use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    O, // Yellow - square
    I, // Cyan - long bar
    T, // Pink - T-shape
    L, // Orange - L-shape
    J, // Blue - J-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
}

impl TetrominoType {
    /// Every kind, in catalog order
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::O,
        TetrominoType::I,
        TetrominoType::T,
        TetrominoType::L,
        TetrominoType::J,
        TetrominoType::S,
        TetrominoType::Z,
    ];

    /// Get the display color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::O => Color::Rgb(0xFA, 0xD6, 0x01),
            TetrominoType::I => Color::Rgb(0x00, 0xE2, 0xE9),
            TetrominoType::T => Color::Rgb(0xFE, 0x4C, 0xE7),
            TetrominoType::L => Color::Rgb(0xFF, 0x79, 0x01),
            TetrominoType::J => Color::Rgb(0x08, 0x3B, 0xF7),
            TetrominoType::S => Color::Rgb(0x1F, 0xC5, 0x00),
            TetrominoType::Z => Color::Rgb(0xF2, 0x22, 0x31),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::O => "O",
            TetrominoType::I => "I",
            TetrominoType::T => "T",
            TetrominoType::L => "L",
            TetrominoType::J => "J",
            TetrominoType::S => "S",
            TetrominoType::Z => "Z",
        }
    }

    /// Get the spawn shape for this tetromino.
    /// Each call builds a fresh matrix, so the catalog itself never changes.
    pub fn shape(&self) -> Shape {
        match self {
            TetrominoType::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            TetrominoType::I => Shape::from_rows(&[&[1], &[1], &[1], &[1]]),
            TetrominoType::T => Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]),
            TetrominoType::L => Shape::from_rows(&[&[1, 0], &[1, 0], &[1, 1]]),
            TetrominoType::J => Shape::from_rows(&[&[0, 1], &[0, 1], &[1, 1]]),
            TetrominoType::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            TetrominoType::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
        }
    }
}

/// Rectangular occupancy matrix, row 0 on top.
/// The top-left entry maps to the owning piece's anchor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Build a shape from 0/1 rows
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }

    #[allow(dead_code)]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the first row; catalog shapes are rectangular
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Offsets (dx, dy) of every occupied sub-cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, occupied)| **occupied)
                .map(move |(dx, _)| (dx as i32, dy as i32))
        })
    }

    /// Clockwise quarter turn: transpose, then reverse each resulting row
    pub fn rotated_cw(&self) -> Shape {
        let rows = (0..self.width())
            .map(|col| self.rows.iter().rev().map(|row| row[col]).collect())
            .collect();
        Shape { rows }
    }
}
