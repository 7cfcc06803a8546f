//! Active falling piece and the move engine

use crate::board::{Board, Position};
use crate::tetromino::{Shape, TetrominoType};
use ratatui::style::Color;

/// Player and gravity moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Down,
    Rotate,
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The catalog kind this piece was drawn from
    pub kind: TetrominoType,
    /// Current (possibly rotated) shape
    pub shape: Shape,
    pub color: Color,
    /// Board position of the shape's top-left entry
    pub position: Position,
}

impl Piece {
    /// Create a new piece at the spawn position: horizontal center,
    /// one row above the visible board
    pub fn spawn(kind: TetrominoType, board_width: usize) -> Self {
        let x = (board_width / 2) as i32 - 1;
        Self {
            kind,
            shape: kind.shape(),
            color: kind.color(),
            position: Position::new(x, -1),
        }
    }

    /// Absolute board coordinates of every occupied sub-cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .cells()
            .map(|(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    /// Whether the piece can fall one more row
    pub fn can_fall(&self, board: &Board) -> bool {
        board.is_legal(&self.shape, self.position.offset(0, 1))
    }

    /// Apply a move and return the resulting piece.
    ///
    /// Illegal shifts leave the piece where it is. A rotation that does not
    /// fit is pulled back from the right wall by exactly its overhang and
    /// then kept as-is, even if the clamped spot is still blocked.
    pub fn apply(&self, mv: Move, board: &Board) -> Piece {
        let shifted = |dx, dy| {
            let position = self.position.offset(dx, dy);
            if board.is_legal(&self.shape, position) {
                Piece {
                    position,
                    ..self.clone()
                }
            } else {
                self.clone()
            }
        };

        match mv {
            Move::Left => shifted(-1, 0),
            Move::Right => shifted(1, 0),
            Move::Down => shifted(0, 1),
            Move::Rotate => {
                let rotated = self.shape.rotated_cw();
                let mut position = self.position;
                if !board.is_legal(&rotated, position) {
                    position.x -= position.x + rotated.width() as i32 - board.width() as i32;
                }
                Piece {
                    shape: rotated,
                    position,
                    ..self.clone()
                }
            }
        }
    }

    /// Swap in another kind at the same position, if it fits there
    pub fn changed_to(&self, kind: TetrominoType, board: &Board) -> Option<Piece> {
        let shape = kind.shape();
        board.is_legal(&shape, self.position).then(|| Piece {
            kind,
            shape,
            color: kind.color(),
            position: self.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn piece_at(kind: TetrominoType, x: i32, y: i32) -> Piece {
        Piece {
            position: Position::new(x, y),
            ..Piece::spawn(kind, 10)
        }
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(TetrominoType::T, 16);
        assert_eq!(piece.position, Position::new(7, -1));
        assert_eq!(piece.color, TetrominoType::T.color());
        assert_eq!(piece.shape, TetrominoType::T.shape());
    }

    #[test]
    fn test_move_left_right_down() {
        let board = Board::new(10, 20);
        let piece = piece_at(TetrominoType::O, 4, 5);

        assert_eq!(piece.apply(Move::Left, &board).position, Position::new(3, 5));
        assert_eq!(piece.apply(Move::Right, &board).position, Position::new(5, 5));
        assert_eq!(piece.apply(Move::Down, &board).position, Position::new(4, 6));
    }

    #[test]
    fn test_blocked_moves_are_absorbed() {
        let mut board = Board::new(10, 20);
        let piece = piece_at(TetrominoType::O, 0, 18);
        assert_eq!(piece.apply(Move::Left, &board), piece);
        assert_eq!(piece.apply(Move::Down, &board), piece);

        board.set(2, 18, Cell::Filled(Color::Red));
        assert_eq!(piece.apply(Move::Right, &board), piece);
    }

    #[test]
    fn test_rotate_in_open_space() {
        let board = Board::new(10, 20);
        let piece = piece_at(TetrominoType::I, 4, 5);
        let rotated = piece.apply(Move::Rotate, &board);

        assert_eq!(rotated.position, Position::new(4, 5));
        assert_eq!(rotated.shape, Shape::from_rows(&[&[1, 1, 1, 1]]));
    }

    #[test]
    fn test_rotate_i_piece_at_right_wall_is_clamped() {
        let board = Board::new(10, 20);
        let piece = piece_at(TetrominoType::I, 9, 5);
        let rotated = piece.apply(Move::Rotate, &board);

        assert_eq!(rotated.position, Position::new(6, 5));
        assert!(rotated.cells().all(|(x, _)| (0..10).contains(&x)));
        assert!(board.is_legal(&rotated.shape, rotated.position));
    }

    #[test]
    fn test_rotate_clamp_ignores_occupied_cells() {
        // Blocked by a settled cell rather than the wall: the clamp still
        // applies its right-wall formula and commits the rotation.
        let mut board = Board::new(10, 20);
        board.set(4, 4, Cell::Filled(Color::Red));
        let piece = piece_at(TetrominoType::I, 2, 4);
        let rotated = piece.apply(Move::Rotate, &board);

        assert_eq!(rotated.shape.width(), 4);
        assert_eq!(rotated.position, Position::new(6, 4));
    }

    #[test]
    fn test_change_keeps_position() {
        let board = Board::new(10, 20);
        let piece = piece_at(TetrominoType::I, 3, 2);
        let changed = piece.changed_to(TetrominoType::T, &board).unwrap();

        assert_eq!(changed.kind, TetrominoType::T);
        assert_eq!(changed.color, TetrominoType::T.color());
        assert_eq!(changed.position, piece.position);
    }

    #[test]
    fn test_change_rejected_when_blocked() {
        let board = Board::new(10, 20);
        let piece = piece_at(TetrominoType::I, 9, 2);
        assert!(piece.changed_to(TetrominoType::O, &board).is_none());
    }
}
