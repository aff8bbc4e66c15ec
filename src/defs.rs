// src/defs.rs
// Board geometry shared by the shuffler, the validator and the line detector.

use serde::{Deserialize, Serialize};

pub struct BoardStruct {
    pub size: usize,
    pub hcells_space: usize,
    pub cell_width: usize,
}

pub const BOARDCONFIG: BoardStruct = BoardStruct {
    size: 5,         // number of rows and columns in a board
    hcells_space: 1, // space between cells in the same row when printed
    cell_width: 14,  // printed width of a cell subject
};

pub const BOARD_SIZE: usize = BOARDCONFIG.size;
pub const CELLS_PER_BOARD: usize = BOARD_SIZE * BOARD_SIZE;
pub const CENTER: Position = Position { x: BOARD_SIZE / 2, y: BOARD_SIZE / 2 };
// 5 rows + 5 columns + 2 diagonals
pub const MAX_LINES: usize = 2 * BOARD_SIZE + 2;

/// Grid coordinate of a cell, `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    pub fn is_on_board(&self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    pub fn from_index(index: usize) -> Self {
        Position { x: index % BOARD_SIZE, y: index / BOARD_SIZE }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_middle_of_board() {
        assert_eq!(CENTER, Position::new(2, 2));
        assert_eq!(CELLS_PER_BOARD, 25);
        assert_eq!(MAX_LINES, 12);
    }

    #[test]
    fn test_position_from_index() {
        assert_eq!(Position::from_index(8), Position::new(3, 1));
        assert_eq!(Position::from_index(12), CENTER);
    }

    #[test]
    fn test_position_on_board() {
        assert!(Position::new(4, 4).is_on_board());
        assert!(!Position::new(5, 0).is_on_board());
        assert!(!Position::new(0, 5).is_on_board());
    }
}
