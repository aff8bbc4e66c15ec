// src/card.rs
// Master board cells: construction, per-player shuffling and structural validation.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::defs::{CELLS_PER_BOARD, CENTER, Position};
use crate::error::BoardError;

pub const DEFAULT_FREE_SUBJECT: &str = "FREE";

/// One square of a bingo board.
///
/// The `id` and `subject` pair is owned by the master board and never changes;
/// a player's board only differs from the master in the `position` of each cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub id: String,
    pub position: Position,
    pub subject: String,
    #[serde(default)]
    pub is_free: bool,
}

impl Cell {
    pub fn new(id: impl Into<String>, position: Position, subject: impl Into<String>, is_free: bool) -> Self {
        Cell {
            id: id.into(),
            position,
            subject: subject.into(),
            is_free,
        }
    }
}

/// Build a master board from the 24 subjects of the non-FREE cells.
///
/// Cells are laid out in row-major order with ids `cell_0` .. `cell_24`;
/// the center slot (`cell_12`) is reserved for the FREE cell.
pub fn master_board_from_subjects(subjects: &[String], free_subject: &str) -> Result<Vec<Cell>, BoardError> {
    if subjects.len() != CELLS_PER_BOARD - 1 {
        return Err(BoardError::InvalidBoardSize {
            expected: CELLS_PER_BOARD,
            actual: subjects.len() + 1,
        });
    }

    let mut subjects = subjects.iter();
    let mut cells = Vec::with_capacity(CELLS_PER_BOARD);
    for index in 0..CELLS_PER_BOARD {
        let position = Position::from_index(index);
        let id = format!("cell_{index}");
        if position == CENTER {
            cells.push(Cell::new(id, position, free_subject, true));
        } else if let Some(subject) = subjects.next() {
            cells.push(Cell::new(id, position, subject.as_str(), false));
        }
    }

    Ok(cells)
}

/// Shuffle a board using the thread-local random generator.
pub fn shuffle_board_cells(cells: &[Cell]) -> Result<Vec<Cell>, BoardError> {
    shuffle_board_cells_with_rng(cells, &mut rng())
}

/// Permute the positions of every non-FREE cell and pin the FREE cell to the center.
///
/// Input positions must be on the board and distinct. Only the coordinates are
/// shuffled: each output cell keeps its id, subject and FREE flag. The input slice
/// is left untouched.
pub fn shuffle_board_cells_with_rng<R: Rng + ?Sized>(cells: &[Cell], rng: &mut R) -> Result<Vec<Cell>, BoardError> {
    if cells.len() != CELLS_PER_BOARD {
        return Err(BoardError::InvalidBoardSize {
            expected: CELLS_PER_BOARD,
            actual: cells.len(),
        });
    }

    let free_cells = cells.iter().filter(|cell| cell.is_free).count();
    if free_cells != 1 {
        return Err(BoardError::MissingFreeCell { found: free_cells });
    }
    map_positions(cells)?;

    // A FREE cell placed off-center hands its slot to whichever cell sat in the center.
    let free_position = cells
        .iter()
        .find(|cell| cell.is_free)
        .map_or(CENTER, |cell| cell.position);
    let mut positions: Vec<Position> = cells
        .iter()
        .filter(|cell| !cell.is_free)
        .map(|cell| if cell.position == CENTER { free_position } else { cell.position })
        .collect();
    positions.shuffle(rng);

    let mut positions = positions.into_iter();
    let shuffled = cells
        .iter()
        .map(|cell| {
            let position = if cell.is_free {
                CENTER
            } else {
                // 24 positions for 24 non-FREE cells
                positions.next().unwrap_or(cell.position)
            };
            Cell { position, ..cell.clone() }
        })
        .collect();

    Ok(shuffled)
}

/// Check that the cells form a complete 5x5 board with the FREE cell in the center.
pub fn is_valid_board_structure(cells: &[Cell]) -> bool {
    check_grid(cells).is_ok()
}

/// Like [`is_valid_board_structure`] but reports the first problem found, and
/// additionally requires unique ids and a single FREE cell.
pub fn validate_board_structure(cells: &[Cell]) -> Result<(), BoardError> {
    check_grid(cells)?;

    let mut ids = HashSet::with_capacity(cells.len());
    for cell in cells {
        if !ids.insert(cell.id.as_str()) {
            return Err(BoardError::DuplicateCellId(cell.id.clone()));
        }
    }

    let free_cells = cells.iter().filter(|cell| cell.is_free).count();
    if free_cells != 1 {
        return Err(BoardError::MissingFreeCell { found: free_cells });
    }

    Ok(())
}

fn check_grid(cells: &[Cell]) -> Result<(), BoardError> {
    if cells.len() != CELLS_PER_BOARD {
        return Err(BoardError::InvalidBoardSize {
            expected: CELLS_PER_BOARD,
            actual: cells.len(),
        });
    }

    // With 25 cells, 25 distinct on-board positions cover the whole grid.
    let by_position = map_positions(cells)?;
    match by_position.get(&CENTER) {
        Some(center) if center.is_free => Ok(()),
        _ => Err(BoardError::CenterNotFree(CENTER)),
    }
}

/// Index cells by position, rejecting off-board and shared positions.
fn map_positions(cells: &[Cell]) -> Result<HashMap<Position, &Cell>, BoardError> {
    let mut by_position: HashMap<Position, &Cell> = HashMap::with_capacity(cells.len());
    for cell in cells {
        if !cell.position.is_on_board() {
            return Err(BoardError::PositionOutOfRange {
                id: cell.id.clone(),
                position: cell.position,
            });
        }
        if by_position.insert(cell.position, cell).is_some() {
            return Err(BoardError::DuplicatePosition(cell.position));
        }
    }

    Ok(by_position)
}
