// src/board.rs
// This module handles a player's personalized board: cell layout, open/closed state
// and the history of lines already credited to the player.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Cell;
use crate::defs::Position;
use crate::error::BoardError;
use crate::score::{CompletedLine, LineKey};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellState {
    pub is_open: bool,
    pub opened_at: Option<DateTime<Utc>>,
    pub opened_by_submission_id: Option<String>,
}

impl CellState {
    pub fn opened(submission_id: impl Into<String>, opened_at: DateTime<Utc>) -> Self {
        CellState {
            is_open: true,
            opened_at: Some(opened_at),
            opened_by_submission_id: Some(submission_id.into()),
        }
    }
}

// A player's view of the game. Missing cell states mean closed; the FREE cell
// never gets a state and always counts as open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBoard {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub cell_states: HashMap<String, CellState>,
    #[serde(default)]
    pub completed_lines: Vec<CompletedLine>,
}

impl PlayerBoard {
    pub fn new(cells: Vec<Cell>) -> Self {
        PlayerBoard {
            cells,
            cell_states: HashMap::new(),
            completed_lines: Vec::new(),
        }
    }

    pub fn cell(&self, cell_id: &str) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id == cell_id)
    }

    pub fn cell_at(&self, position: Position) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.position == position)
    }

    pub fn is_cell_open(&self, cell: &Cell) -> bool {
        cell.is_free
            || self
                .cell_states
                .get(&cell.id)
                .is_some_and(|state| state.is_open)
    }

    /// Number of open cells, FREE included.
    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|cell| self.is_cell_open(cell)).count()
    }

    /// Cells that can still be matched by a submission.
    pub fn closed_cells(&self) -> Vec<&Cell> {
        self.cells.iter().filter(|cell| !self.is_cell_open(cell)).collect()
    }

    /// Mark a cell as matched by a submission. A cell opens at most once.
    pub fn open_cell(&mut self, cell_id: &str, submission_id: &str, now: DateTime<Utc>) -> Result<(), BoardError> {
        let cell = self
            .cell(cell_id)
            .ok_or_else(|| BoardError::UnknownCell(cell_id.to_string()))?;

        if cell.is_free {
            return Err(BoardError::FreeCellAlwaysOpen(cell_id.to_string()));
        }
        if self.is_cell_open(cell) {
            return Err(BoardError::CellAlreadyOpen(cell_id.to_string()));
        }

        self.cell_states
            .insert(cell_id.to_string(), CellState::opened(submission_id, now));
        Ok(())
    }

    pub fn has_line(&self, key: LineKey) -> bool {
        self.completed_lines.iter().any(|line| line.key() == key)
    }

    /// Append the lines not yet in the history and return the ones appended.
    pub fn record_lines(&mut self, lines: Vec<CompletedLine>) -> Vec<CompletedLine> {
        let mut appended = Vec::new();
        for line in lines {
            if !self.has_line(line.key()) {
                self.completed_lines.push(line.clone());
                appended.push(line);
            }
        }
        appended
    }
}
