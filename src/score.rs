// src/score.rs
// This module handles line detection for player boards: which rows, columns and
// diagonals are fully open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::PlayerBoard;
use crate::defs::{BOARD_SIZE, MAX_LINES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Row,
    Column,
    Diagonal,
}

impl std::fmt::Display for LineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LineType::Row => "row",
            LineType::Column => "column",
            LineType::Diagonal => "diagonal",
        };
        f.write_str(name)
    }
}

/// Identity of a line on the board, used to deduplicate detections against history.
pub type LineKey = (LineType, usize);

pub const MAIN_DIAGONAL: usize = 0;
pub const ANTI_DIAGONAL: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLine {
    #[serde(rename = "type")]
    pub line_type: LineType,
    // row/column number, or MAIN_DIAGONAL / ANTI_DIAGONAL
    pub index: usize,
    pub completed_at: DateTime<Utc>,
}

impl CompletedLine {
    pub fn new(line_type: LineType, index: usize, completed_at: DateTime<Utc>) -> Self {
        CompletedLine { line_type, index, completed_at }
    }

    pub fn key(&self) -> LineKey {
        (self.line_type, self.index)
    }
}

impl std::fmt::Display for CompletedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line_type, self.index) {
            (LineType::Diagonal, MAIN_DIAGONAL) => f.write_str("diagonal \\"),
            (LineType::Diagonal, _) => f.write_str("diagonal /"),
            (line_type, index) => write!(f, "{line_type} {index}"),
        }
    }
}

/// Compute every line that is currently complete on the board.
pub fn detect_completed_lines(board: &PlayerBoard) -> Vec<CompletedLine> {
    detect_completed_lines_at(board, Utc::now())
}

/// Same as [`detect_completed_lines`] with the detection time supplied by the caller.
///
/// Lines are reported rows first, then columns, then the main and anti diagonal.
/// The board's own `completed_lines` history is neither read nor modified.
pub fn detect_completed_lines_at(board: &PlayerBoard, now: DateTime<Utc>) -> Vec<CompletedLine> {
    // grid[y][x]
    let mut grid = [[false; BOARD_SIZE]; BOARD_SIZE];
    for cell in &board.cells {
        if cell.position.is_on_board() {
            grid[cell.position.y][cell.position.x] = board.is_cell_open(cell);
        }
    }

    let mut lines = Vec::with_capacity(MAX_LINES);

    for (y, row) in grid.iter().enumerate() {
        if row.iter().all(|&open| open) {
            lines.push(CompletedLine::new(LineType::Row, y, now));
        }
    }

    for x in 0..BOARD_SIZE {
        if grid.iter().all(|row| row[x]) {
            lines.push(CompletedLine::new(LineType::Column, x, now));
        }
    }

    if (0..BOARD_SIZE).all(|i| grid[i][i]) {
        lines.push(CompletedLine::new(LineType::Diagonal, MAIN_DIAGONAL, now));
    }

    if (0..BOARD_SIZE).all(|i| grid[i][BOARD_SIZE - 1 - i]) {
        lines.push(CompletedLine::new(LineType::Diagonal, ANTI_DIAGONAL, now));
    }

    lines
}

/// Keep only the detected lines whose `(type, index)` is not already in `history`.
pub fn new_completed_lines(detected: Vec<CompletedLine>, history: &[CompletedLine]) -> Vec<CompletedLine> {
    detected
        .into_iter()
        .filter(|line| !history.iter().any(|known| known.key() == line.key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Cell, DEFAULT_FREE_SUBJECT, master_board_from_subjects, shuffle_board_cells_with_rng};
    use crate::defs::Position;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn master_cells() -> Vec<Cell> {
        let subjects: Vec<String> = (0..24).map(|i| format!("Subject {i}")).collect();
        master_board_from_subjects(&subjects, DEFAULT_FREE_SUBJECT).unwrap()
    }

    fn open_where(board: &mut PlayerBoard, predicate: impl Fn(Position) -> bool) {
        let ids: Vec<String> = board
            .cells
            .iter()
            .filter(|cell| !cell.is_free && predicate(cell.position))
            .map(|cell| cell.id.clone())
            .collect();
        for id in ids {
            board.open_cell(&id, "sub", Utc::now()).unwrap();
        }
    }

    fn keys(lines: &[CompletedLine]) -> Vec<LineKey> {
        lines.iter().map(CompletedLine::key).collect()
    }

    #[test]
    fn test_free_only_board_has_no_lines() {
        let board = PlayerBoard::new(master_cells());
        assert!(detect_completed_lines(&board).is_empty());
    }

    #[test]
    fn test_single_row_yields_that_row() {
        for r in 0..BOARD_SIZE {
            let mut board = PlayerBoard::new(master_cells());
            open_where(&mut board, |pos| pos.y == r);
            assert_eq!(keys(&detect_completed_lines(&board)), vec![(LineType::Row, r)]);
        }
    }

    #[test]
    fn test_single_column_yields_that_column() {
        for c in 0..BOARD_SIZE {
            let mut board = PlayerBoard::new(master_cells());
            open_where(&mut board, |pos| pos.x == c);
            assert_eq!(keys(&detect_completed_lines(&board)), vec![(LineType::Column, c)]);
        }
    }

    #[test]
    fn test_diagonals() {
        let mut board = PlayerBoard::new(master_cells());
        open_where(&mut board, |pos| pos.x == pos.y);
        assert_eq!(keys(&detect_completed_lines(&board)), vec![(LineType::Diagonal, MAIN_DIAGONAL)]);

        let mut board = PlayerBoard::new(master_cells());
        open_where(&mut board, |pos| pos.x + pos.y == BOARD_SIZE - 1);
        assert_eq!(keys(&detect_completed_lines(&board)), vec![(LineType::Diagonal, ANTI_DIAGONAL)]);
    }

    #[test]
    fn test_full_board_yields_twelve_unique_lines() {
        let mut board = PlayerBoard::new(master_cells());
        open_where(&mut board, |_| true);
        let lines = detect_completed_lines(&board);
        assert_eq!(lines.len(), MAX_LINES);

        let unique: HashSet<LineKey> = lines.iter().map(CompletedLine::key).collect();
        assert_eq!(unique.len(), 12);
        assert_eq!(lines.iter().filter(|l| l.line_type == LineType::Row).count(), 5);
        assert_eq!(lines.iter().filter(|l| l.line_type == LineType::Column).count(), 5);
        assert_eq!(lines.iter().filter(|l| l.line_type == LineType::Diagonal).count(), 2);
    }

    #[test]
    fn test_enumeration_order() {
        let mut board = PlayerBoard::new(master_cells());
        open_where(&mut board, |_| true);
        let order = keys(&detect_completed_lines(&board));
        assert_eq!(order[0], (LineType::Row, 0));
        assert_eq!(order[5], (LineType::Column, 0));
        assert_eq!(order[10], (LineType::Diagonal, MAIN_DIAGONAL));
        assert_eq!(order[11], (LineType::Diagonal, ANTI_DIAGONAL));
    }

    #[test]
    fn test_missing_one_cell_breaks_the_line() {
        let mut board = PlayerBoard::new(master_cells());
        open_where(&mut board, |pos| pos.y == 0 && pos.x != 3);
        assert!(detect_completed_lines(&board).is_empty());
    }

    #[test]
    fn test_same_timestamp_for_all_lines() {
        let mut board = PlayerBoard::new(master_cells());
        open_where(&mut board, |_| true);
        let now = Utc::now();
        let lines = detect_completed_lines_at(&board, now);
        assert!(lines.iter().all(|line| line.completed_at == now));
    }

    #[test]
    fn test_detection_ignores_history() {
        let mut board = PlayerBoard::new(master_cells());
        open_where(&mut board, |pos| pos.y == 4);
        let first = detect_completed_lines(&board);
        board.record_lines(first.clone());

        let second = detect_completed_lines(&board);
        assert_eq!(keys(&first), keys(&second));
        assert_eq!(board.completed_lines.len(), 1);
    }

    #[test]
    fn test_detection_is_shuffle_invariant() {
        let master = master_cells();
        let mut rng = StdRng::seed_from_u64(3);
        let shuffled = shuffle_board_cells_with_rng(&master, &mut rng).unwrap();

        let mut plain = PlayerBoard::new(master);
        let mut mixed = PlayerBoard::new(shuffled);
        open_where(&mut plain, |pos| pos.y == 1);
        open_where(&mut mixed, |pos| pos.y == 1);

        assert_eq!(keys(&detect_completed_lines(&plain)), vec![(LineType::Row, 1)]);
        assert_eq!(keys(&detect_completed_lines(&mixed)), vec![(LineType::Row, 1)]);
    }

    #[test]
    fn test_new_completed_lines_filters_history() {
        let now = Utc::now();
        let history = vec![CompletedLine::new(LineType::Row, 2, now)];
        let detected = vec![
            CompletedLine::new(LineType::Row, 2, now),
            CompletedLine::new(LineType::Column, 2, now),
        ];
        assert_eq!(keys(&new_completed_lines(detected, &history)), vec![(LineType::Column, 2)]);
    }

    #[test]
    fn test_completed_line_json_format() {
        let line = CompletedLine::new(LineType::Diagonal, ANTI_DIAGONAL, Utc::now());
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["type"], "diagonal");
        assert_eq!(value["index"], 1);
        assert!(value.get("completedAt").is_some());
        assert_eq!(line.to_string(), "diagonal /");
        assert_eq!(CompletedLine::new(LineType::Row, 3, Utc::now()).to_string(), "row 3");
    }
}
