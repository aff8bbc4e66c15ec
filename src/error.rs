// src/error.rs
// Error kinds raised by board handling and by the game state container.

use thiserror::Error;

use crate::defs::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid board size: expected {expected} cells, got {actual}")]
    InvalidBoardSize { expected: usize, actual: usize },
    #[error("board must contain exactly one FREE cell, found {found}")]
    MissingFreeCell { found: usize },
    #[error("cell {id} has position {position} outside the board")]
    PositionOutOfRange { id: String, position: Position },
    #[error("position {0} is occupied by more than one cell")]
    DuplicatePosition(Position),
    #[error("center cell at {0} is not the FREE cell")]
    CenterNotFree(Position),
    #[error("cell id {0} appears more than once")]
    DuplicateCellId(String),
    #[error("unknown cell: {0}")]
    UnknownCell(String),
    #[error("cell {0} is already open")]
    CellAlreadyOpen(String),
    #[error("cell {0} is the FREE cell and is always open")]
    FreeCellAlwaysOpen(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("unknown player: {0}")]
    UnknownPlayer(String),
    #[error("player {0} already joined the game")]
    PlayerAlreadyJoined(String),
    #[error("game not found: {0}")]
    GameNotFound(String),
    #[error("game {0} already exists")]
    GameAlreadyExists(String),
    #[error("failed to acquire {0} lock")]
    LockPoisoned(&'static str),
}
