// src/terminal.rs
// This module handles terminal input/output for the photo bingo front end.

use std::io;

use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};

use crate::board::PlayerBoard;
use crate::defs::{BOARD_SIZE, BOARDCONFIG, Position};
use crate::score::CompletedLine;

/// Fit a subject into a fixed-width column, truncating on char boundaries.
pub fn fit_subject(subject: &str, width: usize) -> String {
    let count = subject.chars().count();
    if count <= width {
        format!("{subject:<width$}")
    } else {
        let mut cut: String = subject.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

/// Render the board as text rows, open cells wrapped in brackets.
pub fn render_board(board: &PlayerBoard, colored: bool) -> Vec<String> {
    // Bold yellow for open cells
    let (open_start, open_end) = if colored { ("\x1b[1;33m[", "]\x1b[0m") } else { ("[", "]") };
    let width = BOARDCONFIG.cell_width;
    let space = " ".repeat(BOARDCONFIG.hcells_space);
    let mut rows = Vec::with_capacity(BOARD_SIZE);

    for y in 0..BOARD_SIZE {
        let row: Vec<String> = (0..BOARD_SIZE)
            .map(|x| match board.cell_at(Position::new(x, y)) {
                Some(cell) if board.is_cell_open(cell) => format!("{open_start}{}{open_end}", fit_subject(&cell.subject, width)),
                Some(cell) => format!(" {} ", fit_subject(&cell.subject, width)),
                None => format!(" {} ", fit_subject("?", width)),
            })
            .collect();
        rows.push(row.join(&space));
    }

    rows
}

pub fn print_board(board: &PlayerBoard) {
    for row in render_board(board, true) {
        println!("{row}");
    }
}

pub fn show_on_terminal(player_id: &str, board: &PlayerBoard, new_lines: &[CompletedLine], required_lines: usize) {
    println!("Player: \x1b[1;32m{player_id}\x1b[0m");
    print_board(board);

    for line in new_lines {
        println!("\x1b[1;33m{} completed!\x1b[0m", line.to_string().to_uppercase());
    }

    let total = board.completed_lines.len();
    if total >= required_lines {
        println!("\n\x1b[1;33mBINGO!!!\x1b[0m ({total} lines)");
    } else {
        println!("\nLines: {total}/{required_lines}");
    }
    println!();
}

/// Run `body` between `enter` and `leave`. `leave` runs even when `body` fails.
fn with_terminal_mode<T>(
    enter: impl FnOnce() -> io::Result<()>,
    leave: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> io::Result<T>,
) -> io::Result<T> {
    enter()?;
    let result = body();
    let left = leave();
    let value = result?;
    left?;
    Ok(value)
}

fn wait_for_key() -> io::Result<bool> {
    // Clear any pending events in the buffer
    while event::poll(std::time::Duration::from_millis(0))? {
        event::read()?;
    }

    loop {
        if let Event::Key(key_event) = event::read()? {
            // Only process key press events, not key release events
            if key_event.kind == event::KeyEventKind::Press {
                return Ok(key_event.code == KeyCode::Esc);
            }
        }
    }
}

/// Wait for a key press. Returns true if ESC was pressed.
pub fn hitkey() -> io::Result<bool> {
    println!("\nPress any key to continue or ESC to exit");
    with_terminal_mode(enable_raw_mode, disable_raw_mode, wait_for_key)
}
