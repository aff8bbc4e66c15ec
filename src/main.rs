// src/main.rs
//
// Command line front end for photo bingo boards.
//
// Commands:
// - validate: check that a board file is a valid 5x5 board with the FREE cell in the center
// - shuffle: print a per-player shuffled copy of a board as JSON
// - new-board: build a board file from 24 subject lines
// - play: simulate a game where random cells get matched until a player reaches the required lines

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{SeedableRng, rng};

use photo_bingo::card::{Cell, master_board_from_subjects, shuffle_board_cells_with_rng, validate_board_structure};
use photo_bingo::config::{DEFAULT_CONFIG_PATH, GameConfig};
use photo_bingo::game::Game;
use photo_bingo::logging::{log_error_stderr, log_info};
use photo_bingo::terminal;

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Photo Bingo - board validation, shuffling and game simulation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Game configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a board file
    Validate { board: PathBuf },
    /// Print a shuffled copy of a board
    Shuffle {
        board: PathBuf,
        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build a board from a file with one subject per line
    NewBoard {
        subjects: PathBuf,
        /// Subject of the center cell, defaults to the configured one
        #[arg(long)]
        free_subject: Option<String>,
    },
    /// Simulate a game on a board
    Play {
        board: PathBuf,
        #[arg(long, default_value_t = 2)]
        players: usize,
        /// Seed for the simulated photo matches
        #[arg(long)]
        seed: Option<u64>,
        /// Wait for a key press after every round
        #[arg(long)]
        step: bool,
    },
}

fn load_board(path: &Path) -> Result<Vec<Cell>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    let cells: Vec<Cell> = serde_json::from_str(&content)?;
    Ok(cells)
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rng()),
    }
}

fn run_validate(board: &Path) -> Result<(), Box<dyn Error>> {
    let cells = load_board(board)?;
    validate_board_structure(&cells)?;
    println!("{}: valid board", board.display());
    Ok(())
}

fn run_shuffle(board: &Path, seed: Option<u64>) -> Result<(), Box<dyn Error>> {
    let cells = load_board(board)?;
    let shuffled = shuffle_board_cells_with_rng(&cells, &mut seeded_rng(seed))?;
    println!("{}", serde_json::to_string_pretty(&shuffled)?);
    Ok(())
}

fn run_new_board(subjects: &Path, free_subject: &str) -> Result<(), Box<dyn Error>> {
    let content = fs::read_to_string(subjects)?;
    let subjects: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    let cells = master_board_from_subjects(&subjects, free_subject)?;
    println!("{}", serde_json::to_string_pretty(&cells)?);
    Ok(())
}

fn run_play(board: &Path, config: GameConfig, players: usize, seed: Option<u64>, step: bool) -> Result<(), Box<dyn Error>> {
    let required_lines = config.required_lines;
    let game = Game::new(load_board(board)?, config)?;
    log_info(&format!("Created new game instance: {}", game.game_info()?));

    let player_ids: Vec<String> = (1..=players.max(1)).map(|i| format!("player_{i}")).collect();
    for player_id in &player_ids {
        game.join_player(player_id)?;
    }

    let mut rng = seeded_rng(seed);
    let mut round = 0;
    let mut submission = 0;

    while !game.is_game_completed()? {
        round += 1;
        println!("=== ROUND {round} ===");
        let mut matched_any = false;

        for player_id in &player_ids {
            let board = game.player_board(player_id)?;
            let Some(cell) = board.closed_cells().choose(&mut rng).map(|cell| cell.id.clone()) else {
                continue;
            };

            submission += 1;
            let outcome = game.accept_submission(player_id, &cell, &format!("submission_{submission}"))?;
            matched_any = true;
            terminal::show_on_terminal(player_id, &game.player_board(player_id)?, &outcome.new_lines, required_lines);
        }

        if !matched_any || (step && terminal::hitkey()?) {
            break;
        }
    }

    let winners = game.winners()?;
    if winners.is_empty() {
        log_info("Game ended without a winner");
    } else {
        log_info(&format!("Game completed after {round} rounds, winners: {}", winners.join(", ")));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = GameConfig::load_or_default(&args.config);

    let result = match args.command {
        Command::Validate { board } => run_validate(&board),
        Command::Shuffle { board, seed } => run_shuffle(&board, seed),
        Command::NewBoard { subjects, free_subject } => {
            let free_subject = free_subject.unwrap_or_else(|| config.free_subject.clone());
            run_new_board(&subjects, &free_subject)
        }
        Command::Play { board, players, seed, step } => run_play(&board, config, players, seed, step),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error_stderr(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
