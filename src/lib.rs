// lib.rs
// Library modules for the photo bingo game

pub mod defs;
pub mod error;
pub mod logging;
pub mod config;
pub mod card;
pub mod board;
pub mod score;
pub mod game;
pub mod terminal;
