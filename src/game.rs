// src/game.rs
// This module provides the Game struct that holds a master board and every player's
// board, and coordinates submissions so that opening a cell, detecting lines and
// recording them happen as one step per player.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::PlayerBoard;
use crate::card::{Cell, shuffle_board_cells, validate_board_structure};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::logging::log_game_event;
use crate::score::{CompletedLine, detect_completed_lines_at, new_completed_lines};

/// Result of accepting a matched photo submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Lines completed by this submission, never previously credited.
    pub new_lines: Vec<CompletedLine>,
    pub total_lines: usize,
    /// The player has reached the configured number of lines.
    pub completed: bool,
}

#[derive(Clone)]
pub struct Game {
    id: String,
    created_at: DateTime<Utc>,
    config: GameConfig,
    master: Arc<Vec<Cell>>,
    players: Arc<Mutex<HashMap<String, PlayerBoard>>>,
    winners: Arc<Mutex<Vec<String>>>,
}

impl Game {
    /// Create a game around a master board. The board must be structurally valid.
    pub fn new(master: Vec<Cell>, config: GameConfig) -> Result<Self, GameError> {
        validate_board_structure(&master)?;

        let mut rng = rand::rng();
        let id = format!("game_{:08x}", rng.random::<u32>());

        Ok(Self {
            id,
            created_at: Utc::now(),
            config,
            master: Arc::new(master),
            players: Arc::new(Mutex::new(HashMap::new())),
            winners: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_at_string(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn master_cells(&self) -> &[Cell] {
        &self.master
    }

    /// Add a player with their own copy of the master board, shuffled when configured.
    pub fn join_player(&self, player_id: &str) -> Result<PlayerBoard, GameError> {
        let mut players = self.players.lock().map_err(|_| GameError::LockPoisoned("players"))?;
        if players.contains_key(player_id) {
            return Err(GameError::PlayerAlreadyJoined(player_id.to_string()));
        }

        let cells = if self.config.shuffle_boards {
            shuffle_board_cells(&self.master)?
        } else {
            self.master.to_vec()
        };

        let board = PlayerBoard::new(cells);
        players.insert(player_id.to_string(), board.clone());
        log_game_event(&self.id, &format!("Player '{player_id}' joined ({} players)", players.len()));
        Ok(board)
    }

    /// Open the matched cell on the player's board and credit any newly completed lines.
    pub fn accept_submission(
        &self,
        player_id: &str,
        cell_id: &str,
        submission_id: &str,
    ) -> Result<SubmissionOutcome, GameError> {
        self.accept_submission_at(player_id, cell_id, submission_id, Utc::now())
    }

    pub fn accept_submission_at(
        &self,
        player_id: &str,
        cell_id: &str,
        submission_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, GameError> {
        let outcome = {
            let mut players = self.players.lock().map_err(|_| GameError::LockPoisoned("players"))?;
            // Held before the board changes so a submission is recorded fully or not at all.
            let mut winners = self.winners.lock().map_err(|_| GameError::LockPoisoned("winners"))?;
            let board = players
                .get_mut(player_id)
                .ok_or_else(|| GameError::UnknownPlayer(player_id.to_string()))?;

            let was_completed = board.completed_lines.len() >= self.config.required_lines;
            board.open_cell(cell_id, submission_id, now)?;

            let detected = detect_completed_lines_at(board, now);
            let fresh = new_completed_lines(detected, &board.completed_lines);
            let new_lines = board.record_lines(fresh);
            let total_lines = board.completed_lines.len();
            let completed = total_lines >= self.config.required_lines;

            for line in &new_lines {
                log_game_event(&self.id, &format!("Player '{player_id}' completed {line}"));
            }

            if completed && !was_completed {
                winners.push(player_id.to_string());
                log_game_event(
                    &self.id,
                    &format!("Player '{player_id}' completed the game with {total_lines} lines"),
                );
            }

            SubmissionOutcome { new_lines, total_lines, completed }
        };

        Ok(outcome)
    }

    pub fn player_board(&self, player_id: &str) -> Result<PlayerBoard, GameError> {
        let players = self.players.lock().map_err(|_| GameError::LockPoisoned("players"))?;
        players
            .get(player_id)
            .cloned()
            .ok_or_else(|| GameError::UnknownPlayer(player_id.to_string()))
    }

    /// Player ids in sorted order.
    pub fn players(&self) -> Result<Vec<String>, GameError> {
        let players = self.players.lock().map_err(|_| GameError::LockPoisoned("players"))?;
        let mut ids: Vec<String> = players.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Players that reached the required lines, in the order they got there.
    pub fn winners(&self) -> Result<Vec<String>, GameError> {
        let winners = self.winners.lock().map_err(|_| GameError::LockPoisoned("winners"))?;
        Ok(winners.clone())
    }

    pub fn is_game_completed(&self) -> Result<bool, GameError> {
        Ok(!self.winners()?.is_empty())
    }

    pub fn game_info(&self) -> Result<String, GameError> {
        Ok(format!(
            "Game[id={}, created={}, players={}, required_lines={}, completed={}]",
            self.id,
            self.created_at_string(),
            self.players()?.len(),
            self.config.required_lines,
            self.is_game_completed()?
        ))
    }

    /// Copy of the full game state, for callers that persist it.
    pub fn snapshot(&self) -> Result<SerializableGameState, GameError> {
        let players = {
            let guard = self.players.lock().map_err(|_| GameError::LockPoisoned("players"))?;
            guard.clone()
        };
        let winners = {
            let guard = self.winners.lock().map_err(|_| GameError::LockPoisoned("winners"))?;
            guard.clone()
        };

        Ok(SerializableGameState {
            id: self.id.clone(),
            created_at: self.created_at,
            required_lines: self.config.required_lines,
            master: self.master.to_vec(),
            players,
            winners,
        })
    }
}

/// Serializable version of the Game struct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableGameState {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub required_lines: usize,
    pub master: Vec<Cell>,
    pub players: HashMap<String, PlayerBoard>,
    pub winners: Vec<String>,
}

/// All running games, keyed by id.
#[derive(Clone, Default)]
pub struct GameRegistry {
    games: Arc<Mutex<HashMap<String, Game>>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_game(&self, game: Game) -> Result<(), GameError> {
        let mut games = self.games.lock().map_err(|_| GameError::LockPoisoned("game registry"))?;
        if games.contains_key(game.id()) {
            return Err(GameError::GameAlreadyExists(game.id().to_string()));
        }
        games.insert(game.id().to_string(), game);
        Ok(())
    }

    pub fn get_game(&self, game_id: &str) -> Result<Game, GameError> {
        let games = self.games.lock().map_err(|_| GameError::LockPoisoned("game registry"))?;
        games
            .get(game_id)
            .cloned()
            .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))
    }

    pub fn remove_game(&self, game_id: &str) -> Result<Game, GameError> {
        let mut games = self.games.lock().map_err(|_| GameError::LockPoisoned("game registry"))?;
        games
            .remove(game_id)
            .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))
    }

    /// `(id, info)` pairs sorted by game id.
    pub fn games_list(&self) -> Result<Vec<(String, String)>, GameError> {
        let games = self.games.lock().map_err(|_| GameError::LockPoisoned("game registry"))?;
        let mut list = games
            .values()
            .map(|game| Ok((game.id().to_string(), game.game_info()?)))
            .collect::<Result<Vec<(String, String)>, GameError>>()?;
        list.sort();
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.games.lock().map(|games| games.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
