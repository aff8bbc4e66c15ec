use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::card::DEFAULT_FREE_SUBJECT;
use crate::defs::MAX_LINES;
use crate::logging::{log_info, log_warning};

pub const DEFAULT_CONFIG_PATH: &str = "conf/game.conf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Lines a player needs before their game counts as completed.
    pub required_lines: usize,
    /// Give every player their own shuffled copy of the master board.
    pub shuffle_boards: bool,
    pub free_subject: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            required_lines: 1,
            shuffle_boards: true,
            free_subject: DEFAULT_FREE_SUBJECT.to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_str_config(&content)
    }

    pub fn from_str_config(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config_map = parse_config(content)?;
        let defaults = Self::default();

        let required_lines = match config_map.get("required_lines") {
            Some(value) => value.parse::<usize>()?,
            None => defaults.required_lines,
        };
        if required_lines == 0 || required_lines > MAX_LINES {
            return Err(format!("required_lines must be between 1 and {MAX_LINES}, got {required_lines}").into());
        }

        let shuffle_boards = match config_map.get("shuffle_boards") {
            Some(value) => value.parse::<bool>()?,
            None => defaults.shuffle_boards,
        };

        let free_subject = config_map
            .get("free_subject")
            .filter(|subject| !subject.is_empty())
            .cloned()
            .unwrap_or(defaults.free_subject);

        Ok(GameConfig { required_lines, shuffle_boards, free_subject })
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                log_info(&format!("Loaded game configuration from {}", path.display()));
                config
            }
            Err(e) => {
                log_warning(&format!("Could not load game config from {}: {}. Using defaults.", path.display(), e));
                Self::default()
            }
        }
    }
}

fn parse_config(content: &str) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut config = HashMap::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                config.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => return Err(format!("line {}: expected key = value", number + 1).into()),
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let content = r#"
            # This is a comment
            required_lines = 3
            shuffle_boards = false
            # Another comment
            free_subject = Smile!
        "#;

        let config = parse_config(content).unwrap();
        assert_eq!(config.get("required_lines"), Some(&"3".to_string()));
        assert_eq!(config.get("shuffle_boards"), Some(&"false".to_string()));
        assert_eq!(config.get("free_subject"), Some(&"Smile!".to_string()));
    }

    #[test]
    fn test_parse_config_rejects_garbage_line() {
        assert!(parse_config("required_lines 3").is_err());
    }

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.required_lines, 1);
        assert!(config.shuffle_boards);
        assert_eq!(config.free_subject, "FREE");
    }

    #[test]
    fn test_game_config_from_str() {
        let config = GameConfig::from_str_config("required_lines = 2\nshuffle_boards = false\n").unwrap();
        assert_eq!(config.required_lines, 2);
        assert!(!config.shuffle_boards);
        assert_eq!(config.free_subject, "FREE");
    }

    #[test]
    fn test_game_config_rejects_bad_values() {
        assert!(GameConfig::from_str_config("required_lines = 0").is_err());
        assert!(GameConfig::from_str_config("required_lines = 13").is_err());
        assert!(GameConfig::from_str_config("required_lines = many").is_err());
        assert!(GameConfig::from_str_config("shuffle_boards = maybe").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = GameConfig::load_or_default("does/not/exist.conf");
        assert_eq!(config, GameConfig::default());
    }
}
