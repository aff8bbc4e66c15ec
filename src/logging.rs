// src/logging.rs
// Timestamped console logging for the game layer and the command line front end.

use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Build a log line: `YYYY-mm-dd HH:MM:SS - LEVEL - message`.
pub fn format_log_line(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("{} - {} - {}", timestamp, level.as_str(), message)
}

pub fn log_message(level: LogLevel, message: &str) {
    println!("{}", format_log_line(level, message));
}

pub fn log_info(message: &str) {
    log_message(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_message(LogLevel::Warning, message);
}

/// Error line on stderr, for failures that end the program.
pub fn log_error_stderr(message: &str) {
    eprintln!("{}", format_log_line(LogLevel::Error, message));
}

/// Info line prefixed with the game it belongs to.
pub fn log_game_event(game_id: &str, message: &str) {
    log_info(&format!("[{game_id}] {message}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_log_line() {
        let line = format_log_line(LogLevel::Warning, "row 2 completed");
        let parts: Vec<&str> = line.splitn(3, " - ").collect();
        assert_eq!(parts.len(), 3);
        // "YYYY-mm-dd HH:MM:SS"
        assert_eq!(parts[0].len(), 19);
        assert_eq!(parts[1], "WARNING");
        assert_eq!(parts[2], "row 2 completed");
    }
}
