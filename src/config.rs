//! Application configuration.
//!
//! Runtime settings come from `config.toml`, then `.env`/environment, then
//! defaults. Scheduler tuning values are compile-time constants.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== File Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerConfig {
    addr: Option<String>,
    port: Option<u16>,
}

/// Resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub server_addr: String,
    pub server_port: u16,
}

impl AppConfig {
    /// Load settings with priority: config.toml > environment > default
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let file = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(contents) => parse_file_config(&contents),
            Err(_) => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = match file.database.and_then(|d| d.path) {
            Some(path) => {
                tracing::info!("Using database from {}: {}", CONFIG_FILE, path);
                PathBuf::from(path)
            }
            None => match env("DATABASE_PATH") {
                Some(path) => {
                    tracing::info!("Using database from DATABASE_PATH env: {}", path);
                    PathBuf::from(path)
                }
                None => PathBuf::from(DEFAULT_DATABASE_PATH),
            },
        };

        let server = file.server.unwrap_or_default();
        let server_addr = server
            .addr
            .or_else(|| env("SERVER_ADDR"))
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_port = server
            .port
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_SERVER_PORT);

        Self {
            database_path,
            server_addr,
            server_port,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

fn parse_file_config(contents: &str) -> FileConfig {
    match toml::from_str::<FileConfig>(contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", CONFIG_FILE, e);
            FileConfig::default()
        }
    }
}

pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_DATABASE_PATH: &str = "data/recall.db";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// ==================== Session Configuration ====================

/// Study session expiration time in hours of inactivity
pub const SESSION_EXPIRY_HOURS: i64 = 6;

// ==================== SM-2 ====================

/// Ease factor assigned to new cards
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Ease factor never drops below this
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Longest interval ever scheduled (about 100 years). Keeps review dates
/// inside chrono's range and below year 9999 for the stored timestamp text.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

// ==================== Forgetting Rate Correction ====================

/// Trailing window for the forgetting rate, in days
pub const FORGETTING_WINDOW_DAYS: i64 = 30;

/// Above this forgetting rate ease growth is damped
pub const HIGH_FORGET_RATE: f64 = 0.35;

/// Below this forgetting rate ease growth is boosted
pub const LOW_FORGET_RATE: f64 = 0.15;

pub const EASE_DAMPING: f64 = 0.9;
pub const EASE_BOOST: f64 = 1.1;

// ==================== Retention Correction ====================

pub const WEAK_RETENTION_SCORE: f64 = 40.0;
pub const STRONG_RETENTION_SCORE: f64 = 80.0;
pub const WEAK_RETENTION_MULTIPLIER: f64 = 0.8;
pub const STRONG_RETENTION_MULTIPLIER: f64 = 1.2;

// ==================== Due Set ====================

/// Scheduled cards at or above this priority are due early
pub const DUE_PRIORITY_THRESHOLD: f64 = 0.6;

/// Priority reported for cards with no successful review
pub const NEW_CARD_PRIORITY: f64 = 100.0;

/// Lower bound on the memory-strength proxy used for decay
pub const MIN_MEMORY_STRENGTH: f64 = 0.1;

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(FileConfig::default(), no_env);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_file_overrides_env() {
        let file = parse_file_config(
            r#"
            [database]
            path = "/tmp/from_file.db"

            [server]
            port = 8080
            "#,
        );
        let env = |key: &str| match key {
            "DATABASE_PATH" => Some("/tmp/from_env.db".to_string()),
            "PORT" => Some("9090".to_string()),
            "SERVER_ADDR" => Some("127.0.0.1".to_string()),
            _ => None,
        };
        let config = AppConfig::resolve(file, env);
        assert_eq!(config.database_path, PathBuf::from("/tmp/from_file.db"));
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_addr, "127.0.0.1");
    }

    #[test]
    fn test_env_used_without_file() {
        let env = |key: &str| match key {
            "DATABASE_PATH" => Some("/tmp/env.db".to_string()),
            "PORT" => Some("not-a-port".to_string()),
            _ => None,
        };
        let config = AppConfig::resolve(FileConfig::default(), env);
        assert_eq!(config.database_path, PathBuf::from("/tmp/env.db"));
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let file = parse_file_config("[database\npath = ");
        assert!(file.database.is_none());
    }
}
