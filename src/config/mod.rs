//! Configuration module for the FPV builder backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Insert the starter catalog into an empty database
    pub seed_catalog: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("FPV_DB_PATH")
            .unwrap_or_else(|_| "./data/fpv.sqlite".to_string())
            .into();

        let bind_addr_raw =
            env::var("FPV_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_addr_raw.parse().map_err(|_| {
            AppError::Internal(format!("Invalid FPV_BIND_ADDR format: {}", bind_addr_raw))
        })?;

        let log_level = env::var("FPV_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_json = env_flag("FPV_LOG_JSON", false)?;
        let seed_catalog = env_flag("FPV_SEED_CATALOG", true)?;

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_json,
            seed_catalog,
        })
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool, AppError> {
    match env::var(name) {
        Ok(value) => parse_flag(&value)
            .ok_or_else(|| AppError::Internal(format!("Invalid {} value: {}", name, value))),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("FPV_DB_PATH");
        env::remove_var("FPV_BIND_ADDR");
        env::remove_var("FPV_LOG_LEVEL");
        env::remove_var("FPV_LOG_JSON");
        env::remove_var("FPV_SEED_CATALOG");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/fpv.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.seed_catalog);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
