// src/config/mod.rs
// All tunables come from the environment (.env supported); defaults keep a
// dev instance runnable with nothing set except model credentials.

use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // ── Server
    pub host: String,
    pub port: u16,
    pub cors_origin: String,

    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Completion defaults
    pub default_model: String,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
    pub default_top_p: f32,
    pub request_timeout: u64,

    // ── History
    pub history_prompt_limit: usize,
    pub history_default_limit: usize,
    pub history_max_limit: usize,

    // ── Logging
    pub log_level: String,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            // Values may carry inline comments or stray whitespace.
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            host: env_var_or("LVTONG_HOST", "0.0.0.0".to_string()),
            port: env_var_or("LVTONG_PORT", 8000),
            cors_origin: env_var_or("LVTONG_CORS_ORIGIN", "*".to_string()),
            database_url: env_var_or("DATABASE_URL", "sqlite:./lvtong.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 5),
            default_model: env_var_or("LVTONG_DEFAULT_MODEL", "4o".to_string()),
            default_temperature: env_var_or("LVTONG_DEFAULT_TEMPERATURE", 0.7),
            default_max_tokens: env_var_or("LVTONG_DEFAULT_MAX_TOKENS", 2048),
            default_top_p: env_var_or("LVTONG_DEFAULT_TOP_P", 1.0),
            request_timeout: env_var_or("LVTONG_REQUEST_TIMEOUT", 60),
            history_prompt_limit: env_var_or("LVTONG_HISTORY_PROMPT_LIMIT", 20),
            history_default_limit: env_var_or("LVTONG_HISTORY_DEFAULT_LIMIT", 30),
            history_max_limit: env_var_or("LVTONG_HISTORY_MAX_LIMIT", 100),
            log_level: env_var_or("LVTONG_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::from_env();
        assert!(!config.database_url.is_empty());
        assert!(config.history_default_limit <= config.history_max_limit);
        assert!(config.default_temperature >= 0.0);
        assert!(config.bind_address().contains(':'));
    }

    #[test]
    fn env_var_or_recovers_from_garbage() {
        unsafe { std::env::set_var("LVTONG_TEST_GARBAGE", "not-a-number") };
        let parsed: u16 = env_var_or("LVTONG_TEST_GARBAGE", 42);
        assert_eq!(parsed, 42);
        unsafe { std::env::remove_var("LVTONG_TEST_GARBAGE") };

        unsafe { std::env::set_var("LVTONG_TEST_COMMENTED", "7 # seven") };
        let parsed: u16 = env_var_or("LVTONG_TEST_COMMENTED", 42);
        assert_eq!(parsed, 7);
        unsafe { std::env::remove_var("LVTONG_TEST_COMMENTED") };
    }
}
