use std::{env, net::SocketAddr};

use thiserror::Error;

use crate::domain::utils::DEFAULT_JOURNAL_LIMIT;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub default_journal_limit: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("WEB_PORT must be a valid u16")]
    InvalidPort,
    #[error("JOURNAL_DEFAULT_LIMIT must be an integer")]
    InvalidJournalLimit,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("WEB_HOST")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        let bind_port = env::var("WEB_PORT")
            .ok()
            .map(|value| value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8000);
        let default_journal_limit = env::var("JOURNAL_DEFAULT_LIMIT")
            .ok()
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidJournalLimit)
            })
            .transpose()?
            .unwrap_or(DEFAULT_JOURNAL_LIMIT);

        let config = Self {
            bind_addr,
            bind_port,
            default_journal_limit,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Tests mutate process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("WEB_HOST");
        env::remove_var("WEB_PORT");
        env::remove_var("JOURNAL_DEFAULT_LIMIT");
    }

    #[test]
    fn parse_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        clear_env();

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.default_journal_limit, 200);
    }

    #[test]
    fn invalid_port_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        clear_env();
        env::set_var("WEB_PORT", "eighty");

        let err = Config::from_env().expect_err("expected invalid port error");
        assert!(matches!(err, ConfigError::InvalidPort));
        clear_env();
    }

    #[test]
    fn invalid_host_fails_socket_validation() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        clear_env();
        env::set_var("WEB_HOST", "not an address");

        let err = Config::from_env().expect_err("expected invalid socket error");
        assert!(matches!(err, ConfigError::InvalidSocket));
        clear_env();
    }

    #[test]
    fn journal_limit_override_parses() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        clear_env();
        env::set_var("WEB_HOST", "127.0.0.1");
        env::set_var("WEB_PORT", "9090");
        env::set_var("JOURNAL_DEFAULT_LIMIT", "50");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(
            config.bind_socket().expect("socket"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(config.default_journal_limit, 50);
        clear_env();
    }

    #[test]
    fn invalid_journal_limit_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        clear_env();
        env::set_var("JOURNAL_DEFAULT_LIMIT", "lots");

        let err = Config::from_env().expect_err("expected invalid limit error");
        assert!(matches!(err, ConfigError::InvalidJournalLimit));
        clear_env();
    }
}
