//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Directory holding the knowledge YAML files.
    pub config_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `MOVNE_API_ADDR` | Server bind address | `0.0.0.0:$PORT` or `0.0.0.0:8080` |
    /// | `PORT` | Port used when `MOVNE_API_ADDR` is unset | `8080` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:movne.db?mode=rwc` |
    /// | `MOVNE_CONFIG_DIR` | Knowledge files directory | `config` |
    ///
    /// Model settings (`ANTHROPIC_*`) and orchestrator settings
    /// (`API_BASE_URL`, `MOVNE_HISTORY_TURNS`) are read by their own crates.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = match env::var("MOVNE_API_ADDR") {
            Ok(addr) => addr,
            Err(_) => {
                let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
                format!("0.0.0.0:{}", port)
            }
        };
        let addr = addr.parse().map_err(|_| ConfigError::InvalidAddr(addr))?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:movne.db?mode=rwc".to_string());

        let config_dir = env::var("MOVNE_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        Ok(Self {
            addr,
            database_url,
            config_dir,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address: {0}")]
    InvalidAddr(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_and_port() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("MOVNE_API_ADDR");
        env::remove_var("SQLITE_PATH");
        env::remove_var("MOVNE_CONFIG_DIR");
        env::set_var("PORT", "9191");

        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.port(), 9191);
        assert_eq!(config.database_url, "sqlite:movne.db?mode=rwc");
        assert_eq!(config.config_dir, PathBuf::from("config"));

        env::remove_var("PORT");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_addr() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("MOVNE_API_ADDR", "not an address");
        let result = Config::from_env();
        env::remove_var("MOVNE_API_ADDR");
        assert!(matches!(result, Err(ConfigError::InvalidAddr(_))));
    }
}
