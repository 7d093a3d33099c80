use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BookingError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "fyyur.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/fyyur.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the daily rolling JSON log files
    pub dir: PathBuf,
    pub file_name: String,
    /// Default filter directive when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file_name: "fyyur.log".to_string(),
            filter: "fyyur=info,tower_http=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then apply environment overrides.
    ///
    /// An explicitly requested file must exist; the default `fyyur.toml` may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = env::var("FYYUR_CONFIG").ok().map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BookingError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `FYYUR_*` / `DATABASE_PATH` style overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("FYYUR_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FYYUR_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| BookingError::Config(format!("FYYUR_PORT is not a port: {port}")))?;
        }
        if let Some(dir) = lookup("FYYUR_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("FYYUR_LOG_DIR") {
            self.logging.dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
