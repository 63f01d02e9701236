//! Runtime configuration
//!
//! Read once from the environment at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::ai::OpenAiConfig;

const DATABASE_PATH_ENV: &str = "FITCOMP_DATABASE_PATH";
const HOST_ENV: &str = "FITCOMP_HOST";
const PORT_ENV: &str = "FITCOMP_PORT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` keeps all data in memory for the life of the process
    pub database_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub openai: OpenAiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                var: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_path: lookup(DATABASE_PATH_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            host: lookup(HOST_ENV)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            openai: OpenAiConfig::from_lookup(&lookup),
        })
    }

    /// `host:port`, for logging
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
