//! Configuration management for the client.

use std::env;
use std::path::PathBuf;

/// Default REST endpoint for the remote backend.
pub const DEFAULT_API_URL: &str = "https://your-api.example.com/students";

/// Default file backing the local store.
pub const DEFAULT_DATA_PATH: &str = "sms_students_v1.json";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Use the remote REST backend instead of the local file
    pub api_mode: bool,
    /// Base URL of the students collection on the REST backend
    pub api_url: String,
    /// JSON file used by the local backend
    pub data_path: PathBuf,
    /// Rows per page
    pub page_size: usize,
    /// Maximum undo entries kept; `None` keeps all of them
    pub undo_depth: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_mode: false,
            api_url: DEFAULT_API_URL.to_string(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            page_size: roster_engine::DEFAULT_PAGE_SIZE,
            undo_depth: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_mode = match lookup("ROSTER_API_MODE") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::InvalidApiMode(v))?,
            None => defaults.api_mode,
        };

        let api_url = lookup("ROSTER_API_URL").unwrap_or(defaults.api_url);

        let data_path = lookup("ROSTER_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let page_size = match lookup("ROSTER_PAGE_SIZE") {
            Some(v) => parse_positive(&v).ok_or(ConfigError::InvalidPageSize(v))?,
            None => defaults.page_size,
        };

        let undo_depth = match lookup("ROSTER_UNDO_DEPTH") {
            Some(v) => Some(parse_positive(&v).ok_or(ConfigError::InvalidUndoDepth(v))?),
            None => None,
        };

        Ok(Self {
            api_mode,
            api_url,
            data_path,
            page_size,
            undo_depth,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_positive(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ROSTER_API_MODE value: {0}")]
    InvalidApiMode(String),

    #[error("Invalid ROSTER_PAGE_SIZE value: {0}")]
    InvalidPageSize(String),

    #[error("Invalid ROSTER_UNDO_DEPTH value: {0}")]
    InvalidUndoDepth(String),
}
