//! Farmstats: a concurrent farm ingestion pipeline
//!
//! This crate discovers farm identifiers on a paginated listing, fetches each
//! farm page, extracts villager friendship scores, and keeps the aggregate
//! results queryable through a TCP console and an HTTP JSON API.

pub mod api;
pub mod config;
pub mod console;
pub mod crawler;
pub mod farm_id;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Farmstats operations
#[derive(Debug, Error)]
pub enum FarmError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid farm id: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] crawler::ExtractError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Job queue is closed")]
    QueueClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL cannot be a base: {0}")]
    CannotBeABase(String),
}

/// Farm identifier errors, covering both codec and external-input failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("character {0:?} is not in the base-62 alphabet")]
    InvalidCharacter(char),

    #[error("cannot encode negative value {0}")]
    NegativeValue(i64),

    #[error("token {0:?} does not fit in a 64-bit score")]
    Overflow(String),

    #[error("entry {entry:?} is shorter than {expected} characters")]
    TooShort { entry: String, expected: usize },

    #[error("entry {entry:?} should start with {expected:?}")]
    BadPrefix { entry: String, expected: char },
}

/// Result type alias for Farmstats operations
pub type Result<T> = std::result::Result<T, FarmError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_pipeline, JobQueue, Pipeline, PipelineHandle, SpiderController};
pub use farm_id::FarmId;
pub use state::{FarmStats, SpiderRunState, Villager};
pub use storage::{DedupGate, ResultStore, SqliteDedupGate};
