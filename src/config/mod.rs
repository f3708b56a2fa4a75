//! Configuration module for Farmstats
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use farmstats::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("farmstats.toml")).unwrap();
//! println!("Running {} workers", config.pipeline.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ListenerConfig, PipelineConfig, SourceConfig, SpiderConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
