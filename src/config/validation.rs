use crate::config::types::{
    Config, ListenerConfig, PipelineConfig, SourceConfig, SpiderConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

const MAX_WORKERS: usize = 64;
const MAX_QUEUE_CAPACITY: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_pipeline_config(&config.pipeline)?;
    validate_source_config(&config.source)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_spider_config(&config.spider)?;
    validate_listener("console", &config.console)?;
    validate_listener("http", &config.http)?;
    Ok(())
}

/// Validates worker pool and queue sizing
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.queue_capacity < 1 || config.queue_capacity > MAX_QUEUE_CAPACITY {
        return Err(ConfigError::Validation(format!(
            "queue_capacity must be between 1 and {}, got {}",
            MAX_QUEUE_CAPACITY, config.queue_capacity
        )));
    }

    Ok(())
}

/// Validates the source site settings
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.listing_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "listing_path cannot be empty".to_string(),
        ));
    }

    if config.recents_path.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "recents_path cannot be empty".to_string(),
        ));
    }

    if !config.required_prefix.is_ascii_alphanumeric() {
        return Err(ConfigError::Validation(format!(
            "required_prefix must be an ASCII letter or digit, got {:?}",
            config.required_prefix
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates spider settings
fn validate_spider_config(config: &SpiderConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.dedup_database_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "dedup_database_path cannot be empty when set".to_string(),
            ));
        }
    }

    if config.recents_poll_count > 0 && config.recents_poll_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "recents_poll_interval_secs must be >= 1 when polling is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates a listener address, if one is set
fn validate_listener(name: &str, config: &ListenerConfig) -> Result<(), ConfigError> {
    if let Some(listen) = &config.listen {
        listen.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidAddress(format!("{} listen '{}': {}", name, listen, e))
        })?;
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
