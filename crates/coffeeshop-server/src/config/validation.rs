//! Configuration validation.

use super::types::ServerConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("auth.domain must be set")]
    MissingAuthDomain,

    #[error("auth.audience must be set")]
    MissingAuthAudience,

    #[error("auth.algorithms must name at least one algorithm")]
    NoAlgorithms,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("auth.jwks_cache_ttl_secs must be greater than zero")]
    ZeroCacheTtl,

    #[error("auth.jwks_url must be an http(s) URL: {0}")]
    InvalidJwksUrl(String),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("database.min_connections exceeds database.max_connections")]
    InvalidPoolSize,

    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),
}

/// Validate server configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.auth.domain.trim().is_empty() {
        errors.push(ConfigError::MissingAuthDomain);
    }
    if config.auth.audience.trim().is_empty() {
        errors.push(ConfigError::MissingAuthAudience);
    }
    if let Err(e) = config.auth.parsed_algorithms() {
        errors.push(e);
    }
    if config.auth.jwks_cache_ttl_secs == Some(0) {
        errors.push(ConfigError::ZeroCacheTtl);
    }
    if let Some(url) = &config.auth.jwks_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::InvalidJwksUrl(url.clone()));
        }
    }

    if config.database.url.is_empty() {
        errors.push(ConfigError::InvalidDatabaseUrl);
    }
    if config.database.min_connections > config.database.max_connections {
        errors.push(ConfigError::InvalidPoolSize);
    }

    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }
    let valid_formats = ["pretty", "compact", "json"];
    if !valid_formats.contains(&config.logging.format.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
