//! Configuration validation.
//!
//! Collects every problem in one pass so startup fails with the full list.

use crate::{AppConfig, CacheConfig, DatabaseConfig, ObservabilityConfig, RedisConfig, ServerConfig};
use thiserror::Error;
use url::Url;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    /// Port number is invalid.
    #[error("Invalid port for {name}: {value}")]
    InvalidPort { name: String, value: u16 },

    /// Pool size configuration is invalid (min must be <= max).
    #[error("Invalid pool size: min ({min}) cannot be greater than max ({max})")]
    InvalidPoolSize { min: u32, max: u32 },

    /// URL format is invalid.
    #[error("Invalid {url_type} URL: {message}")]
    InvalidUrl { url_type: String, message: String },

    /// A duration that must be positive was zero.
    #[error("'{name}' must be positive")]
    NonPositiveDuration { name: String },

    /// Log level is not recognised.
    #[error("Invalid log level: '{value}' (valid: trace, debug, info, warn, error)")]
    InvalidLogLevel { value: String },
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&config.server, &mut errors);
        Self::validate_database(&config.database, &mut errors);
        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }
        if config.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "server.request_timeout_secs".to_string(),
            });
        }
    }

    fn validate_database(config: &DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        Self::validate_url("database", &config.url, &["mysql"], errors);

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
    }

    fn validate_redis(config: &RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.enabled {
            Self::validate_url("redis", &config.url, &["redis", "rediss"], errors);
        }
    }

    fn validate_cache(config: &CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.total_count_ttl_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "cache.total_count_ttl_secs".to_string(),
            });
        }
        if config.record_ttl_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveDuration {
                name: "cache.record_ttl_secs".to_string(),
            });
        }
    }

    fn validate_observability(config: &ObservabilityConfig, errors: &mut Vec<ConfigValidationError>) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }

    fn validate_url(
        url_type: &str,
        raw: &str,
        schemes: &[&str],
        errors: &mut Vec<ConfigValidationError>,
    ) {
        if raw.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: url_type.to_string(),
                message: "URL cannot be empty".to_string(),
            });
            return;
        }

        match Url::parse(raw) {
            Ok(url) if schemes.contains(&url.scheme()) => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: url_type.to_string(),
                message: format!(
                    "unsupported scheme '{}' (expected one of: {})",
                    url.scheme(),
                    schemes.join(", ")
                ),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: url_type.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
