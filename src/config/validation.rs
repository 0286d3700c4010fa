use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_image_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_image_attempts must be >= 1, got {}",
            config.max_image_attempts
        )));
    }

    validate_extensions("blocked_extensions", &config.blocked_extensions)?;
    validate_extensions("image_extensions", &config.image_extensions)?;

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Extensions are bare suffixes such as `jpg`, compared case-insensitively
fn validate_extensions(field: &str, extensions: &[String]) -> Result<(), ConfigError> {
    for ext in extensions {
        if ext.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} cannot contain an empty extension",
                field
            )));
        }

        if ext.starts_with('.') || ext.contains('/') || ext.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "{} entry '{}' must be a bare extension like 'jpg'",
                field, ext
            )));
        }
    }

    Ok(())
}
