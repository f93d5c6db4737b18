use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Cache TTL and daily limit are positive
/// - Domestic prefix is a non-empty run of digits
/// - Provider base URLs are http(s)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.search.cache_ttl_days == 0 {
        return Err(ConfigError::ValidationError(
            "search.cache_ttl_days must be at least 1".to_string(),
        ));
    }

    let prefix = &config.search.domestic_prefix;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::ValidationError(format!(
            "search.domestic_prefix must be digits, got {:?}",
            prefix
        )));
    }

    if config.google_books.daily_limit <= 0 {
        return Err(ConfigError::ValidationError(
            "google_books.daily_limit must be positive".to_string(),
        ));
    }

    check_url("openbd.base_url", &config.openbd.base_url)?;
    check_url("google_books.base_url", &config.google_books.base_url)?;

    Ok(())
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got {:?}",
            field, url
        )))
    }
}
