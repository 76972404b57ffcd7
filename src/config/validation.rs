use crate::config::types::{CategoryEntry, Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Fewest categories a run may be started with
pub const MIN_CATEGORIES: usize = 3;

/// Fewest articles a run may request across all categories
pub const MIN_TOTAL_POSTS: usize = 100;

/// Upper bound for the article worker pool
pub const MAX_WORKERS: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    validate_categories(&config.categories)?;
    validate_total_target(config)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.posts_per_category < 1 {
        return Err(ConfigError::Validation(
            "posts_per_category must be >= 1".to_string(),
        ));
    }

    if config.max_workers < 1 || config.max_workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.max_workers
        )));
    }

    for (name, value) in [
        ("delay", config.delay),
        ("jitter", config.jitter),
        ("retry_backoff", config.retry_backoff),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-negative number of seconds, got {}",
                name, value
            )));
        }
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates site endpoints
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;
    validate_http_url("comment_api", &config.comment_api)?;

    if config.comment_page_size < 1 {
        return Err(ConfigError::Validation(
            "comment_page_size must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, dir) in [
        ("data_dir", &config.data_dir),
        ("audio_dir", &config.audio_dir),
        ("images_dir", &config.images_dir),
    ] {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates the category list
fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    if categories.len() < MIN_CATEGORIES {
        return Err(ConfigError::Validation(format!(
            "Provide at least {} category URLs, got {}",
            MIN_CATEGORIES,
            categories.len()
        )));
    }

    for entry in categories {
        validate_http_url("category url", &entry.url)?;

        if entry.posts == Some(0) {
            return Err(ConfigError::Validation(format!(
                "Category '{}' must request at least one post",
                entry.url
            )));
        }
    }

    Ok(())
}

/// Checks that the requested posts across all categories reach the minimum
fn validate_total_target(config: &Config) -> Result<(), ConfigError> {
    let total: usize = config.category_targets().iter().map(|t| t.target).sum();

    if total < MIN_TOTAL_POSTS {
        return Err(ConfigError::Validation(format!(
            "Total requested posts must be at least {}, got {}",
            MIN_TOTAL_POSTS, total
        )));
    }

    Ok(())
}

/// Parses a URL and requires an http(s) scheme
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}
