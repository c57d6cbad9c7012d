use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::schema::{SchemaError, SiteSchema};
use crate::url::ScopeKind;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Upper bound on concurrent downloads
const MAX_CONCURRENCY: usize = 32;

/// Validates the entire configuration
///
/// The filter section validates itself during deserialization.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_schemas(&config.schemas)?;
    Ok(())
}

impl Config {
    /// See [`validate`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // Depths beyond the cap are clamped at crawl time, not rejected

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.scope == ScopeKind::AllowList && config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "scope \"allow-list\" requires at least one entry in allowed_domains".to_string(),
        ));
    }

    for domain in &config.allowed_domains {
        validate_domain_pattern(domain)?;
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

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.write_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "write_dir cannot be empty".to_string(),
        ));
    }

    if config.output_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Schemas validate themselves while parsing; names must be unique
fn validate_schemas(schemas: &[SiteSchema]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for schema in schemas {
        if !seen.insert(schema.name()) {
            return Err(SchemaError::Duplicate(schema.name().to_string()).into());
        }
    }
    Ok(())
}

/// Validates a domain pattern (supports a `*.` prefix)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);

    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
