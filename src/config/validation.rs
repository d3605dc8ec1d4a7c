use crate::config::types::{
    Config, OutputConfig, PortalConfig, TimeoutConfig, UserAgentConfig, ViewerConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_portal_config(&config.portal)?;
    validate_viewer_config(&config.viewer)?;
    validate_timeouts(&config.timeouts)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates portal configuration
fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    if !config.article_url.contains("{id}") {
        return Err(ConfigError::Validation(format!(
            "article_url must contain the {{id}} placeholder, got '{}'",
            config.article_url
        )));
    }

    // The template must still be a valid URL once an identifier is substituted
    Url::parse(&config.article_url_for("KB0000000"))
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid article_url: {}", e)))?;

    validate_selector("content_selector", &config.content_selector)?;

    if config.login_patterns.is_empty() {
        return Err(ConfigError::Validation(
            "login_patterns must list at least one pattern".to_string(),
        ));
    }

    if config.login_patterns.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "login_patterns cannot contain empty patterns".to_string(),
        ));
    }

    if let Some(var) = &config.cookie_env {
        if var.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cookie_env cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates viewer configuration
fn validate_viewer_config(config: &ViewerConfig) -> Result<(), ConfigError> {
    if config.url_marker.is_empty() {
        return Err(ConfigError::Validation(
            "url_marker cannot be empty".to_string(),
        ));
    }

    validate_selector("container_selector", &config.container_selector)?;
    validate_selector("frame_selector", &config.frame_selector)?;
    validate_selector("text_layer_selector", &config.text_layer_selector)?;
    validate_selector("section_selector", &config.section_selector)?;

    Ok(())
}

/// Validates that every timeout is non-zero
fn validate_timeouts(config: &TimeoutConfig) -> Result<(), ConfigError> {
    let timeouts = [
        ("navigation", config.navigation),
        ("content_wait", config.content_wait),
        ("viewer_wait", config.viewer_wait),
        ("frame_wait", config.frame_wait),
        ("probe", config.probe),
    ];

    for (name, secs) in timeouts {
        if secs == 0 {
            return Err(ConfigError::Validation(format!(
                "timeout '{}' must be >= 1 second",
                name
            )));
        }
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

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.links_path.is_empty() {
        return Err(ConfigError::Validation(
            "links_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.broken_links_path, Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "broken_links_path cannot be empty when set".to_string(),
        ));
    }

    if config.diagnostics_dir.is_empty() {
        return Err(ConfigError::Validation(
            "diagnostics_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a selector is non-empty and parses as CSS
fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }

    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {}", name, selector, e)))?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => {
            return Err(ConfigError::Validation(format!(
                "Invalid email format: '{}'",
                email
            )))
        }
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
