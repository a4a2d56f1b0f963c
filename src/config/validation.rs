use crate::config::types::{
    BlockingConfig, Config, CrawlerConfig, DetailMode, HttpConfig, OutputConfig, RecoveryConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_blocking_config(&config.blocking)?;
    validate_recovery_config(&config.recovery)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_endpoint("list-url", &config.list_url)?;
    validate_endpoint("asset-url", &config.asset_url)?;
    if config.detail_mode != DetailMode::None {
        validate_endpoint("detail-url", &config.detail_url)?;
    }

    if config.page_param.is_empty() || config.id_param.is_empty() {
        return Err(ConfigError::Validation(
            "page-param and id-param cannot be empty".to_string(),
        ));
    }

    if config.first_page < 1 {
        return Err(ConfigError::Validation(
            "first-page must be >= 1".to_string(),
        ));
    }

    if let Some(last) = config.last_page {
        if last < config.first_page {
            return Err(ConfigError::Validation(format!(
                "last-page ({}) must not be before first-page ({})",
                last, config.first_page
            )));
        }
    }

    if config.list_attempts == Some(0) {
        return Err(ConfigError::Validation(
            "list-attempts must be >= 1 when set".to_string(),
        ));
    }

    if config.detail_attempts < 1 {
        return Err(ConfigError::Validation(
            "detail-attempts must be >= 1".to_string(),
        ));
    }

    if config.empty_page_confirmations < 1 {
        return Err(ConfigError::Validation(
            "empty-page-confirmations must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "HTTP timeouts must be at least one second".to_string(),
        ));
    }

    Ok(())
}

fn validate_blocking_config(config: &BlockingConfig) -> Result<(), ConfigError> {
    if config.markers.iter().any(|m| m.is_empty()) {
        return Err(ConfigError::Validation(
            "blocking markers cannot be empty strings".to_string(),
        ));
    }

    for status in &config.blocked_statuses {
        if !(100..=599).contains(status) {
            return Err(ConfigError::Validation(format!(
                "blocked status {} is not a valid HTTP status",
                status
            )));
        }
    }

    let anchors = [&config.list_anchor, &config.detail_anchor];
    if anchors.iter().any(|a| matches!(a, Some(s) if s.is_empty())) {
        return Err(ConfigError::Validation(
            "structural anchors cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}

fn validate_recovery_config(config: &RecoveryConfig) -> Result<(), ConfigError> {
    if config.network_max_wait_secs < config.network_wait_secs {
        return Err(ConfigError::Validation(format!(
            "network-max-wait-secs ({}) must be >= network-wait-secs ({})",
            config.network_max_wait_secs, config.network_wait_secs
        )));
    }

    if let Some(command) = &config.reset_command {
        if command.is_empty() || command[0].trim().is_empty() {
            return Err(ConfigError::Validation(
                "reset-command must name a program".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation("output path cannot be empty".to_string()));
    }
    Ok(())
}

/// Endpoints must be absolute http(s) URLs
fn validate_endpoint(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler_config() -> CrawlerConfig {
        CrawlerConfig {
            list_url: "https://example.com/list".to_string(),
            detail_url: "https://example.com/detail".to_string(),
            asset_url: "https://example.com/asset".to_string(),
            asset_token: "t".to_string(),
            page_param: "page".to_string(),
            id_param: "id".to_string(),
            first_page: 1,
            last_page: None,
            politeness_delay_ms: 0,
            detail_mode: DetailMode::Required,
            list_attempts: None,
            detail_attempts: 3,
            empty_page_confirmations: 2,
        }
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("list-url", "https://example.com/list").is_ok());
        assert!(validate_endpoint("list-url", "http://127.0.0.1:8080/").is_ok());

        assert!(validate_endpoint("list-url", "").is_err());
        assert!(validate_endpoint("list-url", "ftp://example.com/").is_err());
        assert!(validate_endpoint("list-url", "/relative/path").is_err());
    }

    #[test]
    fn test_page_range() {
        let mut config = crawler_config();
        config.last_page = Some(1);
        assert!(validate_crawler_config(&config).is_ok());

        config.first_page = 5;
        config.last_page = Some(4);
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_detail_url_ignored_without_detail_fetch() {
        let mut config = crawler_config();
        config.detail_url = String::new();
        assert!(validate_crawler_config(&config).is_err());

        config.detail_mode = DetailMode::None;
        assert!(validate_crawler_config(&config).is_ok());
    }

    #[test]
    fn test_recovery_bounds() {
        let mut config = RecoveryConfig::default();
        assert!(validate_recovery_config(&config).is_ok());

        config.network_max_wait_secs = 1;
        config.network_wait_secs = 2;
        assert!(validate_recovery_config(&config).is_err());

        let mut config = RecoveryConfig::default();
        config.reset_command = Some(vec![]);
        assert!(validate_recovery_config(&config).is_err());
    }
}
