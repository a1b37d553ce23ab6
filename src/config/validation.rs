//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, timeouts > 0)
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, SourceKind};
use crate::data::Category;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.router.default_route.trim().is_empty() {
        errors.push(ValidationError::new("router.default_route", "must not be empty"));
    } else if config.router.default_route.contains('/') {
        errors.push(ValidationError::new(
            "router.default_route",
            "must be a main route name without parameters",
        ));
    }

    if config.search.max_results == 0 {
        errors.push(ValidationError::new("search.max_results", "must be greater than 0"));
    }
    if config.search.description_chars == 0 {
        errors.push(ValidationError::new("search.description_chars", "must be greater than 0"));
    }

    if config.data.timeout_secs == 0 {
        errors.push(ValidationError::new("data.timeout_secs", "must be greater than 0"));
    }

    match config.data.source {
        SourceKind::Http => {
            if let Err(e) = url::Url::parse(&config.data.base_url) {
                errors.push(ValidationError::new(
                    "data.base_url",
                    format!("invalid URL '{}': {}", config.data.base_url, e),
                ));
            }
        }
        SourceKind::Unified => {
            if config.data.unified_path.trim().is_empty() {
                errors.push(ValidationError::new("data.unified_path", "must not be empty"));
            }
        }
        SourceKind::File => {}
    }

    if config.data.source != SourceKind::Unified {
        for category in Category::ALL {
            if config.data.paths.get(category).trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("data.paths.{}", category),
                    "must not be empty",
                ));
            }
        }
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            "must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_http_source_requires_valid_base_url() {
        let mut config = AppConfig::default();
        config.data.source = SourceKind::Http;
        config.data.base_url = "not a url".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "data.base_url");
    }

    #[test]
    fn test_empty_category_path() {
        let mut config = AppConfig::default();
        config.data.paths.tips = "  ".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::new("data.paths.tips", "must not be empty")]);
    }

    #[test]
    fn test_default_route_with_params_rejected() {
        let mut config = AppConfig::default();
        config.router.default_route = "guide/guide-001".to_string();
        config.server.bind_address = "nowhere".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["router.default_route", "server.bind_address"]);
    }
}
