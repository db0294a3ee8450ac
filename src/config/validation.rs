//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, result limits > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WidgetConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::WidgetConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &WidgetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "server.request_timeout_secs" });
    }
    if config.server.max_sessions == 0 {
        errors.push(ValidationError::Zero { field: "server.max_sessions" });
    }
    if config.server.session_idle_secs == 0 {
        errors.push(ValidationError::Zero { field: "server.session_idle_secs" });
    }

    if Url::parse(&config.geocoder.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "geocoder.base_url",
            value: config.geocoder.base_url.clone(),
        });
    }
    if config.geocoder.user_agent.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "geocoder.user_agent" });
    }
    if config.geocoder.timeout_ms == 0 {
        errors.push(ValidationError::Zero { field: "geocoder.timeout_ms" });
    }
    if config.geocoder.max_results == 0 {
        errors.push(ValidationError::Zero { field: "geocoder.max_results" });
    }

    if config.suggestions.min_query_chars == 0 {
        errors.push(ValidationError::Zero { field: "suggestions.min_query_chars" });
    }

    if config.overlay.line_weight == 0 {
        errors.push(ValidationError::Zero { field: "overlay.line_weight" });
    }
    if config.overlay.line_color.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "overlay.line_color" });
    }

    if Url::parse(&config.share.base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "share.base_url",
            value: config.share.base_url.clone(),
        });
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
        assert_eq!(validate_config(&WidgetConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = WidgetConfig::default();
        config.server.bind_address = "not-an-address".into();
        config.geocoder.timeout_ms = 0;
        config.share.base_url = "::".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Zero { field: "geocoder.timeout_ms" }));
        assert!(errors[0].to_string().contains("server.bind_address"));
    }
}
