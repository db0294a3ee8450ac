//! Geocoding errors.

use thiserror::Error;

/// Errors that can occur while talking to the geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The configured service URL cannot be used.
    #[error("invalid geocoder base URL: {0}")]
    InvalidBaseUrl(String),

    /// Transport failure or undecodable body.
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("geocoding service returned HTTP {0}")]
    Status(u16),

    /// Any other failure reported by a geocoder implementation.
    #[error("geocoding failed: {0}")]
    Service(String),
}

/// Result type for geocoding operations.
pub type GeocodeResult<T> = Result<T, GeocodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GeocodeError::Status(503).to_string(),
            "geocoding service returned HTTP 503"
        );
        assert!(GeocodeError::InvalidBaseUrl("nope".into())
            .to_string()
            .contains("nope"));
    }
}
