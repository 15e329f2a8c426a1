//! Error responses of the HTTP API.
//!
//! Every error body is the same single-key object the widget records use:
//! `{"error": "<message>"}`.

use crate::aggregator::LookupError;
use crate::config::ConfigError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configuration file is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Lookup(LookupError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Lookup(LookupError::NotEnabled) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_lookup_status_codes() {
        assert_eq!(
            ApiError::from(LookupError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(LookupError::NotEnabled).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_config_error_message() {
        let err = ApiError::from(ConfigError::NotFound(PathBuf::from("/etc/labdash.toml")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Configuration error: Configuration file not found: /etc/labdash.toml"
        );
    }

    #[test]
    fn test_lookup_message_is_unprefixed() {
        assert_eq!(
            ApiError::from(LookupError::NotFound).to_string(),
            "Widget not found"
        );
    }
}
