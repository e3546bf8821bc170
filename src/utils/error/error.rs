//! Error handling for the tracker
//!
//! This module defines all error types used throughout the gateway.

#![allow(missing_docs)]

use crate::core::geo::wkb::PointDecodeError;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the tracker
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Main error type for the tracker
#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum TrackerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Coordinate values outside the legal WGS84 ranges
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Corrupt or unparseable stored geometry
    #[error("Point decode error: {0}")]
    PointDecode(#[from] PointDecodeError),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Work-session lifecycle errors
    #[error("Session error: {0}")]
    Session(String),

    /// Realtime channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for TrackerError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            TrackerError::Config(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            TrackerError::Database(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database operation failed".to_string(),
            ),
            TrackerError::Serialization(_) | TrackerError::Yaml(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "PARSING_ERROR",
                self.to_string(),
            ),
            TrackerError::Io(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                "IO operation failed".to_string(),
            ),
            TrackerError::Validation(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            TrackerError::InvalidCoordinate(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_COORDINATE",
                self.to_string(),
            ),
            TrackerError::PointDecode(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "POINT_DECODE_ERROR",
                "Stored geometry could not be decoded".to_string(),
            ),
            TrackerError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            TrackerError::Session(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "SESSION_ERROR",
                self.to_string(),
            ),
            TrackerError::Channel(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CHANNEL_ERROR",
                self.to_string(),
            ),
            TrackerError::Internal(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None, // This should be set by middleware
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}

/// Helper functions for creating specific errors
#[allow(dead_code)]
impl TrackerError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_coordinate<S: Into<String>>(message: S) -> Self {
        Self::InvalidCoordinate(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session(message.into())
    }

    pub fn channel<S: Into<String>>(message: S) -> Self {
        Self::Channel(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether resending corrected input could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TrackerError::Validation(_)
                | TrackerError::InvalidCoordinate(_)
                | TrackerError::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_coordinate_is_recoverable() {
        let err = TrackerError::invalid_coordinate("latitude 200 out of range");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("latitude 200"));
    }

    #[test]
    fn test_database_error_is_not_recoverable() {
        let err = TrackerError::Database(sea_orm::DbErr::Custom("boom".into()));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_response_status_codes() {
        use actix_web::http::StatusCode;

        let cases: Vec<(TrackerError, StatusCode)> = vec![
            (
                TrackerError::validation("missing field"),
                StatusCode::BAD_REQUEST,
            ),
            (
                TrackerError::invalid_coordinate("lng 500"),
                StatusCode::BAD_REQUEST,
            ),
            (
                TrackerError::not_found("session"),
                StatusCode::NOT_FOUND,
            ),
            (
                TrackerError::internal("bug"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.error_response().status(), expected);
        }
    }
}
