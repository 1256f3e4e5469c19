//! Error types for the Yext API client.
//!
//! # Design
//! Configuration problems (`ConfigError`) are kept apart from per-call
//! failures (`ApiError`) because they surface at different times: an
//! unknown environment never reaches the network. Any non-2xx response lands in
//! `ApiError::Status` with the raw response attached; status-specific
//! recovery such as treating 404 as "absent" belongs to the resource
//! wrappers, not here.

use thiserror::Error;

use crate::http::{HttpMethod, HttpResponse};

/// Errors raised while building a `Config`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment name is not one of `PROD` or `SANDBOX`.
    #[error("unknown Yext environment: {0}")]
    UnknownEnvironment(String),
}

/// The transport could not produce an HTTP response at all (DNS failure,
/// refused connection, TLS error, broken body stream).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NetworkError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl NetworkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors returned by `Client::call` and the resource wrappers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a status outside 200..=299.
    ///
    /// `path` is the endpoint path relative to the account base URL. The
    /// query string is left out since it carries the API key.
    #[error("{method} {path} returned HTTP {}", .response.status)]
    Status {
        method: HttpMethod,
        path: String,
        response: HttpResponse,
    },

    #[error("request failed: {0}")]
    Network(#[from] NetworkError),

    /// Base URL plus endpoint path did not parse, e.g. because of a bad
    /// host override.
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A 2xx body was not JSON, or did not have the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// An entity record did not serialize to a JSON object.
    #[error("entity record must be a JSON object, got {0}")]
    InvalidRecord(&'static str),
}

impl ApiError {
    /// HTTP status of a `Status` error.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Raw response of a `Status` error, for callers that want to inspect
    /// the body.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::Status { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> ApiError {
        ApiError::Status {
            method: HttpMethod::Get,
            path: "entities/loc1".to_string(),
            response: HttpResponse {
                status,
                headers: Vec::new(),
                body: b"{}".to_vec(),
            },
        }
    }

    #[test]
    fn status_error_display_names_method_and_path() {
        assert_eq!(
            status_error(500).to_string(),
            "GET entities/loc1 returned HTTP 500"
        );
    }

    #[test]
    fn not_found_only_for_404() {
        assert!(status_error(404).is_not_found());
        assert!(!status_error(410).is_not_found());
        assert!(!ApiError::InvalidRecord("array").is_not_found());
    }

    #[test]
    fn non_status_errors_carry_no_response() {
        let err = ApiError::from(NetworkError::new("connection refused"));
        assert!(err.response().is_none());
        assert_eq!(err.to_string(), "request failed: connection refused");
    }

    #[test]
    fn unknown_environment_message() {
        let err = ConfigError::UnknownEnvironment("STAGING".to_string());
        assert_eq!(err.to_string(), "unknown Yext environment: STAGING");
    }
}
