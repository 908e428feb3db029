//! Decoy response engine.
//!
//! # Responsibilities
//! - Serve the single configured payload for every request
//! - Keep status, headers and body independent of the lookup outcome
//!
//! # Design Decisions
//! - Status code and content type are parsed once at startup
//! - The file is read on every request, so the payload can be swapped on disk
//! - A failed read is logged and served as an empty body with the configured
//!   status and content type (fail-open, never a distinct error page)

use std::path::PathBuf;

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use thiserror::Error;

use crate::config::ResponseConfig;
use crate::observability::metrics;

/// The configured response could not be turned into HTTP values.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("invalid response status code {0}")]
    InvalidStatus(u16),

    #[error("invalid response content type {0:?}")]
    InvalidContentType(String),
}

/// The fixed response returned for every request.
#[derive(Debug, Clone)]
pub struct DecoyResponse {
    file: PathBuf,
    content_type: HeaderValue,
    status: StatusCode,
}

impl DecoyResponse {
    pub fn new(
        file: impl Into<PathBuf>,
        content_type: &str,
        status: u16,
    ) -> Result<Self, ResponseError> {
        let status = StatusCode::from_u16(status).map_err(|_| ResponseError::InvalidStatus(status))?;
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|_| ResponseError::InvalidContentType(content_type.to_string()))?;

        Ok(Self {
            file: file.into(),
            content_type,
            status,
        })
    }

    pub fn from_config(config: &ResponseConfig) -> Result<Self, ResponseError> {
        Self::new(&config.file, &config.content_type, config.status_code)
    }

    /// Read the payload. Failures are logged and yield an empty body.
    pub async fn load(&self) -> Bytes {
        match tokio::fs::read(&self.file).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                tracing::error!(
                    file = %self.file.display(),
                    error = %e,
                    "Could not read response file"
                );
                metrics::record_response_file_error();
                Bytes::new()
            }
        }
    }

    /// Build the HTTP response.
    pub async fn render(&self) -> Response {
        let mut response = Response::new(Body::from(self.load().await));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, self.content_type.clone());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn renders_file_with_configured_head() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ok.txt");
        std::fs::write(&file, "OK").unwrap();

        let decoy = DecoyResponse::new(&file, "text/plain", 200).unwrap();
        let response = decoy.render().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn missing_file_keeps_status_and_serves_empty_body() {
        let decoy = DecoyResponse::new("/nonexistent/decoy.xml", "text/xml", 403).unwrap();
        let response = decoy.render().await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/xml");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn rejects_bad_status_and_content_type() {
        assert!(matches!(
            DecoyResponse::new("x", "text/plain", 42),
            Err(ResponseError::InvalidStatus(42))
        ));
        assert!(matches!(
            DecoyResponse::new("x", "text/plain\n", 200),
            Err(ResponseError::InvalidContentType(_))
        ));
    }
}
