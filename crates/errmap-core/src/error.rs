use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Errors raised while building error mappings
///
/// Misconfiguration is reported here, at registration time, never while
/// handling a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// Status code outside the 100-599 range
    #[error("invalid status code {code}: expected a value between 100 and 599")]
    InvalidStatusCode { code: u16 },
}

/// Rejection for handlers extracting an `ErrorRecorder` without the middleware
#[derive(Debug, Error)]
#[error("error recorder missing: install the error handler middleware")]
pub struct RecorderMissing;

impl IntoResponse for RecorderMissing {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
