use http::{HeaderMap, Method, Uri};

use crate::recorded::RecordedError;

/// Request metadata handed to custom response handlers
///
/// Captured before the wrapped handler runs, since the request itself is
/// consumed by the handler.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    errors: Vec<RecordedError>,
}

impl ErrorContext {
    /// Create a context for a request with no recorded errors yet
    pub const fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
            errors: Vec::new(),
        }
    }

    /// Capture method, URI and headers from an incoming request
    pub fn capture<B>(request: &http::Request<B>) -> Self {
        Self::new(request.method().clone(), request.uri().clone(), request.headers().clone())
    }

    /// Attach the errors recorded while handling the request
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<RecordedError>) -> Self {
        self.errors = errors;
        self
    }

    /// Request method
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request headers
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Every error recorded on the request, oldest first
    pub fn errors(&self) -> &[RecordedError] {
        &self.errors
    }
}
