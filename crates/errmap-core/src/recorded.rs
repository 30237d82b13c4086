use std::error::Error;
use std::fmt;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use http::StatusCode;

/// Maximum number of `source()` links followed below the recorded error
///
/// Bounds chain walks so a malformed, cyclic wrap chain cannot loop forever
pub const MAX_CHAIN_DEPTH: usize = 32;

/// Result type for handlers whose failures should reach the error mappings
pub type HandlerResult<T> = Result<T, RecordedError>;

/// Shared handle to an error recorded while handling a request
///
/// Any `std::error::Error + Send + Sync + 'static` converts into a
/// `RecordedError`, so handlers can use `?` when returning
/// [`HandlerResult`]. Cloning is cheap and keeps the same underlying value.
#[derive(Clone)]
pub struct RecordedError(Arc<dyn Error + Send + Sync + 'static>);

impl RecordedError {
    /// Wrap an already shared error without adding another layer
    pub fn from_shared(error: Arc<dyn Error + Send + Sync + 'static>) -> Self {
        Self(error)
    }

    /// Wrap a boxed error without adding another layer
    pub fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self(Arc::from(error))
    }

    /// Access the underlying error as a trait object
    pub fn as_error(&self) -> &(dyn Error + 'static) {
        &*self.0
    }

    /// Iterate the error followed by its transitive `source()` chain
    ///
    /// Yields at most `MAX_CHAIN_DEPTH + 1` errors.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        std::iter::successors(Some(self.as_error()), |&error| error.source()).take(MAX_CHAIN_DEPTH + 1)
    }

    /// Attempt to downcast the top-level error to a concrete type
    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether the top-level error is of type `T`
    pub fn is<T: Error + 'static>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl<E> From<E> for RecordedError
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self(Arc::new(error))
    }
}

impl fmt::Display for RecordedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for RecordedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Default response for a handler that returned an error
///
/// Produces a plain `500 Internal Server Error` and carries the error in the
/// response extensions so the interceptor can treat it as the last recorded
/// error. When no mapping matches, this is the response the client sees.
impl IntoResponse for RecordedError {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        response.extensions_mut().insert(self);
        response
    }
}
