use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::error::RecorderMissing;
use crate::recorded::RecordedError;

/// Per-request list of errors recorded by handlers
///
/// The error handler middleware inserts a fresh recorder into the request
/// extensions before running the handler. Handlers extract it and call
/// [`ErrorRecorder::record`]; only the most recent error is mapped.
#[derive(Debug, Clone, Default)]
pub struct ErrorRecorder {
    errors: Arc<Mutex<Vec<RecordedError>>>,
}

impl ErrorRecorder {
    /// Record an error against the current request
    pub fn record(&self, error: impl Into<RecordedError>) {
        self.lock().push(error.into());
    }

    /// Most recently recorded error, if any
    pub fn last(&self) -> Option<RecordedError> {
        self.lock().last().cloned()
    }

    /// Snapshot of all recorded errors in recording order
    pub fn errors(&self) -> Vec<RecordedError> {
        self.lock().clone()
    }

    /// Number of recorded errors
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no error has been recorded
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedError>> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> FromRequestParts<S> for ErrorRecorder
where
    S: Send + Sync,
{
    type Rejection = RecorderMissing;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or(RecorderMissing)
    }
}
