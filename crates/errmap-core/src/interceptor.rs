use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::context::ErrorContext;
use crate::recorded::RecordedError;
use crate::recorder::ErrorRecorder;
use crate::registry::ErrorMappings;

/// Wrap every route currently on `router` with the error handler middleware
///
/// Routes added after this call are not covered.
pub fn install<S>(router: Router<S>, mappings: ErrorMappings) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let mappings = Arc::new(mappings);
    router.layer(axum::middleware::from_fn(move |request: Request, next: Next| {
        let mappings = Arc::clone(&mappings);
        async move { error_handler_middleware(mappings, request, next).await }
    }))
}

/// Middleware that maps the last recorded error onto a response
///
/// Runs the handler to completion first. Errors recorded through the
/// [`ErrorRecorder`] extractor and an error returned by the handler (which
/// counts as recorded last) are collected; only the most recent one is
/// matched against `mappings`. Without errors, or without a matching rule,
/// the handler's response is returned untouched.
pub async fn error_handler_middleware(mappings: Arc<ErrorMappings>, request: Request, next: Next) -> Response {
    let recorder = ErrorRecorder::default();
    let context = ErrorContext::capture(&request);

    let mut request = request;
    request.extensions_mut().insert(recorder.clone());

    let response = next.run(request).await;

    if let Some(returned) = response.extensions().get::<RecordedError>() {
        recorder.record(returned.clone());
    }

    let errors = recorder.errors();
    let Some(error) = errors.last().cloned() else {
        return response;
    };

    let Some((rule, reason)) = mappings.find(&error) else {
        tracing::debug!(%error, status = %response.status(), "no error mapping matched");
        return response;
    };

    tracing::debug!(%error, ?rule, ?reason, "mapping handler error to response");
    rule.apply(&context.with_errors(errors), &error)
}
