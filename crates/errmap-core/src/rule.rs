use std::error::Error;
use std::fmt;

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::context::ErrorContext;
use crate::error::MappingError;
use crate::matcher::{MatchReason, Matcher};
use crate::recorded::RecordedError;

type ResponseFn = dyn Fn(&ErrorContext, &RecordedError) -> Response + Send + Sync;

/// Begin a rule that matches a specific error value
///
/// Matches when the recorded error, or any error in its `source()` chain,
/// is of type `E` and equal to `target`.
pub fn map<E>(target: E) -> RuleBuilder
where
    E: Error + PartialEq + Send + Sync + 'static,
{
    RuleBuilder {
        matcher: Matcher::value(target),
    }
}

/// Begin a rule that matches any error of type `E`
///
/// Also matches a recorded `Box<E>` or `Arc<E>`.
pub fn map_kind<E>() -> RuleBuilder
where
    E: Error + 'static,
{
    RuleBuilder {
        matcher: Matcher::kind::<E>(),
    }
}

/// Begin a rule that matches when `predicate` returns true
pub fn map_if<F>(predicate: F) -> RuleBuilder
where
    F: Fn(&RecordedError) -> bool + Send + Sync + 'static,
{
    RuleBuilder {
        matcher: Matcher::predicate(predicate),
    }
}

/// A rule with its target chosen but no response strategy yet
#[must_use = "a rule builder does nothing until a strategy is chosen"]
#[derive(Debug)]
pub struct RuleBuilder {
    matcher: Matcher,
}

#[allow(clippy::wrong_self_convention)]
impl RuleBuilder {
    /// Respond with `status` and an empty body
    pub fn to_status_code(self, status: StatusCode) -> ErrorRule {
        ErrorRule {
            matcher: self.matcher,
            strategy: Strategy::Status(status),
        }
    }

    /// Respond with a raw status code, validated to the 100-599 range
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::InvalidStatusCode`] when `code` is out of range
    pub fn try_to_status_code(self, code: u16) -> Result<ErrorRule, MappingError> {
        if !(100..=599).contains(&code) {
            return Err(MappingError::InvalidStatusCode { code });
        }

        let status = StatusCode::from_u16(code).map_err(|_| MappingError::InvalidStatusCode { code })?;
        Ok(self.to_status_code(status))
    }

    /// Delegate the whole response to `handler`
    ///
    /// The handler receives the request context and the recorded error as it
    /// was recorded (still wrapped, if it was wrapped).
    pub fn to_response<F, R>(self, handler: F) -> ErrorRule
    where
        F: Fn(&ErrorContext, &RecordedError) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        let respond: Box<ResponseFn> =
            Box::new(move |context: &ErrorContext, error: &RecordedError| handler(context, error).into_response());

        ErrorRule {
            matcher: self.matcher,
            strategy: Strategy::Respond(respond),
        }
    }
}

/// How a matched rule produces the response
pub enum Strategy {
    /// Set the status code, empty body
    Status(StatusCode),
    /// Custom response handler
    Respond(Box<ResponseFn>),
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => f.debug_tuple("Status").field(status).finish(),
            Self::Respond(_) => f.write_str("Respond(..)"),
        }
    }
}

/// Immutable (target, strategy) pair
#[derive(Debug)]
pub struct ErrorRule {
    matcher: Matcher,
    strategy: Strategy,
}

impl ErrorRule {
    /// The response strategy of this rule
    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Test the recorded error against this rule's target
    pub fn matches(&self, error: &RecordedError) -> Option<MatchReason> {
        self.matcher.matches(error)
    }

    /// Produce the response for a matched error
    pub fn apply(&self, context: &ErrorContext, error: &RecordedError) -> Response {
        match &self.strategy {
            Strategy::Status(status) => (*status).into_response(),
            Strategy::Respond(respond) => respond(context, error),
        }
    }
}
