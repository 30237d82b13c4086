#![allow(clippy::must_use_candidate)]

//! Map errors recorded by axum handlers onto HTTP responses
//!
//! Build an ordered [`ErrorMappings`] table at startup and [`install`] it
//! around a router. Handlers record errors through the [`ErrorRecorder`]
//! extractor or return them as [`RecordedError`]. After the handler finishes,
//! the most recently recorded error is matched against the table and the
//! first matching rule writes the response:
//!
//! ```no_run
//! use axum::{Router, routing::get};
//! use errmap_core::{ErrorMappings, ErrorRecorder, map};
//! use http::StatusCode;
//!
//! #[derive(Debug, PartialEq, thiserror::Error)]
//! #[error("resource could not be found")]
//! struct NotFound;
//!
//! let app = Router::new().route("/ping", get(|errors: ErrorRecorder| async move { errors.record(NotFound) }));
//! let app: Router = errmap_core::install(
//!     app,
//!     ErrorMappings::new().with(map(NotFound).to_response(|_, error| (StatusCode::NOT_FOUND, error.to_string()))),
//! );
//! ```

mod context;
mod error;
mod interceptor;
mod matcher;
mod recorded;
mod recorder;
mod registry;
mod rule;

pub use context::ErrorContext;
pub use error::{MappingError, RecorderMissing};
pub use interceptor::{error_handler_middleware, install};
pub use matcher::MatchReason;
pub use recorded::{HandlerResult, MAX_CHAIN_DEPTH, RecordedError};
pub use recorder::ErrorRecorder;
pub use registry::ErrorMappings;
pub use rule::{ErrorRule, RuleBuilder, Strategy, map, map_if, map_kind};
