//! Demo routes and the error mapping table that serves them

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::routing::get;
use errmap_core::{ErrorMappings, ErrorRecorder, HandlerResult, map, map_kind};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Highest item id the demo store knows about
const MAX_ITEM_ID: u64 = 99;

/// Paths served by [`router`]
pub const ROUTES: [&str; 3] = ["/ping", "/items/{id}", "/boom"];

/// Sentinel errors raised by the demo handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DemoError {
    #[error("resource could not be found")]
    NotFound,
    #[error("storage unavailable")]
    Unavailable,
}

/// Item lookup failure, wrapping the underlying store error
#[derive(Debug, Error)]
#[error("item {id} lookup failed: {source}")]
pub struct LookupError {
    pub id: u64,
    pub source: DemoError,
}

/// Malformed client input
#[derive(Debug, Error)]
#[error("invalid item id: {input:?}")]
pub struct ValidationError {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

/// Error mappings for the demo routes
///
/// `DemoError::Unavailable` is deliberately left unmapped so it falls
/// through to the default 500 response.
pub fn mappings() -> ErrorMappings {
    ErrorMappings::new()
        .with(map(DemoError::NotFound).to_response(|_, error| (StatusCode::NOT_FOUND, error.to_string())))
        .with(map_kind::<ValidationError>().to_response(|_, error| {
            let body = serde_json::json!({
                "error": {
                    "type": "validation_error",
                    "message": error.to_string(),
                }
            });
            (StatusCode::BAD_REQUEST, Json(body))
        }))
}

/// Demo routes, without error mapping applied
pub fn router() -> Router {
    let [ping_path, item_path, boom_path] = ROUTES;
    Router::new()
        .route(ping_path, get(ping))
        .route(item_path, get(get_item))
        .route(boom_path, get(boom))
}

/// Health check handler
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

async fn ping(errors: ErrorRecorder) {
    errors.record(DemoError::NotFound);
}

async fn get_item(Path(raw): Path<String>) -> HandlerResult<Json<Item>> {
    let Ok(id) = raw.parse::<u64>() else {
        return Err(ValidationError { input: raw }.into());
    };

    if id > MAX_ITEM_ID {
        return Err(LookupError {
            id,
            source: DemoError::NotFound,
        }
        .into());
    }

    Ok(Json(Item {
        id,
        name: format!("item-{id}"),
    }))
}

async fn boom() -> HandlerResult<()> {
    Err(DemoError::Unavailable.into())
}
