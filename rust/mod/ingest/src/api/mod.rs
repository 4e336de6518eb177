pub mod ingest;
pub mod manifest;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;

use ingest_core::ServiceError;

use crate::service::IngestService;

/// Shared application state.
pub type AppState = Arc<IngestService>;

/// Build the ingest API router. Paths are absolute.
pub fn router(state: AppState) -> Router {
    let limit = state.config().max_body_bytes;
    Router::new()
        .merge(ingest::routes())
        .merge(manifest::routes())
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Map a body extraction failure into the JSON error shape.
pub(crate) fn body_rejection(rejection: BytesRejection) -> ServiceError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge("request body too large".into())
    } else {
        ServiceError::BadRequest(rejection.body_text())
    }
}
