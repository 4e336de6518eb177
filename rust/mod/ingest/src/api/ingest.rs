//! POST /v1/ingest: single signed frame from a device.
//!
//! `/api/v1/ingest` is an alias used by some board firmware.

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};

use ingest_core::ServiceError;

use super::{AppState, body_rejection};
use crate::service::IngestAck;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/ingest", post(ingest))
        .route("/api/v1/ingest", post(ingest))
}

/// The body is taken as raw bytes: the signature covers them verbatim.
async fn ingest(
    State(svc): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<IngestAck>, ServiceError> {
    let body = body.map_err(body_rejection)?;
    svc.ingest(&headers, &body).map(Json)
}
