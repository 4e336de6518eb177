use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use ingest_core::ServiceError;

use crate::service::Manifest;
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/manifest/{device_id}", get(get_manifest))
}

async fn get_manifest(
    State(svc): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<Manifest>, ServiceError> {
    svc.manifest(&device_id).map(Json)
}
