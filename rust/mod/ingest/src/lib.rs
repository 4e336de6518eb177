//! Authenticated telemetry ingestion.
//!
//! Devices POST one signed JSON frame per request. The pipeline checks
//! identity, freshness, signature, payload shape, hardware binding and
//! the per-model field contract before handing the frame to a sink.

pub mod api;
pub mod model;
pub mod registry;
pub mod service;
pub mod sign;
pub mod sink;
pub mod validate;

use std::sync::Arc;

use axum::Router;
use ingest_core::Module;

use service::IngestService;

/// Device frame intake plus the manifest endpoint.
pub struct IngestModule {
    service: Arc<IngestService>,
}

impl IngestModule {
    pub fn new(service: IngestService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl Module for IngestModule {
    fn name(&self) -> &str {
        "ingest"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
