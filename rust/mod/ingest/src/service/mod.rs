pub mod manifest;
pub mod pipeline;

use std::sync::Arc;

use ingest_core::{Clock, ServiceConfig, SystemClock};

use crate::registry::{DeviceRegistry, ModelRegistry};
use crate::sink::{AcceptanceSink, LogSink};

pub use manifest::Manifest;
pub use pipeline::{AuthHeaders, IngestAck};

/// Holds the registries and runs the pipeline.
pub struct IngestService {
    pub(crate) models: ModelRegistry,
    pub(crate) devices: DeviceRegistry,
    pub(crate) config: ServiceConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) sink: Arc<dyn AcceptanceSink>,
}

impl IngestService {
    /// Service on the system clock, logging accepted frames.
    pub fn new(models: ModelRegistry, devices: DeviceRegistry, config: ServiceConfig) -> Self {
        Self {
            models,
            devices,
            config,
            clock: Arc::new(SystemClock),
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn AcceptanceSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }
}
