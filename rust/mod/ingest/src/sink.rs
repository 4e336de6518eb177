//! Where accepted frames go.
//!
//! Nothing is persisted; the default sink writes one structured log
//! event per frame.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

/// Summary of one accepted frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceRecord {
    pub device_id: String,
    pub model_id: String,
    pub model_name: String,
    pub model_version: String,
    pub hardware_sn: String,
    pub observed_at: String,
    pub accepted_keys: usize,
    pub data: Map<String, Value>,
}

/// Receiver of accepted frames.
pub trait AcceptanceSink: Send + Sync + 'static {
    fn accept(&self, record: &AcceptanceRecord);
}

/// Logs each frame under the `ingest::accept` target.
pub struct LogSink;

impl AcceptanceSink for LogSink {
    fn accept(&self, record: &AcceptanceRecord) {
        let data = serde_json::to_string(&record.data).unwrap_or_default();
        info!(
            target: "ingest::accept",
            device = %record.device_id,
            model = %format!("{}@{}", record.model_name, record.model_version),
            hardware_sn = %record.hardware_sn,
            observed_at = %record.observed_at,
            accepted_keys = record.accepted_keys,
            data = %data,
            "frame accepted"
        );
    }
}

/// Keeps every record in memory. Used for testing.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<AcceptanceRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AcceptanceRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AcceptanceSink for MemorySink {
    fn accept(&self, record: &AcceptanceRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}
