//! The per-request ingestion pipeline.
//!
//! Gates run in a fixed order and the first failure ends the request:
//! headers → device → timestamp → freshness → signature → payload
//! shape → hardware binding → model contract → accept.

use axum::http::HeaderMap;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use ingest_core::{now_rfc3339, ServiceError};

use crate::model::{Binding, IngestFrame};
use crate::sign;
use crate::sink::AcceptanceRecord;
use crate::validate::validate;

use super::IngestService;

pub const HEADER_DEVICE_ID: &str = "x-device-id";
pub const HEADER_TIMESTAMP: &str = "x-timestamp";
pub const HEADER_SIGNATURE: &str = "x-device-sign";

/// The three authentication headers, borrowed from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthHeaders<'a> {
    pub device_id: &'a str,
    /// Epoch milliseconds, kept as sent; the signature covers this string.
    pub timestamp: &'a str,
    pub signature: &'a str,
}

impl<'a> AuthHeaders<'a> {
    /// All three headers, or `None` if any is absent, empty or not UTF-8.
    pub fn from_headers(headers: &'a HeaderMap) -> Option<Self> {
        Some(Self {
            device_id: header(headers, HEADER_DEVICE_ID)?,
            timestamp: header(headers, HEADER_TIMESTAMP)?,
            signature: header(headers, HEADER_SIGNATURE)?,
        })
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Success body of `POST /v1/ingest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestAck {
    pub ok: bool,
    pub server_time: String,
    pub accepted_keys: usize,
}

impl IngestService {
    /// Run the pipeline for one request.
    pub fn ingest(&self, headers: &HeaderMap, body: &[u8]) -> Result<IngestAck, ServiceError> {
        let Some(auth) = AuthHeaders::from_headers(headers) else {
            debug!("frame rejected: missing auth headers");
            return Err(ServiceError::Unauthenticated("missing auth headers".into()));
        };
        self.ingest_signed(auth, body)
    }

    /// Run the pipeline once the auth headers have been extracted.
    pub fn ingest_signed(&self, auth: AuthHeaders<'_>, body: &[u8]) -> Result<IngestAck, ServiceError> {
        let result = self.run(auth, body);
        if let Err(e) = &result {
            match e {
                ServiceError::Unauthenticated(_) | ServiceError::Forbidden(_) => {
                    warn!(device = %auth.device_id, code = e.error_code(), "frame rejected: {}", e)
                }
                ServiceError::Internal(_) => {
                    error!(device = %auth.device_id, "frame rejected: {}", e)
                }
                _ => debug!(device = %auth.device_id, code = e.error_code(), "frame rejected: {}", e),
            }
        }
        result
    }

    fn run(&self, auth: AuthHeaders<'_>, body: &[u8]) -> Result<IngestAck, ServiceError> {
        let device = self
            .devices
            .lookup_enabled(auth.device_id)
            .ok_or_else(|| ServiceError::Forbidden("unknown or disabled device".into()))?;

        let client_ms: i64 = auth
            .timestamp
            .parse()
            .map_err(|_| ServiceError::BadRequest("invalid X-Timestamp".into()))?;
        if !self.config.is_fresh(self.clock.now_millis(), client_ms) {
            return Err(ServiceError::BadRequest("timestamp skew too large".into()));
        }

        if !sign::verify(device.secret(), auth.timestamp, body, auth.signature) {
            return Err(ServiceError::Unauthenticated("bad signature".into()));
        }

        let frame = IngestFrame::parse(body, self.config.schema_version)?;

        match device.bind_or_check(&frame.hardware_sn) {
            Binding::NewlyBound => {
                info!(device = %device.id, hardware_sn = %frame.hardware_sn, "hardware serial bound")
            }
            Binding::Matched => {}
            Binding::Mismatch => {
                return Err(ServiceError::Forbidden("hardwareSN mismatch".into()));
            }
        }

        let model = self
            .models
            .lookup(&device.model_id)
            .ok_or_else(|| ServiceError::Internal("server model missing".into()))?;

        let errors = validate(model, &frame.data);
        if !errors.is_empty() {
            return Err(ServiceError::InvalidFields(errors));
        }

        let accepted_keys = frame.data.len();
        self.sink.accept(&AcceptanceRecord {
            device_id: device.id.clone(),
            model_id: model.id.clone(),
            model_name: model.display_name.clone(),
            model_version: model.version.clone(),
            hardware_sn: frame.hardware_sn,
            observed_at: frame.observed_at,
            accepted_keys,
            data: frame.data,
        });

        Ok(IngestAck {
            ok: true,
            server_time: now_rfc3339(),
            accepted_keys,
        })
    }
}
