//! Wire payload of `POST /v1/ingest`.
//!
//! The body is decoded only after the signature over its raw bytes has
//! been verified. Shape checks run in a fixed order and the first
//! failure is reported.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use ingest_core::ServiceError;

/// A decoded, shape-checked frame.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestFrame {
    pub schema_version: i64,
    pub hardware_sn: String,
    /// `observedAt` exactly as the device sent it.
    pub observed_at: String,
    pub observed_at_utc: DateTime<Utc>,
    /// Flat key → scalar map. Types are checked later against the model.
    pub data: Map<String, Value>,
}

impl IngestFrame {
    /// Decode `body` and check its structure.
    pub fn parse(body: &[u8], supported_version: i64) -> Result<Self, ServiceError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| bad_request("malformed JSON body"))?;
        let Value::Object(mut root) = value else {
            return Err(bad_request("body must be a JSON object"));
        };

        let schema_version = root
            .get("schemaVersion")
            .and_then(integral)
            .filter(|v| *v == supported_version)
            .ok_or_else(|| bad_request("schemaVersion mismatch"))?;

        let hardware_sn = match root.remove("hardwareSN") {
            Some(Value::String(sn)) if !sn.is_empty() => sn,
            _ => return Err(bad_request("hardwareSN required")),
        };

        let (observed_at, observed_at_utc) = match root.remove("observedAt") {
            Some(Value::String(raw)) => match parse_timestamp(&raw) {
                Some(ts) => (raw, ts),
                None => return Err(bad_request("observedAt must be ISO string")),
            },
            _ => return Err(bad_request("observedAt must be ISO string")),
        };

        let data = match root.remove("data") {
            Some(Value::Object(data)) => data,
            _ => return Err(bad_request("data object required")),
        };
        if data.values().any(|v| v.is_object() || v.is_array()) {
            return Err(bad_request("data must be a flat object"));
        }

        Ok(Self {
            schema_version,
            hardware_sn,
            observed_at,
            observed_at_utc,
            data,
        })
    }
}

fn bad_request(msg: &str) -> ServiceError {
    ServiceError::BadRequest(msg.to_string())
}

/// `1` and `1.0` are the same version; `1.5` is not an integer.
fn integral(value: &Value) -> Option<i64> {
    let n = value.as_number()?;
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| f as i64)
    })
}

/// ISO-8601 in the forms boards actually send: full RFC 3339, local
/// date-time without offset (read as UTC), or a bare date.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
