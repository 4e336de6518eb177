//! Device manifest: the keys a board is allowed to send.

use serde::Serialize;

use ingest_core::ServiceError;

use crate::model::FieldRule;

use super::IngestService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub ok: bool,
    pub device_id: String,
    pub model: String,
    pub display_name: String,
    pub version: String,
    pub keys: Vec<FieldRule>,
    pub schema_version: i64,
}

impl IngestService {
    /// Contract for `device_id`. Never exposes the secret or the binding.
    pub fn manifest(&self, device_id: &str) -> Result<Manifest, ServiceError> {
        let device = self
            .devices
            .lookup(device_id)
            .ok_or_else(|| ServiceError::NotFound("unknown deviceId".into()))?;
        let model = self
            .models
            .lookup(&device.model_id)
            .ok_or_else(|| ServiceError::Internal("server model missing".into()))?;
        Ok(Manifest {
            ok: true,
            device_id: device.id.clone(),
            model: model.id.clone(),
            display_name: model.display_name.clone(),
            version: model.version.clone(),
            keys: model.fields.clone(),
            schema_version: self.config.schema_version,
        })
    }
}
