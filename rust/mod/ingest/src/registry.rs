//! In-memory registries built once at startup.
//!
//! `ModelRegistry` is read-only after construction. `DeviceRegistry`
//! is read-only too, apart from each record's hardware serial binding.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::{DeviceEntry, DeviceModelContract, DeviceRecord};

/// Static configuration rejected while building a registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("model id must not be empty")]
    EmptyModelId,

    #[error("duplicate model id {0}")]
    DuplicateModel(String),

    #[error("model {model} declares key {key} more than once")]
    DuplicateField { model: String, key: String },

    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("duplicate device id {0}")]
    DuplicateDevice(String),

    #[error("device {0} has an empty secret")]
    EmptySecret(String),

    #[error("device {device} references unknown model {model}")]
    UnknownModel { device: String, model: String },
}

/// Model id → field contract.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, DeviceModelContract>,
}

impl ModelRegistry {
    pub fn new(models: Vec<DeviceModelContract>) -> Result<Self, RegistryError> {
        let mut map = HashMap::with_capacity(models.len());
        for model in models {
            if model.id.is_empty() {
                return Err(RegistryError::EmptyModelId);
            }
            let mut keys = HashSet::new();
            for field in &model.fields {
                if !keys.insert(field.key.as_str()) {
                    return Err(RegistryError::DuplicateField {
                        model: model.id.clone(),
                        key: field.key.clone(),
                    });
                }
            }
            if map.contains_key(&model.id) {
                return Err(RegistryError::DuplicateModel(model.id));
            }
            map.insert(model.id.clone(), model);
        }
        Ok(Self { models: map })
    }

    pub fn lookup(&self, model_id: &str) -> Option<&DeviceModelContract> {
        self.models.get(model_id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Device id → runtime record.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, DeviceRecord>,
}

impl DeviceRegistry {
    /// Build from configuration. Every device must reference a model
    /// present in `models`.
    pub fn new(entries: Vec<DeviceEntry>, models: &ModelRegistry) -> Result<Self, RegistryError> {
        let mut devices = HashMap::with_capacity(entries.len());
        for entry in entries {
            if entry.id.is_empty() {
                return Err(RegistryError::EmptyDeviceId);
            }
            if entry.secret.is_empty() {
                return Err(RegistryError::EmptySecret(entry.id));
            }
            if models.lookup(&entry.model).is_none() {
                return Err(RegistryError::UnknownModel {
                    device: entry.id,
                    model: entry.model,
                });
            }
            if devices.contains_key(&entry.id) {
                return Err(RegistryError::DuplicateDevice(entry.id));
            }
            devices.insert(entry.id.clone(), DeviceRecord::new(entry));
        }
        Ok(Self { devices })
    }

    pub fn lookup(&self, device_id: &str) -> Option<&DeviceRecord> {
        self.devices.get(device_id)
    }

    /// Lookup that also hides disabled devices.
    pub fn lookup_enabled(&self, device_id: &str) -> Option<&DeviceRecord> {
        self.lookup(device_id).filter(|d| d.enabled)
    }

    /// Devices sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        let mut all: Vec<&DeviceRecord> = self.devices.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all.into_iter()
    }

    /// Pairs of device ids that were issued the same secret.
    pub fn shared_secrets(&self) -> Vec<(String, String)> {
        let mut seen: HashMap<&[u8], &str> = HashMap::new();
        let mut pairs = Vec::new();
        for device in self.iter() {
            if let Some(first) = seen.insert(device.secret(), &device.id) {
                pairs.push((first.to_string(), device.id.clone()));
            }
        }
        pairs
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
