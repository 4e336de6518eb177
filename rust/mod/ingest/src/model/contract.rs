use serde::{Deserialize, Serialize};

/// Runtime type a field value must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Boolean,
}

/// One whitelisted key in a model contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub key: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,
}

impl FieldRule {
    pub fn required(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            field_type,
            required: true,
        }
    }

    pub fn optional(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            field_type,
            required: false,
        }
    }
}

/// The field whitelist for one class of sensor board.
/// PK = id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceModelContract {
    /// Model identifier referenced by devices (e.g. `FLOW_V1`).
    pub id: String,

    /// Board name shown in the manifest (e.g. `flow-board`).
    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub version: String,

    /// Ordered field rules. Keys are unique.
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

impl DeviceModelContract {
    pub fn field(&self, key: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldRule> {
        self.fields.iter().filter(|f| f.required)
    }
}
