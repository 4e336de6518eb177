//! Server-side configuration.
//!
//! Reads a TOML file describing the listener, the ingest policy, the
//! board models and the issued devices. Without a file the built-in
//! fleet in `fleet.toml` is used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ingest::model::{DeviceEntry, DeviceModelContract};
use ingest_core::config::{
    DEFAULT_ALLOWED_SKEW_MS, DEFAULT_LISTEN, DEFAULT_MAX_BODY_BYTES, DEFAULT_SCHEMA_VERSION,
};
use ingest_core::ServiceConfig;

const BUILTIN_FLEET: &str = include_str!("../fleet.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub ingest: IngestSection,

    #[serde(default)]
    pub models: Vec<DeviceModelContract>,

    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestSection {
    #[serde(default = "default_allowed_skew_ms")]
    pub allowed_skew_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_future_skew_ms: Option<u64>,

    #[serde(default = "default_schema_version")]
    pub schema_version: i64,
}

impl Default for IngestSection {
    fn default() -> Self {
        Self {
            allowed_skew_ms: default_allowed_skew_ms(),
            max_future_skew_ms: None,
            schema_version: default_schema_version(),
        }
    }
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_allowed_skew_ms() -> u64 {
    DEFAULT_ALLOWED_SKEW_MS
}

fn default_schema_version() -> i64 {
    DEFAULT_SCHEMA_VERSION
}

impl ServerConfig {
    /// Resolve a config argument to a file path.
    ///
    /// A bare name maps to `/etc/ingest/<name>.toml`; anything with a
    /// `/` or `.` is used as given.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/ingest/{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The demo fleet compiled into the binary.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_toml_str(BUILTIN_FLEET)
    }

    /// Runtime knobs, with an optional listen override from the CLI.
    pub fn service_config(&self, listen: Option<&str>) -> ServiceConfig {
        ServiceConfig {
            listen: listen.unwrap_or(&self.server.listen).to_string(),
            max_body_bytes: self.server.max_body_bytes,
            allowed_skew_ms: self.ingest.allowed_skew_ms,
            max_future_skew_ms: self.ingest.max_future_skew_ms,
            schema_version: self.ingest.schema_version,
        }
    }
}
