//! Startup checks and registry construction.
//!
//! When ingestd starts:
//! 1. Verify the ingest policy is usable; otherwise refuse to start.
//! 2. Build the model and device registries; any dangling reference or
//!    duplicate id is fatal.
//! 3. Log the fleet (never the secrets).

use tracing::{info, warn};

use ingest::registry::{DeviceRegistry, ModelRegistry};
use ingest::service::IngestService;
use ingest_core::ServiceConfig;

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.ingest.allowed_skew_ms == 0 {
        anyhow::bail!("ingest.allowed_skew_ms must be greater than zero.");
    }
    if config.server.max_body_bytes == 0 {
        anyhow::bail!("server.max_body_bytes must be greater than zero.");
    }
    if config.models.is_empty() {
        anyhow::bail!("No device models configured.");
    }
    if config.devices.is_empty() {
        warn!("No devices configured; every frame will be rejected");
    }
    Ok(())
}

/// Build the registries and the ingest service.
pub fn build_service(config: &ServerConfig, service_config: ServiceConfig) -> anyhow::Result<IngestService> {
    let models = ModelRegistry::new(config.models.clone())
        .map_err(|e| anyhow::anyhow!("invalid model configuration: {}", e))?;
    let devices = DeviceRegistry::new(config.devices.clone(), &models)
        .map_err(|e| anyhow::anyhow!("invalid device configuration: {}", e))?;

    for (first, second) in devices.shared_secrets() {
        warn!("Devices {} and {} share the same secret", first, second);
    }

    Ok(IngestService::new(models, devices, service_config))
}

/// Startup banner: one line per device.
pub fn log_fleet(service: &IngestService) {
    info!(
        "{} models, {} devices loaded",
        service.models().len(),
        service.devices().len()
    );
    for device in service.devices().iter() {
        info!(
            device = %device.id,
            model = %device.model_id,
            enabled = device.enabled,
            "device registered"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_fleet_builds() {
        let config = ServerConfig::builtin().unwrap();
        verify_config(&config).unwrap();
        let svc = build_service(&config, config.service_config(None)).unwrap();
        assert_eq!(svc.devices().len(), 6);
        assert!(svc.devices().shared_secrets().is_empty());
    }

    #[test]
    fn test_verify_config_zero_skew() {
        let mut config = ServerConfig::builtin().unwrap();
        config.ingest.allowed_skew_ms = 0;
        assert!(verify_config(&config).is_err());
    }

    #[test]
    fn test_verify_config_no_models() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert!(verify_config(&config).is_err());
    }

    #[test]
    fn test_dangling_model_reference_is_fatal() {
        let mut config = ServerConfig::builtin().unwrap();
        config.devices[0].model = "GHOST_V1".into();
        let Err(err) = build_service(&config, config.service_config(None)) else {
            panic!("expected dangling model error");
        };
        assert!(err.to_string().contains("GHOST_V1"));
    }

    #[test]
    fn test_duplicate_device_is_fatal() {
        let mut config = ServerConfig::builtin().unwrap();
        let dup = config.devices[0].clone();
        config.devices.push(dup);
        assert!(build_service(&config, config.service_config(None)).is_err());
    }
}
