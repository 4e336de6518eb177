use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// A device as issued in static configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Board identifier sent as `X-Device-ID`.
    pub id: String,

    /// Pre-shared signing key handed to the board vendor.
    pub secret: String,

    /// Model identifier (DeviceModelContract.id).
    pub model: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl fmt::Debug for DeviceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceEntry")
            .field("id", &self.id)
            .field("secret", &REDACTED)
            .field("model", &self.model)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Printed in place of a device secret.
const REDACTED: &str = "<redacted>";

/// Result of a bind-or-check against a device's hardware serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The device was unbound; this serial now owns it.
    NewlyBound,
    /// The serial equals the existing binding.
    Matched,
    /// A different serial already owns the device.
    Mismatch,
}

/// A registered device at runtime.
///
/// Everything is immutable except the hardware serial binding, which
/// moves from unset to set at most once.
pub struct DeviceRecord {
    pub id: String,
    secret: Vec<u8>,
    pub model_id: String,
    pub enabled: bool,
    bound_serial: Mutex<Option<String>>,
}

impl DeviceRecord {
    pub fn new(entry: DeviceEntry) -> Self {
        Self {
            id: entry.id,
            secret: entry.secret.into_bytes(),
            model_id: entry.model,
            enabled: entry.enabled,
            bound_serial: Mutex::new(None),
        }
    }

    /// HMAC key for this device.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// The hardware serial currently bound, if any.
    pub fn bound_serial(&self) -> Option<String> {
        self.bound_serial
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// First write wins: bind when empty, otherwise compare.
    ///
    /// The lock covers only this compare-and-set.
    pub fn bind_or_check(&self, hardware_sn: &str) -> Binding {
        let mut bound = self
            .bound_serial
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match bound.as_deref() {
            None => {
                *bound = Some(hardware_sn.to_string());
                Binding::NewlyBound
            }
            Some(existing) if existing == hardware_sn => Binding::Matched,
            Some(_) => Binding::Mismatch,
        }
    }
}

impl fmt::Debug for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceRecord")
            .field("id", &self.id)
            .field("secret", &REDACTED)
            .field("model_id", &self.model_id)
            .field("enabled", &self.enabled)
            .field("bound_serial", &self.bound_serial())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn flow_device() -> DeviceRecord {
        DeviceRecord::new(DeviceEntry {
            id: "dev-flow-001".into(),
            secret: "FLw_7nQm2Zt9bH6cJ4Vr".into(),
            model: "FLOW_V1".into(),
            enabled: true,
        })
    }

    #[test]
    fn first_serial_wins() {
        let device = flow_device();
        assert_eq!(device.bound_serial(), None);
        assert_eq!(device.bind_or_check("MB-SN-FLOW-001"), Binding::NewlyBound);
        assert_eq!(device.bind_or_check("MB-SN-FLOW-001"), Binding::Matched);
        assert_eq!(device.bind_or_check("OTHER-SN"), Binding::Mismatch);
        assert_eq!(device.bound_serial().as_deref(), Some("MB-SN-FLOW-001"));
    }

    #[test]
    fn debug_output_hides_secret() {
        let device = flow_device();
        device.bind_or_check("MB-SN-FLOW-001");
        let printed = format!("{:?}", device);
        assert!(!printed.contains("FLw_7nQm2Zt9bH6cJ4Vr"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("dev-flow-001"));
        assert!(printed.contains("MB-SN-FLOW-001"));

        let entry = DeviceEntry {
            id: "dev-flow-001".into(),
            secret: "FLw_7nQm2Zt9bH6cJ4Vr".into(),
            model: "FLOW_V1".into(),
            enabled: true,
        };
        let printed = format!("{:#?}", entry);
        assert!(!printed.contains("FLw_7nQm2Zt9bH6cJ4Vr"));
        assert!(printed.contains("FLOW_V1"));
    }

    #[test]
    fn enabled_defaults_to_true() {
        let entry: DeviceEntry =
            serde_json::from_str(r#"{"id":"d","secret":"s","model":"M"}"#).unwrap();
        assert!(entry.enabled);
    }

    #[test]
    fn concurrent_first_binds_have_one_winner() {
        let device = flow_device();
        let outcomes: Vec<(String, Binding)> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let device = &device;
                    s.spawn(move || {
                        let sn = format!("SN-{i}");
                        let outcome = device.bind_or_check(&sn);
                        (sn, outcome)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners: Vec<&String> = outcomes
            .iter()
            .filter(|(_, o)| *o == Binding::NewlyBound)
            .map(|(sn, _)| sn)
            .collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(device.bound_serial().as_ref(), Some(winners[0]));

        let losers: HashSet<&String> = outcomes
            .iter()
            .filter(|(_, o)| *o == Binding::Mismatch)
            .map(|(sn, _)| sn)
            .collect();
        assert_eq!(losers.len(), 15);
    }
}
