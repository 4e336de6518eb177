/// Runtime knobs shared by the server and the ingest module.
///
/// The binary fills this from its TOML file and command-line flags, then
/// hands the ingest-related part to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Listen address for the HTTP server.
    pub listen: String,

    /// Upper bound for a request body, in bytes.
    pub max_body_bytes: usize,

    /// Largest accepted distance between server time and `X-Timestamp`.
    pub allowed_skew_ms: u64,

    /// Tighter bound for timestamps ahead of the server clock.
    /// Falls back to `allowed_skew_ms` when unset.
    pub max_future_skew_ms: Option<u64>,

    /// The only `schemaVersion` frames may carry.
    pub schema_version: i64,
}

pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;
pub const DEFAULT_ALLOWED_SKEW_MS: u64 = 120_000;
pub const DEFAULT_SCHEMA_VERSION: i64 = 1;

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allowed_skew_ms: DEFAULT_ALLOWED_SKEW_MS,
            max_future_skew_ms: None,
            schema_version: DEFAULT_SCHEMA_VERSION,
        }
    }
}

impl ServiceConfig {
    /// Bound applied to timestamps later than the server clock.
    pub fn future_skew_ms(&self) -> u64 {
        self.max_future_skew_ms
            .map(|f| f.min(self.allowed_skew_ms))
            .unwrap_or(self.allowed_skew_ms)
    }

    /// Whether a client timestamp falls inside the replay window.
    ///
    /// Both bounds are inclusive. Computed in i128 so extreme header
    /// values cannot overflow.
    pub fn is_fresh(&self, now_ms: i64, client_ms: i64) -> bool {
        let delta = i128::from(now_ms) - i128::from(client_ms);
        if delta >= 0 {
            delta <= i128::from(self.allowed_skew_ms)
        } else {
            -delta <= i128::from(self.future_skew_ms())
        }
    }
}
