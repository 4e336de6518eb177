pub mod clock;
pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ServiceConfig;
pub use error::{FieldViolation, ServiceError};
pub use module::Module;
pub use types::{now_millis, now_rfc3339};
