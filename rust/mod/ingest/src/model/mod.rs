pub mod contract;
pub mod device;
pub mod frame;

pub use contract::{DeviceModelContract, FieldRule, FieldType};
pub use device::{Binding, DeviceEntry, DeviceRecord};
pub use frame::IngestFrame;
