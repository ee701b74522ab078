pub mod config;
pub mod kernel;

pub use config::{DeviceConfig, SystemConfig};
pub use kernel::{Driver, KernelError, Pid, Snapshot, SnapshotTarget, SystemCallRequest};
