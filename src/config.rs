use std::collections::HashSet;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::kernel::{DeviceKind, KernelError};

const MEMORY_SIZE: usize = 1024;
const FRAME_SIZE: usize = 64;
const DISK_CYLINDERS: u32 = 100;

/// A device to create at system generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    pub kind: DeviceKind,
    /// Only meaningful for disk drives.
    #[serde(default)]
    pub cylinders: u32,
}

impl DeviceConfig {
    pub fn printer(name: &str) -> DeviceConfig {
        DeviceConfig {
            name: name.to_string(),
            kind: DeviceKind::Printer,
            cylinders: 0,
        }
    }

    pub fn cd_rw(name: &str) -> DeviceConfig {
        DeviceConfig {
            name: name.to_string(),
            kind: DeviceKind::CdRw,
            cylinders: 0,
        }
    }

    pub fn disk_drive(name: &str, cylinders: u32) -> DeviceConfig {
        DeviceConfig {
            name: name.to_string(),
            kind: DeviceKind::DiskDrive,
            cylinders,
        }
    }
}

/// Everything needed to bring up a simulated system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Total physical memory in bytes.
    pub memory_size: usize,
    /// Frame (and page) size in bytes.
    pub frame_size: usize,
    pub devices: Vec<DeviceConfig>,
    pub log_level: LevelFilter,
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.frame_size == 0 {
            return Err(KernelError::InvalidConfig("frame size must be greater than zero"));
        }

        if self.memory_size == 0 || self.memory_size % self.frame_size != 0 {
            return Err(KernelError::InvalidConfig("memory size must be a positive multiple of the frame size"));
        }

        if self.devices.is_empty() {
            return Err(KernelError::InvalidConfig("at least one device is required"));
        }

        let mut names = HashSet::new();
        for device in &self.devices {
            if !names.insert(device.name.as_str()) {
                return Err(KernelError::InvalidConfig("device names must be unique"));
            }

            if device.kind == DeviceKind::DiskDrive && device.cylinders == 0 {
                return Err(KernelError::InvalidConfig("disk drives need at least one cylinder"));
            }
        }

        Ok(())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            memory_size: MEMORY_SIZE,
            frame_size: FRAME_SIZE,
            devices: vec![
                DeviceConfig::printer("p1"),
                DeviceConfig::cd_rw("c1"),
                DeviceConfig::disk_drive("d1", DISK_CYLINDERS),
            ],
            log_level: LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_config_default_is_valid() {
        let config = SystemConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.devices.len(), 3);
    }

    #[test]
    fn test_system_config_rejects_zero_frame_size() {
        let config = SystemConfig {
            frame_size: 0,
            ..SystemConfig::default()
        };
        assert!(matches!(config.validate(), Err(KernelError::InvalidConfig(_))));
    }

    #[test]
    fn test_system_config_rejects_partial_frame() {
        let config = SystemConfig {
            memory_size: 1000,
            frame_size: 64,
            ..SystemConfig::default()
        };
        assert!(matches!(config.validate(), Err(KernelError::InvalidConfig(_))));
    }

    #[test]
    fn test_system_config_rejects_duplicate_device_names() {
        let config = SystemConfig {
            devices: vec![DeviceConfig::printer("p1"), DeviceConfig::cd_rw("p1")],
            ..SystemConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(KernelError::InvalidConfig("device names must be unique"))
        );
    }

    #[test]
    fn test_system_config_rejects_disk_without_cylinders() {
        let config = SystemConfig {
            devices: vec![DeviceConfig::disk_drive("d1", 0)],
            ..SystemConfig::default()
        };
        assert!(matches!(config.validate(), Err(KernelError::InvalidConfig(_))));
    }
}
