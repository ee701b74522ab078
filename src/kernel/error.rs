use std::error::Error;
use std::fmt;

use super::Pid;

/// Every recoverable failure the simulated kernel can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Dequeue attempted on an empty or frozen queue.
    QueueEmpty,
    InsufficientMemory,
    InvalidProcess(Pid),
    InvalidPage,
    /// No pooled job fits in the memory currently free.
    NoFit,
    NoActiveProcess,
    InvalidDevice(String),
    InvalidCylinder { requested: u32, cylinders: u32 },
    MissingParameter(&'static str),
    InvalidParameter(&'static str),
    InvalidConfig(&'static str),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::QueueEmpty => write!(f, "Queue is empty"),
            KernelError::InsufficientMemory => write!(f, "Not enough free memory for process"),
            KernelError::InvalidProcess(pid) => write!(f, "Process #{} does not exist", pid),
            KernelError::InvalidPage => write!(f, "Logical address is outside the process's pages"),
            KernelError::NoFit => write!(f, "No job in the job pool fits in free memory"),
            KernelError::NoActiveProcess => write!(f, "No active process in the CPU"),
            KernelError::InvalidDevice(name) => write!(f, "Unknown device: {}", name),
            KernelError::InvalidCylinder { requested, cylinders } => write!(
                f,
                "Cylinder {} is out of range, disk has {} cylinders",
                requested, cylinders
            ),
            KernelError::MissingParameter(name) => write!(f, "Missing system call parameter: {}", name),
            KernelError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            KernelError::InvalidConfig(msg) => write!(f, "Invalid system configuration: {}", msg),
        }
    }
}

impl Error for KernelError {}
