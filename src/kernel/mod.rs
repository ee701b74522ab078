mod cpu;
mod device;
mod error;
mod job_pool;
mod long_term_scheduler;
mod memory;
mod process_control_block;
mod queue;
mod snapshot;

pub mod driver;

/// Process identifier. Minted by the driver, starting at 1.
pub type Pid = u32;

pub use cpu::{BurstOutcome, Cpu};
pub use device::{Device, DeviceKind, DiskDrive};
pub use error::KernelError;
pub use job_pool::JobPool;
pub use long_term_scheduler::{Admission, LongTermScheduler, Termination};
pub use memory::{FrameEntry, Memory};
pub use process_control_block::{CallParams, ProcessControlBlock, ProcessLocation, ReadWrite};
pub use queue::{by_cylinder, by_estimated_burst, by_size_descending, Comparator, FifoQueue, PriorityQueue};
pub use snapshot::{ProcessView, Snapshot, SnapshotTarget};

pub use driver::{Driver, SystemCallRequest, TerminationReport};
