use serde::Serialize;

use super::{CallParams, DeviceKind, FrameEntry, Pid, ProcessControlBlock, ProcessLocation};

/// What to take a snapshot of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotTarget {
    Ready,
    Cpu,
    JobPool,
    Memory,
    Device(String),
}

/// Read-only copy of the parts of a PCB worth showing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessView {
    pub pid: Pid,
    pub location: ProcessLocation,
    pub size: usize,
    pub page_table: Vec<Option<usize>>,
    pub next_estimated_burst: f64,
    pub total_cpu_time: f64,
    pub avg_burst_time: f64,
    pub params: CallParams,
}

impl From<&ProcessControlBlock> for ProcessView {
    fn from(pcb: &ProcessControlBlock) -> Self {
        ProcessView {
            pid: pcb.get_id(),
            location: pcb.get_location(),
            size: pcb.get_size(),
            page_table: pcb.get_page_table().to_vec(),
            next_estimated_burst: pcb.get_next_estimated_burst(),
            total_cpu_time: pcb.get_total_cpu_time(),
            avg_burst_time: pcb.get_avg_burst_time(),
            params: pcb.get_params().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Snapshot {
    /// Ready processes in dispatch order.
    Ready(Vec<ProcessView>),
    Cpu(Option<ProcessView>),
    /// Pooled jobs, largest first.
    JobPool(Vec<ProcessView>),
    Memory {
        frame_size: usize,
        frames: Vec<Option<FrameEntry>>,
        free_frames: Vec<usize>,
    },
    /// Device queue in service order.
    Device {
        name: String,
        kind: DeviceKind,
        queue: Vec<ProcessView>,
    },
}
