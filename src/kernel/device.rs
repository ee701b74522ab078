use log::debug;
use serde::{Deserialize, Serialize};

use super::queue::{by_cylinder, FifoQueue, PriorityQueue};
use super::{KernelError, ProcessControlBlock, ProcessLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    Printer,
    CdRw,
    DiskDrive,
}

impl DeviceKind {
    pub fn location(self) -> ProcessLocation {
        match self {
            DeviceKind::Printer => ProcessLocation::Printer,
            DeviceKind::CdRw => ProcessLocation::CdRw,
            DeviceKind::DiskDrive => ProcessLocation::DiskDrive,
        }
    }
}

/// FSCAN disk scheduler.
///
/// One queue serves the current sweep in cylinder order while the other collects new
/// requests. The collector stays frozen; when the server runs dry the two swap roles.
pub struct DiskDrive {
    queues: [PriorityQueue; 2],
    serving: usize,
    cylinders: u32,
}

impl DiskDrive {
    pub fn new(cylinders: u32) -> DiskDrive {
        DiskDrive {
            queues: [PriorityQueue::new(by_cylinder), PriorityQueue::frozen(by_cylinder)],
            serving: 0,
            cylinders,
        }
    }

    pub fn get_cylinders(&self) -> u32 {
        self.cylinders
    }

    pub fn enqueue(&mut self, pcb: ProcessControlBlock) {
        self.queues[1 - self.serving].enqueue(pcb);
    }

    pub fn dequeue(&mut self) -> Result<ProcessControlBlock, KernelError> {
        if self.is_empty() {
            return Err(KernelError::QueueEmpty);
        }

        if self.queues[self.serving].is_empty() {
            self.swap();
        }

        let pcb = self.queues[self.serving].dequeue()?;

        if self.queues[self.serving].is_empty() {
            self.swap();
        }

        Ok(pcb)
    }

    fn swap(&mut self) {
        self.queues[self.serving].freeze();
        self.serving = 1 - self.serving;
        self.queues[self.serving].unfreeze();
        debug!("Disk sweep finished, queue {} now serving", self.serving);
    }

    pub fn serving(&self) -> &PriorityQueue {
        &self.queues[self.serving]
    }

    pub fn collecting(&self) -> &PriorityQueue {
        &self.queues[1 - self.serving]
    }

    pub fn len(&self) -> usize {
        self.queues[0].len() + self.queues[1].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum DeviceQueue {
    Fifo(FifoQueue),
    Fscan(DiskDrive),
}

/// A named device with its own queue of processes waiting on a system call.
pub struct Device {
    name: String,
    kind: DeviceKind,
    queue: DeviceQueue,
}

impl Device {
    pub fn printer(name: &str) -> Device {
        Device {
            name: name.to_string(),
            kind: DeviceKind::Printer,
            queue: DeviceQueue::Fifo(FifoQueue::new()),
        }
    }

    pub fn cd_rw(name: &str) -> Device {
        Device {
            name: name.to_string(),
            kind: DeviceKind::CdRw,
            queue: DeviceQueue::Fifo(FifoQueue::new()),
        }
    }

    pub fn disk_drive(name: &str, cylinders: u32) -> Device {
        Device {
            name: name.to_string(),
            kind: DeviceKind::DiskDrive,
            queue: DeviceQueue::Fscan(DiskDrive::new(cylinders)),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_kind(&self) -> DeviceKind {
        self.kind
    }

    /// Cylinder count for disk drives, `None` for every other device.
    pub fn get_cylinders(&self) -> Option<u32> {
        match &self.queue {
            DeviceQueue::Fscan(disk) => Some(disk.get_cylinders()),
            DeviceQueue::Fifo(_) => None,
        }
    }

    pub fn enqueue(&mut self, mut pcb: ProcessControlBlock) {
        pcb.set_location(self.kind.location());
        debug!("{} queued on {}", pcb.status(), self.name);

        match &mut self.queue {
            DeviceQueue::Fifo(queue) => queue.enqueue(pcb),
            DeviceQueue::Fscan(disk) => disk.enqueue(pcb),
        }
    }

    pub fn dequeue(&mut self) -> Result<ProcessControlBlock, KernelError> {
        match &mut self.queue {
            DeviceQueue::Fifo(queue) => queue.dequeue(),
            DeviceQueue::Fscan(disk) => disk.dequeue(),
        }
    }

    /// Queued processes in service order. A disk lists its serving sweep before its collector.
    pub fn queued(&self) -> Vec<&ProcessControlBlock> {
        match &self.queue {
            DeviceQueue::Fifo(queue) => queue.iter().collect(),
            DeviceQueue::Fscan(disk) => disk.serving().iter().chain(disk.collecting().iter()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.queue {
            DeviceQueue::Fifo(queue) => queue.len(),
            DeviceQueue::Fscan(disk) => disk.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
