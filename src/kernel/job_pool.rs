use log::debug;

use super::queue::{by_size_descending, PriorityQueue};
use super::{KernelError, Pid, ProcessControlBlock, ProcessLocation};

/// Processes waiting for enough free memory, largest first.
pub struct JobPool {
    pool: PriorityQueue,
}

impl JobPool {
    pub fn new() -> JobPool {
        JobPool {
            pool: PriorityQueue::new(by_size_descending),
        }
    }

    pub fn enqueue(&mut self, mut pcb: ProcessControlBlock) {
        pcb.set_location(ProcessLocation::JobPool);
        debug!("{}", pcb.status());
        self.pool.enqueue(pcb);
    }

    /// Removes the largest job no bigger than `max_size`. Equal sizes leave in arrival order.
    pub fn dequeue_largest(&mut self, max_size: usize) -> Result<ProcessControlBlock, KernelError> {
        if self.pool.is_empty() {
            return Err(KernelError::QueueEmpty);
        }

        self.pool
            .remove_first(|pcb| pcb.get_size() <= max_size)
            .ok_or(KernelError::NoFit)
    }

    pub fn dequeue(&mut self, pid: Pid) -> Result<ProcessControlBlock, KernelError> {
        if self.pool.is_empty() {
            return Err(KernelError::QueueEmpty);
        }

        self.pool.remove(pid).ok_or(KernelError::InvalidProcess(pid))
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.pool.iter().any(|pcb| pcb.get_id() == pid)
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.pool.iter()
    }
}

impl Default for JobPool {
    fn default() -> Self {
        Self::new()
    }
}
