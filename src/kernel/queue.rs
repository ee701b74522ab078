use std::cmp::Ordering;
use std::collections::VecDeque;

use super::{KernelError, Pid, ProcessControlBlock};

/// Ordering strategy a priority queue is built with.
pub type Comparator = fn(&ProcessControlBlock, &ProcessControlBlock) -> Ordering;

/// Ready queue order: shortest estimated burst first, then lowest pid.
pub fn by_estimated_burst(a: &ProcessControlBlock, b: &ProcessControlBlock) -> Ordering {
    a.get_next_estimated_burst()
        .total_cmp(&b.get_next_estimated_burst())
        .then_with(|| a.get_id().cmp(&b.get_id()))
}

/// Disk queue order: lowest requested cylinder first, then lowest pid.
pub fn by_cylinder(a: &ProcessControlBlock, b: &ProcessControlBlock) -> Ordering {
    let a_cylinder = a.get_params().cylinder.unwrap_or(0);
    let b_cylinder = b.get_params().cylinder.unwrap_or(0);

    a_cylinder
        .cmp(&b_cylinder)
        .then_with(|| a.get_id().cmp(&b.get_id()))
}

/// Job pool order: largest first. Equal sizes keep insertion order.
pub fn by_size_descending(a: &ProcessControlBlock, b: &ProcessControlBlock) -> Ordering {
    b.get_size().cmp(&a.get_size())
}

pub struct FifoQueue {
    queue: VecDeque<ProcessControlBlock>,
}

impl FifoQueue {
    pub fn new() -> FifoQueue {
        FifoQueue {
            queue: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, pcb: ProcessControlBlock) {
        self.queue.push_back(pcb);
    }

    pub fn dequeue(&mut self) -> Result<ProcessControlBlock, KernelError> {
        self.queue.pop_front().ok_or(KernelError::QueueEmpty)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.queue.iter()
    }
}

impl Default for FifoQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted queue. While frozen it accepts new entries but refuses to hand any out.
pub struct PriorityQueue {
    queue: Vec<ProcessControlBlock>,
    order: Comparator,
    frozen: bool,
}

impl PriorityQueue {
    pub fn new(order: Comparator) -> PriorityQueue {
        PriorityQueue {
            queue: Vec::new(),
            order,
            frozen: false,
        }
    }

    pub fn frozen(order: Comparator) -> PriorityQueue {
        PriorityQueue {
            frozen: true,
            ..PriorityQueue::new(order)
        }
    }

    /// Inserts after every entry that does not order after `pcb`, so ties keep arrival order.
    pub fn enqueue(&mut self, pcb: ProcessControlBlock) {
        let order = self.order;
        let idx = self.queue.partition_point(|queued| order(queued, &pcb) != Ordering::Greater);
        self.queue.insert(idx, pcb);
    }

    pub fn dequeue(&mut self) -> Result<ProcessControlBlock, KernelError> {
        if self.frozen || self.queue.is_empty() {
            return Err(KernelError::QueueEmpty);
        }

        Ok(self.queue.remove(0))
    }

    /// Removes the first entry (in queue order) matching `predicate`. Ignores the frozen flag.
    pub fn remove_first<F>(&mut self, predicate: F) -> Option<ProcessControlBlock>
    where
        F: Fn(&ProcessControlBlock) -> bool,
    {
        let idx = self.queue.iter().position(predicate)?;
        Some(self.queue.remove(idx))
    }

    pub fn remove(&mut self, pid: Pid) -> Option<ProcessControlBlock> {
        self.remove_first(|pcb| pcb.get_id() == pid)
    }

    pub fn peek(&self) -> Option<&ProcessControlBlock> {
        self.queue.first()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.queue.iter()
    }
}
