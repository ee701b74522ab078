use log::debug;

use super::queue::{by_estimated_burst, PriorityQueue};
use super::{KernelError, ProcessControlBlock, ProcessLocation};

/// How the active process's burst ended when it left the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstOutcome {
    /// The process gave up the CPU on its own, e.g. to wait on a device.
    Completed,
    /// The process was taken off the CPU part way through its burst.
    Interrupted,
}

/// Single CPU with a shortest-estimated-burst-first ready queue. Dispatch is non-preemptive.
pub struct Cpu {
    active: Option<ProcessControlBlock>,
    ready_queue: PriorityQueue,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            active: None,
            ready_queue: PriorityQueue::new(by_estimated_burst),
        }
    }

    pub fn admit(&mut self, mut pcb: ProcessControlBlock) {
        if self.active.is_none() {
            pcb.set_location(ProcessLocation::Cpu);
            debug!("{}", pcb.status());
            self.active = Some(pcb);
        } else {
            pcb.set_location(ProcessLocation::ReadyQueue);
            debug!("{}", pcb.status());
            self.ready_queue.enqueue(pcb);
        }
    }

    /// Moves the head of the ready queue into an empty CPU.
    pub fn dispatch_next(&mut self) {
        if self.active.is_some() {
            return;
        }

        match self.ready_queue.dequeue() {
            Ok(mut pcb) => {
                pcb.set_location(ProcessLocation::Cpu);
                debug!("{}", pcb.status());
                self.active = Some(pcb);
            }
            Err(_) => debug!("Ready queue is empty, CPU is idle"),
        }
    }

    /// Removes the active process for good and dispatches the next one.
    pub fn terminate(&mut self) -> Result<ProcessControlBlock, KernelError> {
        let mut pcb = self.active.take().ok_or(KernelError::NoActiveProcess)?;
        pcb.set_location(ProcessLocation::Terminated);

        self.dispatch_next();
        Ok(pcb)
    }

    /// Takes the active process off the CPU, accounting for the time it just spent there.
    pub fn preempt(&mut self, elapsed: f64, outcome: BurstOutcome) -> Result<ProcessControlBlock, KernelError> {
        let mut pcb = self.active.take().ok_or(KernelError::NoActiveProcess)?;

        match outcome {
            BurstOutcome::Completed => pcb.record_burst_time(elapsed),
            BurstOutcome::Interrupted => pcb.update_burst_time(elapsed),
        }

        self.dispatch_next();
        Ok(pcb)
    }

    pub fn get_active(&self) -> Option<&ProcessControlBlock> {
        self.active.as_ref()
    }

    pub fn get_active_mut(&mut self) -> Option<&mut ProcessControlBlock> {
        self.active.as_mut()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Ready processes in dispatch order.
    pub fn ready(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.ready_queue.iter()
    }

    pub fn ready_len(&self) -> usize {
        self.ready_queue.len()
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
