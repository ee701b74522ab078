use log::{debug, info, warn};

use super::{JobPool, KernelError, Memory, Pid, ProcessControlBlock};

/// Result of trying to place a new process in memory.
#[derive(Debug)]
pub enum Admission {
    /// Memory was allocated; the process is ready for the CPU.
    Admitted(ProcessControlBlock),
    /// Not enough free memory; the process waits in the job pool.
    Deferred(Pid),
}

/// Result of terminating a process through the long-term scheduler.
#[derive(Debug)]
pub enum Termination {
    /// The process was resident. Holds the pooled jobs that the freed memory let in.
    Released(Vec<ProcessControlBlock>),
    /// The process never left the job pool and was simply dropped from it.
    Cancelled(ProcessControlBlock),
}

/// Admission control between memory and the job pool.
pub struct LongTermScheduler {
    memory: Memory,
    job_pool: JobPool,
}

impl LongTermScheduler {
    pub fn new(memory: Memory) -> LongTermScheduler {
        LongTermScheduler {
            memory,
            job_pool: JobPool::new(),
        }
    }

    pub fn get_memory(&self) -> &Memory {
        &self.memory
    }

    pub fn get_job_pool(&self) -> &JobPool {
        &self.job_pool
    }

    pub fn schedule(&mut self, mut pcb: ProcessControlBlock) -> Admission {
        match self.memory.allocate(&mut pcb) {
            Ok(()) => {
                info!("Process #{} admitted into memory", pcb.get_id());
                Admission::Admitted(pcb)
            }
            Err(err) => {
                let pid = pcb.get_id();
                warn!("Process #{} deferred to job pool: {}", pid, err);
                self.job_pool.enqueue(pcb);
                Admission::Deferred(pid)
            }
        }
    }

    pub fn terminate(&mut self, pid: Pid) -> Result<Termination, KernelError> {
        if self.memory.is_resident(pid) {
            self.memory.deallocate(pid)?;
            return Ok(Termination::Released(self.backfill()));
        }

        let pcb = self.job_pool.dequeue(pid).map_err(|_| KernelError::InvalidProcess(pid))?;
        info!("Process #{} removed from job pool", pid);
        Ok(Termination::Cancelled(pcb))
    }

    /// Admits the largest pooled jobs that fit until the pool is empty or nothing fits.
    fn backfill(&mut self) -> Vec<ProcessControlBlock> {
        let mut admitted = Vec::new();

        while self.memory.get_free_memory() > 0 {
            let mut pcb = match self.job_pool.dequeue_largest(self.memory.get_free_memory()) {
                Ok(pcb) => pcb,
                Err(err) => {
                    debug!("Job pool backfill stopped: {}", err);
                    break;
                }
            };

            match self.memory.allocate(&mut pcb) {
                Ok(()) => {
                    info!("Process #{} admitted from job pool", pcb.get_id());
                    admitted.push(pcb);
                }
                Err(err) => {
                    debug!("Job pool backfill stopped: {}", err);
                    self.job_pool.enqueue(pcb);
                    break;
                }
            }
        }

        admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcb(id: Pid, size: usize) -> ProcessControlBlock {
        ProcessControlBlock::new(id, size, 100, 0.5, 10.0)
    }

    fn ids(pcbs: &[ProcessControlBlock]) -> Vec<Pid> {
        pcbs.iter().map(|pcb| pcb.get_id()).collect()
    }

    #[test]
    fn test_long_term_scheduler_schedule_admitted() {
        let mut lts = LongTermScheduler::new(Memory::new(1000, 100));

        let admission = lts.schedule(pcb(1, 450));

        assert!(matches!(admission, Admission::Admitted(ref pcb) if pcb.get_id() == 1));
        assert_eq!(lts.get_memory().get_free_memory(), 500);
    }

    #[test]
    fn test_long_term_scheduler_schedule_deferred() {
        let mut lts = LongTermScheduler::new(Memory::new(1000, 100));
        lts.schedule(pcb(1, 450));

        let admission = lts.schedule(pcb(2, 600));

        assert!(matches!(admission, Admission::Deferred(2)));
        assert!(lts.get_job_pool().contains(2));
        assert!(!lts.get_memory().is_resident(2));
    }

    #[test]
    fn test_long_term_scheduler_terminate_backfills_from_job_pool() {
        let mut lts = LongTermScheduler::new(Memory::new(1000, 100));
        lts.schedule(pcb(1, 450));
        lts.schedule(pcb(2, 600));

        let termination = lts.terminate(1).unwrap();

        match termination {
            Termination::Released(admitted) => assert_eq!(ids(&admitted), vec![2]),
            Termination::Cancelled(_) => panic!("resident process was treated as pooled"),
        }
        assert_eq!(lts.get_memory().get_free_memory(), 400);
        assert!(lts.get_job_pool().is_empty());
    }

    #[test]
    fn test_long_term_scheduler_terminate_backfills_largest_first() {
        let mut lts = LongTermScheduler::new(Memory::new(1000, 100));
        lts.schedule(pcb(1, 900));
        lts.schedule(pcb(2, 300));
        lts.schedule(pcb(3, 500));
        lts.schedule(pcb(4, 400));
        lts.schedule(pcb(5, 300));

        let Termination::Released(admitted) = lts.terminate(1).unwrap() else {
            panic!("resident process was treated as pooled");
        };

        assert_eq!(ids(&admitted), vec![3, 4]);
        assert_eq!(lts.get_memory().get_free_memory(), 100);
        assert_eq!(lts.get_job_pool().len(), 2);
    }

    #[test]
    fn test_long_term_scheduler_terminate_cancels_pooled_job() {
        let mut lts = LongTermScheduler::new(Memory::new(1000, 100));
        lts.schedule(pcb(1, 800));
        lts.schedule(pcb(2, 600));

        let termination = lts.terminate(2).unwrap();

        assert!(matches!(termination, Termination::Cancelled(ref pcb) if pcb.get_id() == 2));
        assert!(lts.get_job_pool().is_empty());
        assert!(lts.get_memory().is_resident(1));
    }

    #[test]
    fn test_long_term_scheduler_terminate_unknown_process() {
        let mut lts = LongTermScheduler::new(Memory::new(1000, 100));
        lts.schedule(pcb(1, 800));

        assert_eq!(lts.terminate(9).unwrap_err(), KernelError::InvalidProcess(9));
    }
}
