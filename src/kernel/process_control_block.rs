use std::fmt;

use serde::Serialize;

use super::{KernelError, Pid};

/// Which component currently owns a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessLocation {
    ReadyQueue,
    Cpu,
    DiskDrive,
    Printer,
    CdRw,
    JobPool,
    Terminated,
}

impl fmt::Display for ProcessLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessLocation::ReadyQueue => "ready queue",
            ProcessLocation::Cpu => "CPU",
            ProcessLocation::DiskDrive => "disk drive queue",
            ProcessLocation::Printer => "printer queue",
            ProcessLocation::CdRw => "CD/RW queue",
            ProcessLocation::JobPool => "job pool",
            ProcessLocation::Terminated => "terminated state",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadWrite {
    Read,
    Write,
}

/// Parameters handed over by a system call. Cleared once the device is done with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallParams {
    pub file_name: Option<String>,
    pub logical_address: Option<usize>,
    pub physical_address: Option<usize>,
    pub rw: Option<ReadWrite>,
    pub file_length: Option<usize>,
    pub cylinder: Option<u32>,
}

/// The process control block. Holds identity, memory mapping and CPU burst history.
#[derive(Debug, Clone)]
pub struct ProcessControlBlock {
    id: Pid,
    location: ProcessLocation,

    size: usize,
    page_size: usize,
    page_table: Vec<Option<usize>>,

    alpha: f64,
    last_estimated_burst: f64,
    next_estimated_burst: f64,
    current_burst: f64,
    total_cpu_time: f64,
    burst_history: Vec<f64>,

    params: CallParams,
}

impl ProcessControlBlock {
    /// `page_size` must be non-zero; the page count is `ceil(size / page_size)`.
    pub fn new(id: Pid, size: usize, page_size: usize, alpha: f64, tau: f64) -> ProcessControlBlock {
        let page_count = size.div_ceil(page_size);

        ProcessControlBlock {
            id,
            location: ProcessLocation::ReadyQueue,
            size,
            page_size,
            page_table: vec![None; page_count],
            alpha,
            last_estimated_burst: tau,
            next_estimated_burst: tau,
            current_burst: 0.0,
            total_cpu_time: 0.0,
            burst_history: Vec::new(),
            params: CallParams::default(),
        }
    }

    pub fn get_id(&self) -> Pid {
        self.id
    }

    pub fn get_location(&self) -> ProcessLocation {
        self.location
    }

    pub fn set_location(&mut self, location: ProcessLocation) {
        self.location = location;
    }

    pub fn get_size(&self) -> usize {
        self.size
    }

    pub fn get_page_size(&self) -> usize {
        self.page_size
    }

    pub fn get_page_count(&self) -> usize {
        self.page_table.len()
    }

    pub fn get_page_table(&self) -> &[Option<usize>] {
        &self.page_table
    }

    pub fn get_alpha(&self) -> f64 {
        self.alpha
    }

    pub fn get_next_estimated_burst(&self) -> f64 {
        self.next_estimated_burst
    }

    pub fn get_last_estimated_burst(&self) -> f64 {
        self.last_estimated_burst
    }

    pub fn get_burst_history(&self) -> &[f64] {
        &self.burst_history
    }

    pub fn get_total_cpu_time(&self) -> f64 {
        self.total_cpu_time
    }

    pub fn get_avg_burst_time(&self) -> f64 {
        if self.burst_history.is_empty() {
            return 0.0;
        }

        self.total_cpu_time / self.burst_history.len() as f64
    }

    /// Finishes the current burst and predicts the next one.
    ///
    /// `alpha` weights the burst just observed, `1 - alpha` the previous estimate:
    /// `next = alpha * burst + (1 - alpha) * last_estimate`.
    pub fn record_burst_time(&mut self, elapsed: f64) {
        let burst = self.current_burst + elapsed;

        self.burst_history.push(burst);
        self.total_cpu_time += elapsed;
        self.current_burst = 0.0;

        self.next_estimated_burst = self.alpha * burst + (1.0 - self.alpha) * self.last_estimated_burst;
        self.last_estimated_burst = self.next_estimated_burst;
    }

    /// Accounts for a partial burst. The remaining estimate shrinks but never below zero.
    pub fn update_burst_time(&mut self, elapsed: f64) {
        self.current_burst += elapsed;
        self.total_cpu_time += elapsed;
        self.next_estimated_burst = (self.next_estimated_burst - elapsed).max(0.0);
    }

    pub fn allocate_memory(&mut self, page: usize, frame: usize) -> Result<(), KernelError> {
        let entry = self.page_table.get_mut(page).ok_or(KernelError::InvalidPage)?;
        *entry = Some(frame);
        Ok(())
    }

    pub fn release_memory(&mut self) {
        self.page_table.iter_mut().for_each(|entry| *entry = None);
    }

    pub fn translate(&self, logical_address: usize) -> Result<usize, KernelError> {
        let page = logical_address / self.page_size;
        let offset = logical_address % self.page_size;

        let frame = self.page_table
            .get(page)
            .copied()
            .flatten()
            .ok_or(KernelError::InvalidPage)?;

        Ok(frame * self.page_size + offset)
    }

    pub fn get_params(&self) -> &CallParams {
        &self.params
    }

    /// Stores system call parameters, translating the logical address if one was given.
    pub fn set_call_params(&mut self, mut params: CallParams) -> Result<(), KernelError> {
        params.physical_address = match params.logical_address {
            Some(logical_address) => Some(self.translate(logical_address)?),
            None => None,
        };

        self.params = params;
        Ok(())
    }

    pub fn clear_params(&mut self) {
        self.params = CallParams::default();
    }

    pub fn status(&self) -> String {
        match self.location {
            ProcessLocation::Terminated => format!("Process #{} is terminated", self.id),
            ProcessLocation::Cpu => format!("Process #{} is in the CPU", self.id),
            location => format!("Process #{} is in the {}", self.id, location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped_pcb() -> ProcessControlBlock {
        let mut pcb = ProcessControlBlock::new(1, 250, 100, 0.5, 10.0);
        pcb.allocate_memory(0, 4).unwrap();
        pcb.allocate_memory(1, 2).unwrap();
        pcb.allocate_memory(2, 7).unwrap();
        pcb
    }

    #[test]
    fn test_pcb_new_page_count_rounds_up() {
        let pcb = ProcessControlBlock::new(1, 250, 100, 0.5, 10.0);
        assert_eq!(pcb.get_page_count(), 3);
        assert_eq!(pcb.get_page_table(), &[None, None, None]);
        assert_eq!(pcb.get_next_estimated_burst(), 10.0);
    }

    #[test]
    fn test_pcb_record_burst_time() {
        let mut pcb = ProcessControlBlock::new(1, 100, 100, 0.5, 10.0);

        pcb.record_burst_time(6.0);
        assert_eq!(pcb.get_next_estimated_burst(), 8.0);

        pcb.record_burst_time(4.0);
        assert_eq!(pcb.get_next_estimated_burst(), 6.0);
        assert_eq!(pcb.get_burst_history(), &[6.0, 4.0]);
        assert_eq!(pcb.get_total_cpu_time(), 10.0);
        assert_eq!(pcb.get_avg_burst_time(), 5.0);
    }

    #[test]
    fn test_pcb_record_burst_time_alpha_weights_recent_burst() {
        let mut pcb = ProcessControlBlock::new(1, 100, 100, 1.0, 10.0);
        pcb.record_burst_time(3.0);
        assert_eq!(pcb.get_next_estimated_burst(), 3.0);

        let mut pcb = ProcessControlBlock::new(2, 100, 100, 0.0, 10.0);
        pcb.record_burst_time(3.0);
        assert_eq!(pcb.get_next_estimated_burst(), 10.0);
    }

    #[test]
    fn test_pcb_update_burst_time_floors_at_zero() {
        let mut pcb = ProcessControlBlock::new(1, 100, 100, 0.5, 10.0);

        pcb.update_burst_time(4.0);
        assert_eq!(pcb.get_next_estimated_burst(), 6.0);
        assert!(pcb.get_burst_history().is_empty());

        pcb.update_burst_time(9.0);
        assert_eq!(pcb.get_next_estimated_burst(), 0.0);
        assert_eq!(pcb.get_last_estimated_burst(), 10.0);
    }

    #[test]
    fn test_pcb_partial_bursts_accumulate_into_recorded_burst() {
        let mut pcb = ProcessControlBlock::new(1, 100, 100, 0.5, 10.0);

        pcb.update_burst_time(2.0);
        pcb.record_burst_time(4.0);

        assert_eq!(pcb.get_burst_history(), &[6.0]);
        assert_eq!(pcb.get_total_cpu_time(), 6.0);
        assert_eq!(pcb.get_next_estimated_burst(), 8.0);
    }

    #[test]
    fn test_pcb_avg_burst_time_without_history() {
        let pcb = ProcessControlBlock::new(1, 100, 100, 0.5, 10.0);
        assert_eq!(pcb.get_avg_burst_time(), 0.0);
    }

    #[test]
    fn test_pcb_allocate_memory_invalid_page() {
        let mut pcb = ProcessControlBlock::new(1, 250, 100, 0.5, 10.0);
        assert_eq!(pcb.allocate_memory(3, 0), Err(KernelError::InvalidPage));
    }

    #[test]
    fn test_pcb_translate() {
        let pcb = mapped_pcb();
        assert_eq!(pcb.translate(0), Ok(400));
        assert_eq!(pcb.translate(150), Ok(250));
        assert_eq!(pcb.translate(299), Ok(799));
        assert_eq!(pcb.translate(300), Err(KernelError::InvalidPage));
    }

    #[test]
    fn test_pcb_translate_unmapped_page() {
        let mut pcb = mapped_pcb();
        pcb.release_memory();
        assert_eq!(pcb.translate(0), Err(KernelError::InvalidPage));
    }

    #[test]
    fn test_pcb_set_then_clear_call_params() {
        let mut pcb = mapped_pcb();
        let params = CallParams {
            file_name: Some("notes.txt".to_string()),
            logical_address: Some(110),
            rw: Some(ReadWrite::Write),
            file_length: Some(32),
            ..CallParams::default()
        };

        pcb.set_call_params(params).unwrap();
        assert_eq!(pcb.get_params().physical_address, Some(210));
        assert_eq!(pcb.get_params().file_name.as_deref(), Some("notes.txt"));

        pcb.clear_params();
        assert_eq!(pcb.get_params(), &CallParams::default());
    }

    #[test]
    fn test_pcb_set_call_params_invalid_address_keeps_old_params() {
        let mut pcb = mapped_pcb();
        let params = CallParams {
            logical_address: Some(1000),
            ..CallParams::default()
        };

        assert_eq!(pcb.set_call_params(params), Err(KernelError::InvalidPage));
        assert_eq!(pcb.get_params(), &CallParams::default());
    }

    #[test]
    fn test_pcb_status() {
        let mut pcb = ProcessControlBlock::new(3, 100, 100, 0.5, 10.0);
        assert_eq!(pcb.status(), "Process #3 is in the ready queue");

        pcb.set_location(ProcessLocation::Cpu);
        assert_eq!(pcb.status(), "Process #3 is in the CPU");

        pcb.set_location(ProcessLocation::Terminated);
        assert_eq!(pcb.status(), "Process #3 is terminated");
    }
}
