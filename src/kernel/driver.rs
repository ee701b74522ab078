use log::info;

use super::*;

use crate::config::SystemConfig;

/// Parameters the command layer collects from the user for one system call.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemCallRequest {
    pub file_name: String,
    pub logical_address: usize,
    pub rw: ReadWrite,
    /// Required for writes.
    pub file_length: Option<usize>,
    /// Required for disk drives.
    pub cylinder: Option<u32>,
    /// CPU time the process used since it was last dispatched.
    pub elapsed: f64,
}

/// Accounting for a process that has left the system.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminationReport {
    pub pid: Pid,
    pub total_cpu_time: f64,
    pub avg_burst_time: f64,
    /// Jobs let in from the job pool by the memory this process freed.
    pub admitted: Vec<Pid>,
}

impl TerminationReport {
    fn new(pcb: &ProcessControlBlock, admitted: Vec<Pid>) -> TerminationReport {
        TerminationReport {
            pid: pcb.get_id(),
            total_cpu_time: pcb.get_total_cpu_time(),
            avg_burst_time: pcb.get_avg_burst_time(),
            admitted,
        }
    }
}

/// Holds the simulated system and applies one event at a time to it.
pub struct Driver {
    cpu: Cpu,
    devices: Vec<Device>,
    lts: LongTermScheduler,
    next_pid: Pid,
}

impl Driver {
    pub fn new(config: &SystemConfig) -> Result<Driver, KernelError> {
        config.validate()?;

        let devices = config
            .devices
            .iter()
            .map(|device| match device.kind {
                DeviceKind::Printer => Device::printer(&device.name),
                DeviceKind::CdRw => Device::cd_rw(&device.name),
                DeviceKind::DiskDrive => Device::disk_drive(&device.name, device.cylinders),
            })
            .collect();

        info!(
            "System generated with {} bytes of memory in {} byte frames and {} devices",
            config.memory_size,
            config.frame_size,
            config.devices.len()
        );

        Ok(Driver {
            cpu: Cpu::new(),
            devices,
            lts: LongTermScheduler::new(Memory::new(config.memory_size, config.frame_size)),
            next_pid: 1,
        })
    }

    pub fn devices(&self) -> Vec<(&str, DeviceKind)> {
        self.devices
            .iter()
            .map(|device| (device.get_name(), device.get_kind()))
            .collect()
    }

    /// Creates a process and hands it to admission control. Returns the new pid even
    /// when the process has to wait in the job pool.
    pub fn admit_process(&mut self, size: usize, alpha: f64, tau: f64) -> Result<Pid, KernelError> {
        if size == 0 {
            return Err(KernelError::InvalidParameter("process size must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&alpha) {
            return Err(KernelError::InvalidParameter("alpha must be between 0 and 1"));
        }
        if !tau.is_finite() || tau < 0.0 {
            return Err(KernelError::InvalidParameter("initial burst estimate must be non-negative"));
        }

        let pid = self.next_pid;
        self.next_pid += 1;

        let frame_size = self.lts.get_memory().get_frame_size();
        let pcb = ProcessControlBlock::new(pid, size, frame_size, alpha, tau);

        match self.lts.schedule(pcb) {
            Admission::Admitted(pcb) => self.cpu.admit(pcb),
            Admission::Deferred(_) => {}
        }

        Ok(pid)
    }

    pub fn terminate_active_process(&mut self) -> Result<TerminationReport, KernelError> {
        let pcb = self.cpu.terminate()?;
        info!("Process #{} terminated", pcb.get_id());

        let admitted = match self.lts.terminate(pcb.get_id())? {
            Termination::Released(admitted) => admitted,
            Termination::Cancelled(_) => Vec::new(),
        };

        let admitted_ids = admitted.iter().map(|pcb| pcb.get_id()).collect();
        for pcb in admitted {
            self.cpu.admit(pcb);
        }

        Ok(TerminationReport::new(&pcb, admitted_ids))
    }

    /// Terminates a job that is still waiting in the job pool.
    pub fn cancel_job(&mut self, pid: Pid) -> Result<TerminationReport, KernelError> {
        if !self.lts.get_job_pool().contains(pid) {
            return Err(KernelError::InvalidProcess(pid));
        }

        match self.lts.terminate(pid)? {
            Termination::Cancelled(mut pcb) => {
                pcb.set_location(ProcessLocation::Terminated);
                Ok(TerminationReport::new(&pcb, Vec::new()))
            }
            Termination::Released(_) => Err(KernelError::InvalidProcess(pid)),
        }
    }

    /// Moves the active process onto a device queue. Every parameter is checked before
    /// anything is changed, so a failed call leaves the system as it was.
    pub fn system_call(&mut self, device_name: &str, request: SystemCallRequest) -> Result<(), KernelError> {
        let device_idx = self.find_device(device_name)?;
        let device = &self.devices[device_idx];

        if self.cpu.is_idle() {
            return Err(KernelError::NoActiveProcess);
        }
        if !request.elapsed.is_finite() || request.elapsed < 0.0 {
            return Err(KernelError::InvalidParameter("elapsed time must be non-negative"));
        }

        let rw = match device.get_kind() {
            DeviceKind::Printer => ReadWrite::Write,
            _ => request.rw,
        };

        let file_length = match rw {
            ReadWrite::Write => Some(request.file_length.ok_or(KernelError::MissingParameter("file length"))?),
            ReadWrite::Read => None,
        };

        let cylinder = match device.get_cylinders() {
            Some(cylinders) => {
                let requested = request.cylinder.ok_or(KernelError::MissingParameter("cylinder"))?;
                if requested >= cylinders {
                    return Err(KernelError::InvalidCylinder { requested, cylinders });
                }
                Some(requested)
            }
            None => None,
        };

        let params = CallParams {
            file_name: Some(request.file_name),
            logical_address: Some(request.logical_address),
            physical_address: None,
            rw: Some(rw),
            file_length,
            cylinder,
        };

        self.cpu
            .get_active_mut()
            .ok_or(KernelError::NoActiveProcess)?
            .set_call_params(params)?;

        let pcb = self.cpu.preempt(request.elapsed, BurstOutcome::Completed)?;
        info!("Process #{} requested {}", pcb.get_id(), device_name);
        self.devices[device_idx].enqueue(pcb);

        Ok(())
    }

    /// Takes the active process off the CPU part way through its burst and returns it
    /// to the ready queue.
    pub fn preempt_active(&mut self, elapsed: f64) -> Result<Pid, KernelError> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(KernelError::InvalidParameter("elapsed time must be non-negative"));
        }

        let pcb = self.cpu.preempt(elapsed, BurstOutcome::Interrupted)?;
        let pid = pcb.get_id();
        info!("Process #{} preempted", pid);
        self.cpu.admit(pcb);

        Ok(pid)
    }

    /// Completes the request at the head of a device queue.
    pub fn device_interrupt(&mut self, device_name: &str) -> Result<Pid, KernelError> {
        let device_idx = self.find_device(device_name)?;

        let mut pcb = self.devices[device_idx].dequeue()?;
        pcb.clear_params();

        let pid = pcb.get_id();
        info!("{} completed process #{}", device_name, pid);
        self.cpu.admit(pcb);

        Ok(pid)
    }

    pub fn snapshot(&self, target: &SnapshotTarget) -> Result<Snapshot, KernelError> {
        let snapshot = match target {
            SnapshotTarget::Ready => Snapshot::Ready(self.cpu.ready().map(ProcessView::from).collect()),
            SnapshotTarget::Cpu => Snapshot::Cpu(self.cpu.get_active().map(ProcessView::from)),
            SnapshotTarget::JobPool => {
                Snapshot::JobPool(self.lts.get_job_pool().iter().map(ProcessView::from).collect())
            }
            SnapshotTarget::Memory => {
                let memory = self.lts.get_memory();
                Snapshot::Memory {
                    frame_size: memory.get_frame_size(),
                    frames: memory.get_frame_table().to_vec(),
                    free_frames: memory.get_free_frames().collect(),
                }
            }
            SnapshotTarget::Device(name) => {
                let device = &self.devices[self.find_device(name)?];
                Snapshot::Device {
                    name: device.get_name().to_string(),
                    kind: device.get_kind(),
                    queue: device.queued().into_iter().map(ProcessView::from).collect(),
                }
            }
        };

        Ok(snapshot)
    }

    fn find_device(&self, name: &str) -> Result<usize, KernelError> {
        self.devices
            .iter()
            .position(|device| device.get_name() == name)
            .ok_or_else(|| KernelError::InvalidDevice(name.to_string()))
    }
}
