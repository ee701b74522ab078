use std::collections::VecDeque;

use log::debug;
use serde::Serialize;

use super::{KernelError, Pid, ProcessControlBlock};

/// Owner of an occupied frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameEntry {
    pub pid: Pid,
    pub page: usize,
}

/// Paged physical memory: a frame table plus the list of frames nobody owns.
pub struct Memory {
    total_size: usize,
    frame_size: usize,
    frame_table: Vec<Option<FrameEntry>>,
    free_frames: VecDeque<usize>,
}

impl Memory {
    /// `frame_size` must be non-zero. Any remainder of `total_size` past the last whole frame is unused.
    pub fn new(total_size: usize, frame_size: usize) -> Memory {
        let frame_count = total_size / frame_size;

        Memory {
            total_size,
            frame_size,
            frame_table: vec![None; frame_count],
            free_frames: (0..frame_count).collect(),
        }
    }

    pub fn get_total_size(&self) -> usize {
        self.total_size
    }

    pub fn get_frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn get_frame_count(&self) -> usize {
        self.frame_table.len()
    }

    pub fn get_free_frame_count(&self) -> usize {
        self.free_frames.len()
    }

    pub fn get_free_memory(&self) -> usize {
        self.free_frames.len() * self.frame_size
    }

    pub fn get_frame_table(&self) -> &[Option<FrameEntry>] {
        &self.frame_table
    }

    pub fn get_free_frames(&self) -> impl Iterator<Item = usize> + '_ {
        self.free_frames.iter().copied()
    }

    pub fn is_resident(&self, pid: Pid) -> bool {
        self.frame_table.iter().flatten().any(|entry| entry.pid == pid)
    }

    /// Maps every page of `pcb` onto the first free frames. Nothing changes on failure.
    pub fn allocate(&mut self, pcb: &mut ProcessControlBlock) -> Result<(), KernelError> {
        if pcb.get_size() > self.get_free_memory() || pcb.get_page_count() > self.free_frames.len() {
            return Err(KernelError::InsufficientMemory);
        }

        for page in 0..pcb.get_page_count() {
            let frame = self.free_frames.pop_front().ok_or(KernelError::InsufficientMemory)?;
            self.frame_table[frame] = Some(FrameEntry { pid: pcb.get_id(), page });
            pcb.allocate_memory(page, frame)?;
        }

        debug!(
            "Allocated {} frames to process #{}, {} bytes free",
            pcb.get_page_count(),
            pcb.get_id(),
            self.get_free_memory()
        );

        Ok(())
    }

    /// Releases every frame owned by `pid` and returns how many were freed.
    pub fn deallocate(&mut self, pid: Pid) -> Result<usize, KernelError> {
        if !self.is_resident(pid) {
            return Err(KernelError::InvalidProcess(pid));
        }

        let mut released = 0;
        for (frame, entry) in self.frame_table.iter_mut().enumerate() {
            if matches!(entry, Some(owner) if owner.pid == pid) {
                *entry = None;
                self.free_frames.push_back(frame);
                released += 1;
            }
        }

        debug!(
            "Released {} frames from process #{}, {} bytes free",
            released,
            pid,
            self.get_free_memory()
        );

        Ok(released)
    }
}
