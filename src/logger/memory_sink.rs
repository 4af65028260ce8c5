use super::types::{CheckLogEntry, CheckLogSink};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

/// Bounded ring of recent check log entries, served by the HTTP API.
pub struct MemoryLogSink {
    buffer: Arc<RwLock<VecDeque<CheckLogEntry>>>,
    capacity: usize,
}

impl MemoryLogSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn get_recent(&self) -> Vec<CheckLogEntry> {
        let buffer = self.buffer.read().unwrap();
        buffer.iter().cloned().collect()
    }

    // Allow sharing the buffer with API handlers
    pub fn clone_buffer(&self) -> Arc<RwLock<VecDeque<CheckLogEntry>>> {
        self.buffer.clone()
    }
}

impl CheckLogSink for MemoryLogSink {
    fn log(&self, entry: &CheckLogEntry) {
        let mut buffer = self.buffer.write().unwrap();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(entry.clone());
    }
}
