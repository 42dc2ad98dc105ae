// src/acquisition/sample_buffer.rs
//! Fixed-capacity ring buffer of the most recent samples for one sensor

use parking_lot::Mutex;
use std::collections::VecDeque;

/// Ring buffer holding the most recent `capacity` samples
///
/// The acquisition side appends, the telemetry side takes snapshots; the lock
/// is held only for the duration of the copy so a snapshot is never torn.
/// Capacity is fixed at construction.
pub struct SampleBuffer {
    inner: Mutex<VecDeque<f64>>,
    capacity: usize,
}

impl SampleBuffer {
    /// Create a buffer for `capacity` samples; capacity must be non-zero
    /// (enforced by configuration validation).
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append one sample, evicting the oldest on overflow
    pub fn push(&self, sample: f64) {
        let mut inner = self.inner.lock();
        if inner.len() == self.capacity {
            inner.pop_front();
        }
        inner.push_back(sample);
    }

    /// Append a batch of samples, evicting the oldest on overflow
    pub fn push_slice(&self, samples: &[f64]) {
        let mut inner = self.inner.lock();
        for &sample in samples {
            if inner.len() == self.capacity {
                inner.pop_front();
            }
            inner.push_back(sample);
        }
    }

    /// Consistent copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<f64> {
        let inner = self.inner.lock();
        inner.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
