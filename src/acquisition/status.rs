// src/acquisition/status.rs
//! Shared acquisition health state

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Acquisition loop state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    Connecting,
    Acquiring,
    Disconnected,
    Stopped,
}

/// Process-wide acquisition health, shared between the loop and the
/// supervisor
///
/// Written by the acquisition loop on every read attempt, observed by the
/// supervisor on its poll interval. All fields are atomic so an observer
/// never sees a half-updated status.
#[derive(Debug, Default)]
pub struct AcquisitionStatus {
    running: AtomicBool,
    consecutive_failures: AtomicU32,
    disconnected: AtomicBool,
}

/// Point-in-time copy of [`AcquisitionStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub running: bool,
    pub consecutive_failures: u32,
    pub disconnected: bool,
}

impl AcquisitionStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset at session start
    pub fn mark_running(&self) {
        self.consecutive_failures.store(0, Ordering::Release);
        self.disconnected.store(false, Ordering::Release);
        self.running.store(true, Ordering::Release);
    }

    pub fn mark_stopped(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn mark_disconnected(&self) {
        self.disconnected.store(true, Ordering::Release);
        self.running.store(false, Ordering::Release);
    }

    /// Record a failed read, returning the new consecutive count
    pub fn record_failure(&self) -> u32 {
        self.consecutive_failures.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// A successful read resets the failure counter
    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::Acquire)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            running: self.is_running(),
            consecutive_failures: self.consecutive_failures(),
            disconnected: self.is_disconnected(),
        }
    }
}
