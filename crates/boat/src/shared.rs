//! State shared between the acquisition task and the control loop
//!
//! Both sides of each handle go through the same mutex, so a reader can
//! never observe a half-written snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use waypilot_core::{GpsFix, NavInfo};

/// Cloneable handle to the latest published fix.
#[derive(Debug, Clone, Default)]
pub struct SharedFix {
    inner: Arc<Mutex<GpsFix>>,
}

impl SharedFix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published fix.
    pub fn publish(&self, fix: GpsFix) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = fix;
        }
    }

    /// Copy of the latest published fix.
    pub fn snapshot(&self) -> GpsFix {
        match self.inner.lock() {
            Ok(guard) => *guard,
            // A poisoned lock means the writer panicked mid-publish; the
            // value it held is still a complete fix.
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Point-in-time view of the mission, for status displays.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusSnapshot {
    pub state_name: &'static str,
    pub nav: NavInfo,
    pub fix: GpsFix,
    pub target_index: usize,
}

/// Cloneable handle to the latest status snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus {
    inner: Arc<Mutex<StatusSnapshot>>,
}

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, status: StatusSnapshot) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = status;
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        match self.inner.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Cooperative shutdown flag shared by all tasks.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
