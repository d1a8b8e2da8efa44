//! Cooperative per-view mutual exclusion.
//!
//! One flag per user action. The triggering control is disabled while the
//! flag is set. This guards a single view only; two views acting on the same
//! business are not coordinated.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct InFlightFlag {
    busy: Arc<AtomicBool>,
}

impl InFlightFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag, or returns `None` if it is already set.
    #[must_use]
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Clears the flag on drop, including when the owning future is dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
