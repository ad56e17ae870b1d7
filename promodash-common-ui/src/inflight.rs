use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use promodash_common::Error;

/// Disables a submit action while its request is outstanding.
#[derive(Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

/// Clears the flag when dropped.
pub struct InFlightGuard(Arc<AtomicBool>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Result<InFlightGuard, Error> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy)?;
        Ok(InFlightGuard(self.0.clone()))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
