// src/simulation/cancel.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SimError;

/// A shared stop flag that long runs poll between steps.
///
/// Clones observe the same flag, so a caller can keep one handle and hand
/// the other to a simulator running on another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Fails with `SimError::Cancelled` once the flag has been raised.
    pub fn check(&self, step: usize) -> Result<(), SimError> {
        if self.is_cancelled() {
            tracing::warn!(step, "simulation cancelled");
            return Err(SimError::Cancelled { step });
        }
        Ok(())
    }
}

/// Polls an optional token; runs without one are never cancelled.
pub(crate) fn check(token: Option<&CancellationToken>, step: usize) -> Result<(), SimError> {
    match token {
        Some(token) => token.check(step),
        None => Ok(()),
    }
}
