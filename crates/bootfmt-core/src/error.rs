//! Error kinds and the pending-error stack.
//!
//! Firmware code records the most recent failure in a "pending error" slot
//! that nested callers may save and restore around operations whose failures
//! must not leak. [`ErrorState`] is that slot plus its save stack, owned by
//! whoever drives the engine rather than living in a global.

use thiserror::Error;

/// Failures reported by the engine and its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BootError {
    /// A parsed number does not fit its destination type.
    #[error("overflow is detected")]
    OutOfRange,
    /// No digits were found where a number was expected.
    #[error("unrecognized number")]
    BadNumber,
    /// The allocator could not satisfy a request.
    #[error("out of memory")]
    OutOfMemory,
}

/// Maximum number of saved errors; pushes beyond this are dropped.
pub const ERROR_STACK_DEPTH: usize = 16;

/// Pending error plus a bounded stack of saved errors.
#[derive(Debug, Default, Clone)]
pub struct ErrorState {
    current: Option<BootError>,
    saved: Vec<Option<BootError>>,
}

impl ErrorState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `err` as the pending error, replacing any earlier one.
    pub fn set(&mut self, err: BootError) {
        self.current = Some(err);
    }

    /// The pending error, if any.
    #[must_use]
    pub fn current(&self) -> Option<BootError> {
        self.current
    }

    /// Take the pending error, leaving none.
    pub fn take(&mut self) -> Option<BootError> {
        self.current.take()
    }

    /// Forget the pending error.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Save the pending error and clear it.
    ///
    /// Returns `false` when the stack is full; the pending error is cleared
    /// either way.
    pub fn push(&mut self) -> bool {
        let pushed = if self.saved.len() < ERROR_STACK_DEPTH {
            self.saved.push(self.current);
            true
        } else {
            false
        };
        self.current = None;
        pushed
    }

    /// Restore the most recently saved error.
    ///
    /// With nothing saved the pending error is cleared and `false` returned.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(saved) => {
                self.current = saved;
                true
            }
            None => {
                self.current = None;
                false
            }
        }
    }

    /// Number of saved errors.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
