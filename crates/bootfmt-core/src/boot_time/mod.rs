//! Boot-time event log.
//!
//! Records timestamped, formatted events in the order they happen. Logging
//! never disturbs the caller's pending error: each record is bracketed in a
//! push/pop of the caller's [`ErrorState`], and a record that cannot be
//! stored is dropped.

use std::time::Instant;

use parking_lot::Mutex;

use crate::error::ErrorState;
use crate::malloc::{Heap, SystemHeap};
use crate::stdio::{Arg, xasprintf_in};

/// Millisecond clock collaborator.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootTimeEntry {
    pub file: &'static str,
    pub line: u32,
    pub timestamp_ms: u64,
    /// Formatted message; empty if formatting ran out of memory.
    pub message: Vec<u8>,
}

/// Append-only event log, shareable between threads.
#[derive(Debug)]
pub struct BootTimeLog<C = SystemClock, H = SystemHeap> {
    clock: C,
    heap: H,
    entries: Mutex<Vec<BootTimeEntry>>,
}

impl BootTimeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(SystemClock::new(), SystemHeap)
    }
}

impl Default for BootTimeLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, H: Heap> BootTimeLog<C, H> {
    pub fn with_parts(clock: C, heap: H) -> Self {
        Self {
            clock,
            heap,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Record an event at `file:line`. See [`crate::boot_time!`].
    pub fn record(
        &self,
        errors: &mut ErrorState,
        file: &'static str,
        line: u32,
        fmt: &[u8],
        args: &[Arg<'_>],
    ) {
        let saved = errors.push();
        let mut entries = self.entries.lock();

        if self.heap.try_reserve(&mut *entries, 1).is_err() {
            restore(errors, saved);
            return;
        }

        let timestamp_ms = self.clock.now_ms();
        let message =
            xasprintf_in(&self.heap, &mut ErrorState::new(), fmt, args).unwrap_or_default();
        entries.push(BootTimeEntry {
            file,
            line,
            timestamp_ms,
            message,
        });

        restore(errors, saved);
    }

    /// Snapshot of the recorded events, oldest first.
    pub fn entries(&self) -> Vec<BootTimeEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Clear what `record` left pending; pop only if its push saved an entry.
fn restore(errors: &mut ErrorState, saved: bool) {
    errors.clear();
    if saved {
        errors.pop();
    }
}

/// Record a boot-time event with the call site's location.
///
/// ```ignore
/// boot_time!(log, &mut errors, b"loaded %s", name);
/// ```
#[macro_export]
macro_rules! boot_time {
    ($log:expr, $errors:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $log.record(
            $errors,
            file!(),
            line!(),
            $fmt,
            &$crate::args!($($arg),*),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BootError;
    use crate::malloc::BudgetHeap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Advances 10ms per reading.
    #[derive(Default)]
    struct StepClock(AtomicU64);

    impl Clock for StepClock {
        fn now_ms(&self) -> u64 {
            self.0.fetch_add(10, Ordering::Relaxed)
        }
    }

    #[test]
    fn test_records_in_order() {
        let log = BootTimeLog::with_parts(StepClock::default(), SystemHeap);
        let mut errors = ErrorState::new();
        log.record(&mut errors, "a.rs", 1, b"init %s", &[Arg::from("mm")]);
        log.record(&mut errors, "b.rs", 2, b"disk %u", &[Arg::from(3u32)]);

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, b"init mm");
        assert_eq!(entries[0].timestamp_ms, 0);
        assert_eq!(entries[1].file, "b.rs");
        assert_eq!(entries[1].line, 2);
        assert_eq!(entries[1].timestamp_ms, 10);
    }

    #[test]
    fn test_preserves_pending_error() {
        let log = BootTimeLog::new();
        let mut errors = ErrorState::new();
        errors.set(BootError::BadNumber);
        log.record(&mut errors, "a.rs", 1, b"x", &[]);
        assert_eq!(errors.current(), Some(BootError::BadNumber));
        assert_eq!(errors.depth(), 0);
    }

    #[test]
    fn test_full_error_stack_keeps_outer_saves() {
        let log = BootTimeLog::new();
        let mut errors = ErrorState::new();
        for _ in 0..crate::error::ERROR_STACK_DEPTH {
            errors.set(BootError::OutOfRange);
            assert!(errors.push());
        }
        errors.set(BootError::BadNumber);

        log.record(&mut errors, "a.rs", 1, b"deep", &[]);
        assert_eq!(log.len(), 1);
        // nothing was saved for this record, so the stack is left as it was
        assert_eq!(errors.depth(), crate::error::ERROR_STACK_DEPTH);
        assert_eq!(errors.current(), None);
        assert!(errors.pop());
        assert_eq!(errors.current(), Some(BootError::OutOfRange));
    }

    #[test]
    fn test_refused_entry_is_dropped() {
        let log = BootTimeLog::with_parts(SystemClock::new(), BudgetHeap::new(0));
        let mut errors = ErrorState::new();
        errors.set(BootError::OutOfRange);
        log.record(&mut errors, "a.rs", 1, b"lost", &[]);
        assert!(log.is_empty());
        assert_eq!(errors.current(), Some(BootError::OutOfRange));
    }

    #[test]
    fn test_message_out_of_memory_leaves_it_empty() {
        let entry = size_of::<BootTimeEntry>();
        let log = BootTimeLog::with_parts(SystemClock::new(), BudgetHeap::new(entry));
        let mut errors = ErrorState::new();
        log.record(&mut errors, "a.rs", 1, b"message", &[]);
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].message.is_empty());
        assert_eq!(errors.current(), None);
    }

    #[test]
    fn test_macro_and_threads() {
        let log = Arc::new(BootTimeLog::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    let mut errors = ErrorState::new();
                    crate::boot_time!(log, &mut errors, b"worker %d", i);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let entries = log.entries();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.file == file!()));
    }
}
