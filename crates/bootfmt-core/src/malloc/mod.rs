//! Allocator collaborator.
//!
//! The engine never assumes a heap exists. Every allocation it makes goes
//! through a [`Heap`], which may refuse: the argument list falls back to its
//! inline storage and allocate-format reports [`BootError::OutOfMemory`].

use core::cell::Cell;

use crate::error::BootError;

/// Source of fallible allocations.
pub trait Heap {
    /// Reserve room for exactly `additional` more elements in `vec`.
    fn try_reserve<T>(&self, vec: &mut Vec<T>, additional: usize) -> Result<(), BootError>;

    /// A zero-filled byte buffer of `len` bytes.
    fn try_alloc_bytes(&self, len: usize) -> Result<Vec<u8>, BootError> {
        let mut buf = Vec::new();
        self.try_reserve(&mut buf, len)?;
        buf.resize(len, 0);
        Ok(buf)
    }
}

impl<H: Heap + ?Sized> Heap for &H {
    fn try_reserve<T>(&self, vec: &mut Vec<T>, additional: usize) -> Result<(), BootError> {
        (**self).try_reserve(vec, additional)
    }
}

/// The process allocator, through `Vec::try_reserve_exact`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHeap;

impl Heap for SystemHeap {
    fn try_reserve<T>(&self, vec: &mut Vec<T>, additional: usize) -> Result<(), BootError> {
        vec.try_reserve_exact(additional)
            .map_err(|_| BootError::OutOfMemory)
    }
}

/// A heap with a fixed byte budget, like a firmware memory pool.
///
/// Requests are charged at `additional * size_of::<T>()`; memory is never
/// returned to the budget.
#[derive(Debug)]
pub struct BudgetHeap {
    remaining: Cell<usize>,
    failures: Cell<usize>,
}

impl BudgetHeap {
    #[must_use]
    pub fn new(budget: usize) -> Self {
        Self {
            remaining: Cell::new(budget),
            failures: Cell::new(0),
        }
    }

    /// Bytes still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    /// Number of refused requests so far.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures.get()
    }
}

impl Heap for BudgetHeap {
    fn try_reserve<T>(&self, vec: &mut Vec<T>, additional: usize) -> Result<(), BootError> {
        let bytes = additional.saturating_mul(size_of::<T>());
        if bytes > self.remaining.get() {
            self.failures.set(self.failures.get() + 1);
            return Err(BootError::OutOfMemory);
        }
        vec.try_reserve_exact(additional)
            .map_err(|_| BootError::OutOfMemory)?;
        self.remaining.set(self.remaining.get() - bytes);
        Ok(())
    }
}
