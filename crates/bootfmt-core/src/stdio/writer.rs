//! Bounded byte writer.
//!
//! Every emitted byte advances a logical count; it is stored only while
//! that count is below the destination's capacity. A writer with no
//! destination is a dry run that only measures.

/// Output cursor for one rendering pass.
#[derive(Debug)]
pub struct BoundedWriter<'b> {
    dest: Option<&'b mut [u8]>,
    count: usize,
}

impl<'b> BoundedWriter<'b> {
    /// Write into `dest`, whose length is the capacity.
    pub fn new(dest: &'b mut [u8]) -> Self {
        Self {
            dest: Some(dest),
            count: 0,
        }
    }

    /// Measure only.
    #[must_use]
    pub fn dry_run() -> Self {
        Self {
            dest: None,
            count: 0,
        }
    }

    pub fn from_option(dest: Option<&'b mut [u8]>) -> Self {
        Self { dest, count: 0 }
    }

    /// Bytes emitted so far, including any that did not fit.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Capacity of the destination, zero for a dry run.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.dest.as_deref().map_or(0, <[u8]>::len)
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        if let Some(dest) = self.dest.as_deref_mut() {
            if let Some(slot) = dest.get_mut(self.count) {
                *slot = byte;
            }
        }
        self.count = self.count.saturating_add(1);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if let Some(dest) = self.dest.as_deref_mut() {
            if self.count < dest.len() {
                let n = bytes.len().min(dest.len() - self.count);
                dest[self.count..self.count + n].copy_from_slice(&bytes[..n]);
            }
        }
        self.count = self.count.saturating_add(bytes.len());
    }

    /// Emit `byte` `n` times. Only the part that fits is touched, so a huge
    /// field width costs no more than the capacity.
    pub fn fill(&mut self, byte: u8, n: usize) {
        if let Some(dest) = self.dest.as_deref_mut() {
            if self.count < dest.len() {
                let stored = n.min(dest.len() - self.count);
                dest[self.count..self.count + stored].fill(byte);
            }
        }
        self.count = self.count.saturating_add(n);
    }

    /// Terminate the output and return the logical length.
    ///
    /// The NUL lands at `min(count, capacity - 1)`; a zero-capacity
    /// destination is left untouched.
    pub fn finish(mut self) -> usize {
        let count = self.count;
        if let Some(dest) = self.dest.as_deref_mut() {
            if let Some(last) = dest.len().checked_sub(1) {
                dest[count.min(last)] = 0;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_counts() {
        let mut w = BoundedWriter::dry_run();
        w.write_bytes(b"hello");
        w.fill(b' ', 3);
        w.push(b'!');
        assert_eq!(w.capacity(), 0);
        assert_eq!(w.finish(), 9);
    }

    #[test]
    fn test_fits() {
        let mut buf = [0xAAu8; 8];
        let mut w = BoundedWriter::new(&mut buf);
        w.write_bytes(b"abc");
        assert_eq!(w.finish(), 3);
        assert_eq!(&buf[..4], b"abc\0");
        assert_eq!(buf[4], 0xAA);
    }

    #[test]
    fn test_truncates_and_terminates() {
        let mut buf = [0xAAu8; 4];
        let mut w = BoundedWriter::new(&mut buf);
        w.write_bytes(b"abcdef");
        w.fill(b'-', 10);
        assert_eq!(w.finish(), 16);
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn test_exact_fit_loses_last_byte_to_terminator() {
        let mut buf = [0u8; 3];
        let mut w = BoundedWriter::new(&mut buf);
        w.write_bytes(b"abc");
        assert_eq!(w.finish(), 3);
        assert_eq!(&buf, b"ab\0");
    }

    #[test]
    fn test_zero_capacity_untouched() {
        let mut buf = [0u8; 0];
        let mut w = BoundedWriter::new(&mut buf);
        w.push(b'x');
        assert_eq!(w.finish(), 1);
    }

    #[test]
    fn test_huge_fill_saturates() {
        let mut w = BoundedWriter::dry_run();
        w.fill(b' ', usize::MAX);
        w.push(b'x');
        assert_eq!(w.count(), usize::MAX);
    }
}
