//! Console printing.
//!
//! A [`Printer`] renders into its own scratch buffer and hands the bytes to
//! an [`OutputSink`]. Output that does not fit the scratch buffer is
//! rendered again into a heap buffer of the exact size; if the heap
//! refuses, the scratch contents are printed with a trailing `...`.

use super::args::{Arg, ArgumentList};
use super::render_list;
use crate::config::Environment;
use crate::debug::debug_enabled;
use crate::error::{BootError, ErrorState};
use crate::malloc::{Heap, SystemHeap};

/// Size of a printer's scratch buffer, terminator included.
pub const SCRATCH_LEN: usize = 256;

const ELLIPSIS: &[u8] = b"...";

/// Terminal output collaborator.
pub trait OutputSink {
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Flush anything buffered to the screen.
    fn refresh(&mut self) {}
}

impl OutputSink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }

    fn refresh(&mut self) {
        (**self).refresh();
    }
}

/// Adapter for any [`std::io::Write`]. Write errors are dropped, as a
/// console has nobody to report them to.
#[derive(Debug)]
pub struct IoSink<W>(pub W);

impl<W: std::io::Write> OutputSink for IoSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let _ = self.0.write_all(bytes);
    }

    fn refresh(&mut self) {
        let _ = self.0.flush();
    }
}

/// Platform services needed to abort.
pub trait Platform {
    /// True if a keyboard or other input terminal is attached.
    fn has_input(&self) -> bool;

    /// Block until a key is pressed.
    fn wait_key(&mut self);

    fn exit(&mut self) -> !;
}

/// Console printer.
#[derive(Debug)]
pub struct Printer<S, H = SystemHeap> {
    sink: S,
    heap: H,
    scratch: [u8; SCRATCH_LEN],
    errors: ErrorState,
}

impl<S: OutputSink> Printer<S> {
    pub fn new(sink: S) -> Self {
        Self::with_heap(sink, SystemHeap)
    }
}

impl<S: OutputSink, H: Heap> Printer<S, H> {
    pub fn with_heap(sink: S, heap: H) -> Self {
        Self {
            sink,
            heap,
            scratch: [0; SCRATCH_LEN],
            errors: ErrorState::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn heap(&self) -> &H {
        &self.heap
    }

    /// Pending-error state of this console.
    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorState {
        &mut self.errors
    }

    /// Format and print. Returns the full length of the message, even when
    /// only a truncated form could be printed.
    pub fn printf(&mut self, fmt: &[u8], args: &[Arg<'_>]) -> usize {
        let list = ArgumentList::collect(fmt, args, &self.heap);
        let required = render_list(Some(&mut self.scratch[..]), fmt, &list);
        if required < self.scratch.len() {
            self.sink.write_bytes(&self.scratch[..required]);
            return required;
        }

        let big = required
            .checked_add(1)
            .ok_or(BootError::OutOfMemory)
            .and_then(|size| self.heap.try_alloc_bytes(size));
        match big {
            Ok(mut buf) => {
                let n = render_list(Some(&mut buf[..]), fmt, &list);
                self.sink.write_bytes(&buf[..n]);
            }
            Err(_) => {
                self.errors.clear();
                let end = self.scratch.len() - 1;
                self.scratch[end - ELLIPSIS.len()..end].copy_from_slice(ELLIPSIS);
                self.sink.write_bytes(&self.scratch[..end]);
            }
        }
        required
    }

    /// Print `s` followed by a newline.
    pub fn puts(&mut self, s: &[u8]) {
        self.sink.write_bytes(s);
        self.sink.write_bytes(b"\n");
    }

    pub fn refresh(&mut self) {
        self.sink.refresh();
    }

    /// Print `"<file>:<line>: "` and the message when `condition` is
    /// enabled in `env`. See [`crate::dprintf!`].
    pub fn dprintf<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        file: &str,
        line: u32,
        condition: &str,
        fmt: &[u8],
        args: &[Arg<'_>],
    ) {
        if !debug_enabled(env, condition) {
            return;
        }
        self.printf(b"%s:%u: ", &[Arg::from(file), Arg::from(line)]);
        self.printf(fmt, args);
        self.refresh();
    }

    /// [`Printer::dprintf`] without the location prefix.
    pub fn qdprintf<E: Environment + ?Sized>(
        &mut self,
        env: &E,
        condition: &str,
        fmt: &[u8],
        args: &[Arg<'_>],
    ) {
        if !debug_enabled(env, condition) {
            return;
        }
        self.printf(fmt, args);
        self.refresh();
    }

    /// Print the message, report the abort and leave through the platform.
    pub fn fatal<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        fmt: &[u8],
        args: &[Arg<'_>],
    ) -> ! {
        self.printf(fmt, args);
        self.refresh();
        self.abort(platform)
    }

    /// Report the abort and leave through the platform, after a keypress
    /// when someone is there to press one.
    pub fn abort<P: Platform + ?Sized>(&mut self, platform: &mut P) -> ! {
        self.sink.write_bytes(b"\nAborted.");
        if platform.has_input() {
            self.sink.write_bytes(b" Press any key to exit.");
            self.refresh();
            platform.wait_key();
        }
        self.refresh();
        platform.exit()
    }
}
