//! Argument scanning and extraction.
//!
//! Callers hand the engine a slice of [`Arg`] values, one per argument
//! slot, the way a variadic call passes one register-sized word per
//! argument. Before any value can be read, the format string is scanned to
//! learn how many slots exist and what width each slot has; only then are
//! the words pulled out, in index order, and narrowed to their type.
//! `%N$` directives may name slots out of document order, which is why the
//! whole index set must be known before extraction.

use super::printf::{ArgCursor, Conversion, Directive, LengthMod, directives};
use crate::malloc::Heap;

#[cfg(feature = "efi")]
use super::efi::Guid;

/// Arguments held without touching the heap.
pub const PREALLOC_ARGS: usize = 32;

// ---------------------------------------------------------------------------
// Caller-side slots
// ---------------------------------------------------------------------------

/// One argument slot as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    /// A raw scalar for `%c`/`%C`; not required to be a valid `char`.
    Char(u32),
    /// Byte string for `%s`; `None` is a null pointer.
    Str(Option<&'a [u8]>),
    Ptr(usize),
    #[cfg(feature = "efi")]
    Guid(Option<&'a Guid>),
}

impl<'a> Arg<'a> {
    /// The full register-width word this slot carries.
    #[must_use]
    pub fn word(&self) -> u64 {
        match *self {
            Self::Int(v) => v as u64,
            Self::Uint(v) => v,
            Self::Char(c) => u64::from(c),
            Self::Str(Some(s)) => s.as_ptr().addr() as u64,
            Self::Str(None) => 0,
            Self::Ptr(p) => p as u64,
            #[cfg(feature = "efi")]
            Self::Guid(Some(g)) => core::ptr::from_ref(g).addr() as u64,
            #[cfg(feature = "efi")]
            Self::Guid(None) => 0,
        }
    }

    fn referent(&self) -> Referent<'a> {
        match *self {
            Self::Str(Some(s)) => Referent::Bytes(s),
            #[cfg(feature = "efi")]
            Self::Guid(Some(g)) => Referent::Guid(g),
            _ => Referent::None,
        }
    }
}

macro_rules! arg_from {
    ($variant:ident: $($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Self::$variant(v as _)
            }
        })*
    };
}

arg_from!(Int: i8, i16, i32, i64, isize);
arg_from!(Uint: u8, u16, u32, u64, usize);

impl From<char> for Arg<'_> {
    fn from(c: char) -> Self {
        Self::Char(u32::from(c))
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Self::Str(Some(s))
    }
}

impl<'a> From<Option<&'a str>> for Arg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Self::Str(s.map(str::as_bytes))
    }
}

impl<T> From<*const T> for Arg<'_> {
    fn from(p: *const T) -> Self {
        Self::Ptr(p.addr())
    }
}

#[cfg(feature = "efi")]
impl<'a> From<&'a Guid> for Arg<'a> {
    fn from(g: &'a Guid) -> Self {
        Self::Guid(Some(g))
    }
}

// ---------------------------------------------------------------------------
// Typed values
// ---------------------------------------------------------------------------

/// Storage width and signedness of an argument slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgType {
    I8,
    I16,
    #[default]
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl ArgType {
    /// Signed type selected by a length modifier.
    #[must_use]
    pub const fn signed(length: LengthMod) -> Self {
        match length {
            LengthMod::None => Self::I32,
            LengthMod::Hh => Self::I8,
            LengthMod::H => Self::I16,
            LengthMod::L | LengthMod::Z => Self::signed_pointer_width(),
            LengthMod::Ll => Self::I64,
        }
    }

    /// Unsigned type selected by a length modifier.
    #[must_use]
    pub const fn unsigned(length: LengthMod) -> Self {
        match length {
            LengthMod::None => Self::U32,
            LengthMod::Hh => Self::U8,
            LengthMod::H => Self::U16,
            LengthMod::L | LengthMod::Z => Self::pointer(),
            LengthMod::Ll => Self::U64,
        }
    }

    /// Unsigned type as wide as a pointer.
    #[must_use]
    pub const fn pointer() -> Self {
        if size_of::<usize>() == 8 {
            Self::U64
        } else {
            Self::U32
        }
    }

    const fn signed_pointer_width() -> Self {
        if size_of::<usize>() == 8 {
            Self::I64
        } else {
            Self::I32
        }
    }

    /// Type of the slot a conversion reads.
    #[must_use]
    pub const fn for_conversion(conversion: Conversion, length: LengthMod) -> Option<Self> {
        match conversion {
            Conversion::Signed => Some(Self::signed(length)),
            Conversion::Unsigned | Conversion::LowerHex | Conversion::UpperHex => {
                Some(Self::unsigned(length))
            }
            Conversion::Pointer | Conversion::Str => Some(Self::pointer()),
            #[cfg(feature = "efi")]
            Conversion::Guid | Conversion::EfiStatus => Some(Self::pointer()),
            Conversion::Char | Conversion::Codepoint => Some(Self::I32),
            Conversion::Percent | Conversion::Literal(_) => None,
        }
    }

    /// Narrow a register word to this type, then widen it back into the
    /// 64-bit container: sign-extended for signed types, zero-extended for
    /// unsigned ones.
    #[must_use]
    pub const fn extract(self, word: u64) -> i64 {
        match self {
            Self::I8 => word as i8 as i64,
            Self::I16 => word as i16 as i64,
            Self::I32 => word as i32 as i64,
            Self::I64 => word as i64,
            Self::U8 => word as u8 as i64,
            Self::U16 => word as u16 as i64,
            Self::U32 => word as u32 as i64,
            Self::U64 => word as i64,
        }
    }
}

/// What a slot points at, when it is a reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Referent<'a> {
    #[default]
    None,
    Bytes(&'a [u8]),
    #[cfg(feature = "efi")]
    Guid(&'a Guid),
}

/// One extracted argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatArgument<'a> {
    pub ty: ArgType,
    pub value: i64,
    pub referent: Referent<'a>,
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Number of argument-taking directives in `fmt`.
#[must_use]
pub fn count_conversions(fmt: &[u8]) -> usize {
    directives(fmt)
        .filter(|d| matches!(d, Directive::Spec(s) if s.conversion.takes_argument()))
        .count()
}

/// Typed argument slots for one formatting call.
///
/// Up to [`PREALLOC_ARGS`] slots live inline. Larger lists ask the heap;
/// if it refuses, the list keeps only the inline slots and directives past
/// them render as absent.
#[derive(Debug, Clone)]
pub struct ArgumentList<'a> {
    prealloc: [FormatArgument<'a>; PREALLOC_ARGS],
    spilled: Vec<FormatArgument<'a>>,
    on_heap: bool,
    count: usize,
    truncated: bool,
}

impl<'a> ArgumentList<'a> {
    /// A list of `count` untyped slots.
    pub fn with_count<H: Heap + ?Sized>(count: usize, heap: &H) -> Self {
        let mut list = Self {
            prealloc: [FormatArgument::default(); PREALLOC_ARGS],
            spilled: Vec::new(),
            on_heap: false,
            count,
            truncated: false,
        };

        if count > PREALLOC_ARGS {
            match heap.try_reserve(&mut list.spilled, count) {
                Ok(()) => {
                    list.spilled.resize(count, FormatArgument::default());
                    list.on_heap = true;
                }
                Err(_) => {
                    list.count = PREALLOC_ARGS;
                    list.truncated = true;
                }
            }
        }
        list
    }

    /// Scan `fmt`: size the list and record each slot's type.
    pub fn scan<H: Heap + ?Sized>(fmt: &[u8], heap: &H) -> Self {
        let mut list = Self::with_count(count_conversions(fmt), heap);
        list.assign_types(fmt);
        list
    }

    /// Scan `fmt` and pull the values out of `args`.
    pub fn collect<H: Heap + ?Sized>(fmt: &[u8], args: &[Arg<'a>], heap: &H) -> Self {
        let mut list = Self::scan(fmt, heap);
        list.extract(args);
        list
    }

    /// Record the type of every slot a directive refers to. A slot named by
    /// several directives takes the type of the last one.
    pub fn assign_types(&mut self, fmt: &[u8]) {
        let mut cursor = ArgCursor::default();
        let count = self.count;
        let slots = self.slots_mut();

        for directive in directives(fmt) {
            let Directive::Spec(spec) = directive else {
                continue;
            };
            let Some(ty) = ArgType::for_conversion(spec.conversion, spec.length) else {
                continue;
            };
            if let Some(i) = cursor.advance(&spec).filter(|&i| i < count) {
                slots[i].ty = ty;
            }
        }
    }

    /// Read one word per slot from `args`, in index order, narrowing each
    /// to its slot type.
    ///
    /// Fewer `args` than slots shrinks the list to `args.len()`; extra
    /// `args` are ignored.
    pub fn extract(&mut self, args: &[Arg<'a>]) {
        self.count = self.count.min(args.len());
        let count = self.count;
        for (slot, arg) in self.slots_mut()[..count].iter_mut().zip(args) {
            slot.value = slot.ty.extract(arg.word());
            slot.referent = arg.referent();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True if the heap refused a large list and slots were dropped.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// True if the slots live in heap storage.
    #[must_use]
    pub fn is_spilled(&self) -> bool {
        self.on_heap
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormatArgument<'a>> {
        self.as_slice().get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FormatArgument<'a>] {
        if self.on_heap {
            &self.spilled[..self.count]
        } else {
            &self.prealloc[..self.count]
        }
    }

    fn slots_mut(&mut self) -> &mut [FormatArgument<'a>] {
        if self.on_heap {
            &mut self.spilled[..]
        } else {
            &mut self.prealloc[..]
        }
    }
}
